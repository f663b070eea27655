use crate::domain::Cell;

pub const YES: &str = "YES";
pub const NO: &str = "NO";

pub fn all_equal(values: &[Cell]) -> bool {
    let Some(first) = values.first() else {
        return false;
    };
    !first.is_blank() && values.iter().all(|value| value.as_str() == first.as_str())
}

pub fn num_reads_equal(counts: &[Cell]) -> &'static str {
    yes_no(all_equal(counts))
}

pub fn read_lengths_equal(length_ranges: &[Cell], avg_lengths: &[Cell]) -> &'static str {
    yes_no(all_equal(length_ranges) && all_equal(avg_lengths))
}

fn yes_no(flag: bool) -> &'static str {
    if flag { YES } else { NO }
}
