use crate::domain::ReadLayout;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutLabels {
    pub layout: ReadLayout,
    pub num_reads_equal: &'static str,
    pub read_lengths_equal: &'static str,
}

const LAYOUT_LABELS: [LayoutLabels; 3] = [
    LayoutLabels {
        layout: ReadLayout::Two,
        num_reads_equal: "R1_and_R2_num_reads_equal",
        read_lengths_equal: "R1_and_R2_read_lengths_equal",
    },
    LayoutLabels {
        layout: ReadLayout::Three,
        num_reads_equal: "R1_R2_and_R3_num_reads_equal",
        read_lengths_equal: "R1_R2_and_R3_read_lengths_equal",
    },
    LayoutLabels {
        layout: ReadLayout::Four,
        num_reads_equal: "R1_R2_R3_and_R4_num_reads_equal",
        read_lengths_equal: "R1_R2_R3_and_R4_read_lengths_equal",
    },
];

pub fn layout_labels(layout: ReadLayout) -> LayoutLabels {
    match layout {
        ReadLayout::Two => LAYOUT_LABELS[0],
        ReadLayout::Three => LAYOUT_LABELS[1],
        ReadLayout::Four => LAYOUT_LABELS[2],
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    pub layout: ReadLayout,
    pub md5_check: bool,
    columns: Vec<String>,
}

impl Schema {
    pub fn build(layout: ReadLayout, md5_check: bool) -> Self {
        let labels = layout_labels(layout);
        let per_read = |template: &str| -> Vec<String> {
            layout
                .indices()
                .map(|index| template.replace("{i}", &index.to_string()))
                .collect()
        };

        let mut columns = vec!["unique_ID".to_string(), "num_read_files".to_string()];
        columns.extend(per_read("orig_R{i}_filename"));
        columns.extend(per_read("new_R{i}_filename"));
        columns.extend(per_read("R{i}_md5"));
        columns.extend(per_read("R{i}_gzip_test"));
        columns.extend(per_read("R{i}_fastq_format_check"));
        columns.push("paired_fastq_format_check".to_string());
        columns.extend(per_read("R{i}_num_reads"));
        columns.push(labels.num_reads_equal.to_string());
        columns.extend(per_read("R{i}_read_length_range"));
        columns.extend(per_read("R{i}_avg_read_length"));
        columns.push(labels.read_lengths_equal.to_string());
        columns.push("num_fastqc_reports_in_multiqc_report".to_string());
        if md5_check {
            columns.extend(per_read("R{i}_md5_check"));
        }

        Self {
            layout,
            md5_check,
            columns,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}
