use tracing::debug;

use crate::artifacts::{ArtifactSource, FASTQ_INFO_SUFFIX, GZIP_CHECK_SUFFIX, renamed_candidates};
use crate::consistency;
use crate::domain::{AssayMode, Cell, ReadLayout, Sample};
use crate::manifest::ChecksumMap;
use crate::metrics::MetricsReport;

pub const NOT_RENAMED: &str = "not-renamed";

pub const MD5_PASS: &str = "PASS";
pub const MD5_FAIL: &str = "FAIL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleRow {
    pub sample_id: String,
    pub layout: ReadLayout,
    pub original_filenames: Vec<Cell>,
    pub renamed_filenames: Vec<Cell>,
    pub md5s: Vec<Cell>,
    pub gzip_tests: Vec<Cell>,
    pub fastq_format_checks: Vec<Cell>,
    pub paired_fastq_format_check: Cell,
    pub num_reads: Vec<Cell>,
    pub num_reads_equal: &'static str,
    pub read_length_ranges: Vec<Cell>,
    pub avg_read_lengths: Vec<Cell>,
    pub read_lengths_equal: &'static str,
    pub fastqc_report_count: usize,
    pub md5_checks: Option<Vec<Cell>>,
}

impl SampleRow {
    pub fn to_record(&self) -> Vec<String> {
        let mut record = vec![self.sample_id.clone(), self.layout.count().to_string()];
        for block in [
            &self.original_filenames,
            &self.renamed_filenames,
            &self.md5s,
            &self.gzip_tests,
            &self.fastq_format_checks,
        ] {
            record.extend(block.iter().map(|cell| cell.to_string()));
        }
        record.push(self.paired_fastq_format_check.to_string());
        record.extend(self.num_reads.iter().map(Cell::to_string));
        record.push(self.num_reads_equal.to_string());
        record.extend(self.read_length_ranges.iter().map(Cell::to_string));
        record.extend(self.avg_read_lengths.iter().map(Cell::to_string));
        record.push(self.read_lengths_equal.to_string());
        record.push(self.fastqc_report_count.to_string());
        if let Some(checks) = &self.md5_checks {
            record.extend(checks.iter().map(Cell::to_string));
        }
        record
    }

    pub fn missing_from_metrics(&self) -> bool {
        self.fastqc_report_count == 0
    }
}

pub struct RowJoiner<'a, A: ArtifactSource> {
    pub layout: ReadLayout,
    pub assay: AssayMode,
    pub checksums: &'a ChecksumMap,
    pub reference_checksums: Option<&'a ChecksumMap>,
    pub metrics: &'a MetricsReport,
    pub artifacts: &'a A,
}

impl<A: ArtifactSource> RowJoiner<'_, A> {
    pub fn join(&self, sample: &Sample) -> SampleRow {
        let id = sample.id.as_str();
        let original_filenames = sample.original_filenames();
        let renamed = self.renamed_filenames(id);

        let md5s = self.per_renamed(&renamed, |name| self.checksums.get(name));
        let gzip_tests = self.per_renamed(&renamed, |name| {
            self.artifacts
                .gzip_result(&format!("{name}{GZIP_CHECK_SUFFIX}"))
        });
        let fastq_format_checks = self.per_renamed(&renamed, |name| {
            self.artifacts
                .fastq_info_result(&format!("{name}{FASTQ_INFO_SUFFIX}"))
        });
        let paired_fastq_format_check = self
            .assay
            .paired_check(self.layout)
            .file_name(id)
            .map(|file| self.artifacts.fastq_info_result(&file))
            .unwrap_or_default();

        let metrics = self.metrics.for_sample(id, self.layout);
        let num_reads_equal = consistency::num_reads_equal(&metrics.total_sequences);
        let read_lengths_equal =
            consistency::read_lengths_equal(&metrics.length_ranges, &metrics.avg_lengths);

        let md5_checks = self
            .reference_checksums
            .map(|reference| md5_checks(&original_filenames, &md5s, reference));

        // Lookups above need the real names; the sentinel is applied last.
        let renamed_filenames = original_filenames
            .iter()
            .zip(renamed)
            .map(|(original, renamed)| {
                if original.as_str() == renamed.as_str() {
                    Cell::value(NOT_RENAMED)
                } else {
                    renamed
                }
            })
            .collect();

        debug!(
            sample = id,
            reports = metrics.report_count,
            "assembled summary row"
        );

        SampleRow {
            sample_id: sample.id.clone(),
            layout: self.layout,
            original_filenames,
            renamed_filenames,
            md5s,
            gzip_tests,
            fastq_format_checks,
            paired_fastq_format_check,
            num_reads: metrics.total_sequences,
            num_reads_equal,
            read_length_ranges: metrics.length_ranges,
            avg_read_lengths: metrics.avg_lengths,
            read_lengths_equal,
            fastqc_report_count: metrics.report_count,
            md5_checks,
        }
    }

    fn renamed_filenames(&self, sample_id: &str) -> Vec<Cell> {
        self.layout
            .indices()
            .map(|index| {
                renamed_candidates(sample_id, index)
                    .into_iter()
                    .find(|name| self.artifacts.read_exists(name))
                    .map(Cell::Value)
                    .unwrap_or_default()
            })
            .collect()
    }

    fn per_renamed(&self, renamed: &[Cell], lookup: impl Fn(&str) -> Cell) -> Vec<Cell> {
        renamed
            .iter()
            .map(|name| name.as_option().map(&lookup).unwrap_or_default())
            .collect()
    }
}

pub fn md5_checks(original_filenames: &[Cell], md5s: &[Cell], reference: &ChecksumMap) -> Vec<Cell> {
    original_filenames
        .iter()
        .zip(md5s)
        .map(|(original, actual)| {
            let Some(original) = original.as_option() else {
                return Cell::Missing;
            };
            let expected = reference.get(original);
            match (expected.as_option(), actual.as_option()) {
                (Some(expected), Some(actual)) if expected == actual => Cell::value(MD5_PASS),
                (Some(_), Some(_)) => Cell::value(MD5_FAIL),
                _ => Cell::Missing,
            }
        })
        .collect()
}
