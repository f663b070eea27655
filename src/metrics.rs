use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::Read;

use camino::Utf8Path;
use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, warn};
use zip::ZipArchive;

use crate::domain::{Cell, ReadLayout};
use crate::error::SummaryError;

pub const FASTQC_REPORT_NAME: &str = "multiqc_fastqc.txt";

pub const SAMPLE_HEADER: &str = "Sample";
pub const TOTAL_SEQUENCES_HEADER: &str = "Total Sequences";
pub const LENGTH_RANGE_HEADER: &str = "Sequence length";
pub const AVG_LENGTH_HEADER: &str = "avg_sequence_length";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricRecord {
    pub total_sequences: Cell,
    pub length_range: Cell,
    pub avg_length: Cell,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleMetrics {
    pub total_sequences: Vec<Cell>,
    pub length_ranges: Vec<Cell>,
    pub avg_lengths: Vec<Cell>,
    pub report_count: usize,
}

/// Duplicate rows for the same read file resolve to the last one in the table.
#[derive(Debug, Clone, Default)]
pub struct MetricsReport {
    records: HashMap<String, MetricRecord>,
    present: HashSet<String>,
}

struct Columns {
    sample: usize,
    total_sequences: usize,
    length_range: usize,
    avg_length: usize,
}

impl MetricsReport {
    pub fn load(archive_path: &Utf8Path) -> Result<Self, SummaryError> {
        let content = read_report_member(archive_path)?;
        let report = Self::parse(archive_path, &content)?;
        debug!(
            read_files = report.present.len(),
            "parsed {FASTQC_REPORT_NAME} from {archive_path}"
        );
        Ok(report)
    }

    pub fn parse(archive_path: &Utf8Path, content: &str) -> Result<Self, SummaryError> {
        let csv_err = |err: csv::Error| {
            SummaryError::archive_format(archive_path, format!("{FASTQC_REPORT_NAME}: {err}"))
        };
        let mut reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .flexible(true)
            .quoting(false)
            .from_reader(content.as_bytes());

        let header = reader.headers().map_err(csv_err)?;
        if header.is_empty() {
            return Err(SummaryError::archive_format(
                archive_path,
                format!("{FASTQC_REPORT_NAME} is empty"),
            ));
        }
        let columns = Columns::locate(archive_path, header)?;

        let mut report = Self::default();
        for record in reader.records() {
            let row = record.map_err(csv_err)?;
            let Some(sample) = row.get(columns.sample) else {
                continue;
            };
            report.present.insert(sample.to_string());

            let metrics = report.records.entry(sample.to_string()).or_default();
            if let Some(value) = row.get(columns.total_sequences) {
                metrics.total_sequences = Cell::value(value);
            }
            if let Some(value) = row.get(columns.length_range) {
                metrics.length_range = Cell::value(value);
            }
            if let Some(value) = row.get(columns.avg_length) {
                metrics.avg_length = Cell::value(value);
            }
        }
        Ok(report)
    }

    pub fn record(&self, sample_id: &str, read_index: usize) -> MetricRecord {
        self.records
            .get(&report_sample_name(sample_id, read_index))
            .cloned()
            .unwrap_or_default()
    }

    pub fn contains(&self, sample_id: &str, read_index: usize) -> bool {
        self.present
            .contains(&report_sample_name(sample_id, read_index))
    }

    pub fn for_sample(&self, sample_id: &str, layout: ReadLayout) -> SampleMetrics {
        let mut metrics = SampleMetrics::default();
        for index in layout.indices() {
            let record = self.record(sample_id, index);
            metrics.total_sequences.push(record.total_sequences);
            metrics.length_ranges.push(record.length_range);
            metrics.avg_lengths.push(record.avg_length);
            if self.contains(sample_id, index) {
                metrics.report_count += 1;
            }
        }
        metrics
    }
}

impl Columns {
    fn locate(archive_path: &Utf8Path, header: &StringRecord) -> Result<Self, SummaryError> {
        let find = |wanted: &str| {
            header.iter().position(|name| name == wanted).ok_or_else(|| {
                SummaryError::archive_format(
                    archive_path,
                    format!("{FASTQC_REPORT_NAME} has no `{wanted}` column"),
                )
            })
        };
        Ok(Self {
            sample: find(SAMPLE_HEADER)?,
            total_sequences: find(TOTAL_SEQUENCES_HEADER)?,
            length_range: find(LENGTH_RANGE_HEADER)?,
            avg_length: find(AVG_LENGTH_HEADER)?,
        })
    }
}

/// FastQC names each read file `<sample>_R<index>` in the MultiQC table.
pub fn report_sample_name(sample_id: &str, read_index: usize) -> String {
    format!("{sample_id}_R{read_index}")
}

fn read_report_member(archive_path: &Utf8Path) -> Result<String, SummaryError> {
    let open_err = |message: String| SummaryError::ArchiveRead {
        path: archive_path.to_path_buf(),
        message,
    };
    let file = fs::File::open(archive_path.as_std_path()).map_err(|err| open_err(err.to_string()))?;
    let mut archive = ZipArchive::new(file).map_err(|err| open_err(err.to_string()))?;

    let members = archive
        .file_names()
        .filter(|name| name.ends_with(FASTQC_REPORT_NAME))
        .map(str::to_string)
        .collect::<Vec<_>>();
    let member = members.first().ok_or_else(|| {
        SummaryError::archive_format(
            archive_path,
            format!("no member ending with {FASTQC_REPORT_NAME}"),
        )
    })?;
    if members.len() > 1 {
        warn!(
            candidates = members.len(),
            "several {FASTQC_REPORT_NAME} members in {archive_path}, using {member}"
        );
    }

    let mut entry = archive
        .by_name(member)
        .map_err(|err| open_err(err.to_string()))?;
    let mut content = String::new();
    entry.read_to_string(&mut content).map_err(|err| {
        SummaryError::archive_format(archive_path, format!("reading {member}: {err}"))
    })?;
    Ok(content)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    const HEADER: &str = "Sample\tFilename\tTotal Sequences\tSequence length\tavg_sequence_length";

    fn parse(body: &str) -> MetricsReport {
        MetricsReport::parse(Utf8Path::new("multiqc.zip"), &format!("{HEADER}\n{body}")).unwrap()
    }

    #[test]
    fn record_matches_exact_sample_name() {
        let report = parse(
            "S1_R1\ta.fastq.gz\t100.0\t151\t151.0\n\
             S10_R1\tb.fastq.gz\t7.0\t35-151\t140.2\n",
        );
        let record = report.record("S1", 1);
        assert_eq!(record.total_sequences, Cell::value("100.0"));
        assert_eq!(record.length_range, Cell::value("151"));
        assert_eq!(record.avg_length, Cell::value("151.0"));
        assert_eq!(report.record("S10", 1).length_range, Cell::value("35-151"));
    }

    #[test]
    fn last_duplicate_row_wins() {
        let report = parse(
            "S1_R1\ta.fastq.gz\t100\t151\t151\n\
             S1_R1\ta.fastq.gz\t90\t150\t150\n",
        );
        assert_eq!(report.record("S1", 1).total_sequences, Cell::value("90"));
    }

    #[test]
    fn unmatched_read_is_missing() {
        let report = parse("S1_R1\ta.fastq.gz\t100\t151\t151\n");
        let metrics = report.for_sample("S1", ReadLayout::Two);
        assert_eq!(
            metrics.total_sequences,
            vec![Cell::value("100"), Cell::Missing]
        );
        assert_eq!(metrics.report_count, 1);

        let absent = report.for_sample("S2", ReadLayout::Two);
        assert_eq!(absent.avg_lengths, vec![Cell::Missing, Cell::Missing]);
        assert_eq!(absent.report_count, 0);
    }

    #[test]
    fn short_rows_count_as_present_without_metrics() {
        let report = parse("S1_R2\ta.fastq.gz\t100\n");
        assert!(report.contains("S1", 2));
        let record = report.record("S1", 2);
        assert_eq!(record.total_sequences, Cell::value("100"));
        assert_eq!(record.length_range, Cell::Missing);
    }

    #[test]
    fn quote_characters_are_literal() {
        let report = parse("S1_R1\t\"odd name.fastq.gz\t100\t151\t151.0\n");
        let record = report.record("S1", 1);
        assert_eq!(record.total_sequences, Cell::value("100"));
        assert_eq!(record.avg_length, Cell::value("151.0"));
    }

    #[test]
    fn blank_lines_and_crlf_are_tolerated() {
        let report = parse("S1_R1\ta.fastq.gz\t100\t151\t151.0\r\n\nS1_R2\tb.fastq.gz\t100\t151\t151.0\r\n");
        assert_eq!(report.record("S1", 1).avg_length, Cell::value("151.0"));
        assert_eq!(report.for_sample("S1", ReadLayout::Two).report_count, 2);
    }

    #[test]
    fn empty_report_is_fatal() {
        let err = MetricsReport::parse(Utf8Path::new("multiqc.zip"), "").unwrap_err();
        assert_matches!(err, SummaryError::ArchiveFormat { .. });
    }

    #[test]
    fn missing_required_column_is_fatal() {
        let err = MetricsReport::parse(
            Utf8Path::new("multiqc.zip"),
            "Sample\tTotal Sequences\tavg_sequence_length\nS1_R1\t1\t1\n",
        )
        .unwrap_err();
        assert_matches!(err, SummaryError::ArchiveFormat { .. });
    }
}
