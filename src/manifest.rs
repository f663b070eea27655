use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::Read;

use camino::{Utf8Path, Utf8PathBuf};
use regex::Regex;
use tracing::debug;

use crate::domain::{Cell, ReadLayout, Sample, base_name};
use crate::error::SummaryError;

pub const SAMPLE_COLUMN: &str = "Sample Name";

#[derive(Debug, Clone)]
pub struct Manifest {
    pub path: Utf8PathBuf,
    pub layout: ReadLayout,
    pub samples: Vec<Sample>,
}

impl Manifest {
    pub fn load(path: &Utf8Path) -> Result<Self, SummaryError> {
        let file = fs::File::open(path.as_std_path()).map_err(|err| SummaryError::ManifestRead {
            kind: "sample sheet",
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        Self::from_reader(path, file)
    }

    pub fn from_reader<R: Read>(path: &Utf8Path, reader: R) -> Result<Self, SummaryError> {
        let read_err = |err: csv::Error| SummaryError::ManifestRead {
            kind: "sample sheet",
            path: path.to_path_buf(),
            message: err.to_string(),
        };

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .flexible(true)
            .from_reader(reader);
        let headers = reader.headers().map_err(read_err)?.clone();

        let sample_col = headers
            .iter()
            .position(|name| name == SAMPLE_COLUMN)
            .ok_or_else(|| {
                SummaryError::malformed_manifest(path, format!("missing `{SAMPLE_COLUMN}` column"))
            })?;
        let read_cols = read_path_columns(path, &headers)?;
        let layout = ReadLayout::from_count(read_cols.len()).ok_or_else(|| {
            SummaryError::malformed_manifest(
                path,
                format!(
                    "expected 2 to 4 read path columns, found {}",
                    read_cols.len()
                ),
            )
        })?;

        let mut samples = Vec::new();
        let mut seen = HashSet::new();
        for (line, record) in reader.records().enumerate() {
            let record = record.map_err(read_err)?;
            let id = record.get(sample_col).unwrap_or_default().to_string();
            if id.is_empty() {
                return Err(SummaryError::malformed_manifest(
                    path,
                    format!("row {} has an empty sample name", line + 2),
                ));
            }
            if !seen.insert(id.clone()) {
                return Err(SummaryError::malformed_manifest(
                    path,
                    format!("duplicate sample name `{id}`"),
                ));
            }
            let read_paths = read_cols
                .iter()
                .map(|&col| {
                    record
                        .get(col)
                        .filter(|value| !value.trim().is_empty())
                        .map(str::to_string)
                })
                .collect();
            samples.push(Sample { id, read_paths });
        }

        debug!(
            samples = samples.len(),
            reads_per_sample = layout.count(),
            "loaded sample sheet {path}"
        );
        Ok(Self {
            path: path.to_path_buf(),
            layout,
            samples,
        })
    }

    pub fn sorted_samples(&self) -> Vec<&Sample> {
        let mut samples = self.samples.iter().collect::<Vec<_>>();
        samples.sort_by(|a, b| a.id.cmp(&b.id));
        samples
    }
}

fn read_path_columns(path: &Utf8Path, headers: &csv::StringRecord) -> Result<Vec<usize>, SummaryError> {
    let pattern = Regex::new(r"^read(\d+)_path$")
        .map_err(|err| SummaryError::malformed_manifest(path, err.to_string()))?;

    let mut columns = headers
        .iter()
        .enumerate()
        .filter_map(|(pos, name)| {
            let number = pattern.captures(name)?.get(1)?.as_str().parse::<usize>().ok()?;
            Some((number, pos))
        })
        .collect::<Vec<_>>();
    columns.sort();

    for (expected, (number, _)) in (1..).zip(&columns) {
        if *number != expected {
            return Err(SummaryError::malformed_manifest(
                path,
                format!("read path columns are not numbered consecutively from read1_path (found read{number}_path)"),
            ));
        }
    }
    Ok(columns.into_iter().map(|(_, pos)| pos).collect())
}

/// Checksums keyed by base filename, parsed from `<checksum> <filename>` lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChecksumMap {
    entries: HashMap<String, String>,
}

impl ChecksumMap {
    pub fn load(path: &Utf8Path) -> Result<Self, SummaryError> {
        let content =
            fs::read_to_string(path.as_std_path()).map_err(|err| SummaryError::ManifestRead {
                kind: "checksum listing",
                path: path.to_path_buf(),
                message: err.to_string(),
            })?;
        let map = Self::parse(&content);
        debug!(entries = map.len(), "loaded checksum listing {path}");
        Ok(map)
    }

    pub fn parse(content: &str) -> Self {
        let mut entries = HashMap::new();
        for line in content.lines() {
            let parts = line.split_whitespace().collect::<Vec<_>>();
            let [checksum, file] = parts.as_slice() else {
                continue;
            };
            if let Some(name) = base_name(file) {
                entries.insert(name, checksum.to_string());
            }
        }
        Self { entries }
    }

    pub fn get(&self, file_name: &str) -> Cell {
        Cell::from_option(self.entries.get(file_name).cloned())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
