use std::fmt;
use std::ops::RangeInclusive;

use camino::Utf8Path;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// `Missing` means the lookup found nothing; `Value("")` means the artifact
/// exists but is empty. Both render as an empty cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Cell {
    #[default]
    Missing,
    Value(String),
}

impl Cell {
    pub fn value(value: impl Into<String>) -> Self {
        Cell::Value(value.into())
    }

    pub fn from_option(value: Option<String>) -> Self {
        value.map(Cell::Value).unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        match self {
            Cell::Missing => "",
            Cell::Value(value) => value,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.as_str().is_empty()
    }

    pub fn as_option(&self) -> Option<&str> {
        match self {
            Cell::Value(value) if !value.is_empty() => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadLayout {
    Two,
    Three,
    Four,
}

impl ReadLayout {
    pub fn from_count(count: usize) -> Option<Self> {
        match count {
            2 => Some(ReadLayout::Two),
            3 => Some(ReadLayout::Three),
            4 => Some(ReadLayout::Four),
            _ => None,
        }
    }

    pub fn count(self) -> usize {
        match self {
            ReadLayout::Two => 2,
            ReadLayout::Three => 3,
            ReadLayout::Four => 4,
        }
    }

    pub fn indices(self) -> RangeInclusive<usize> {
        1..=self.count()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum AssayMode {
    #[default]
    Standard,
    Atacseq,
    SingleCell,
}

impl AssayMode {
    pub fn paired_check(self, layout: ReadLayout) -> PairedCheck {
        match (self, layout) {
            (_, ReadLayout::Four) => PairedCheck::None,
            (AssayMode::Standard, _) => PairedCheck::Paired,
            (AssayMode::Atacseq, _) => PairedCheck::PairedR1R3,
            (AssayMode::SingleCell, ReadLayout::Three) => PairedCheck::PairedR1R3,
            (AssayMode::SingleCell, _) => PairedCheck::None,
        }
    }
}

impl fmt::Display for AssayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssayMode::Standard => write!(f, "standard"),
            AssayMode::Atacseq => write!(f, "atacseq"),
            AssayMode::SingleCell => write!(f, "single-cell"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairedCheck {
    Paired,
    PairedR1R3,
    None,
}

impl PairedCheck {
    pub fn file_name(self, sample_id: &str) -> Option<String> {
        match self {
            PairedCheck::Paired => Some(format!("{sample_id}_paired.fastq_info")),
            PairedCheck::PairedR1R3 => Some(format!("{sample_id}_paired_R1_R3.fastq_info")),
            PairedCheck::None => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub id: String,
    pub read_paths: Vec<Option<String>>,
}

impl Sample {
    pub fn original_filenames(&self) -> Vec<Cell> {
        self.read_paths
            .iter()
            .map(|path| match path {
                Some(path) => Cell::from_option(base_name(path)),
                None => Cell::Missing,
            })
            .collect()
    }
}

pub fn base_name(path: &str) -> Option<String> {
    Utf8Path::new(path.trim())
        .file_name()
        .map(|name| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_cells() {
        assert!(Cell::Missing.is_blank());
        assert!(Cell::value("").is_blank());
        assert_eq!(Cell::value("").as_option(), None);
        assert_eq!(Cell::value("PASS").as_option(), Some("PASS"));
    }

    #[test]
    fn layout_from_count() {
        assert_eq!(ReadLayout::from_count(3), Some(ReadLayout::Three));
        assert_eq!(ReadLayout::from_count(1), None);
        assert_eq!(ReadLayout::from_count(5), None);
        assert_eq!(ReadLayout::Four.indices().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn paired_check_routing() {
        assert_eq!(
            AssayMode::Standard.paired_check(ReadLayout::Two),
            PairedCheck::Paired
        );
        assert_eq!(
            AssayMode::Atacseq.paired_check(ReadLayout::Three),
            PairedCheck::PairedR1R3
        );
        assert_eq!(
            AssayMode::SingleCell.paired_check(ReadLayout::Three),
            PairedCheck::PairedR1R3
        );
        assert_eq!(
            AssayMode::SingleCell.paired_check(ReadLayout::Two),
            PairedCheck::None
        );
        assert_eq!(
            AssayMode::Standard.paired_check(ReadLayout::Four),
            PairedCheck::None
        );
        assert_eq!(
            PairedCheck::PairedR1R3.file_name("S1").as_deref(),
            Some("S1_paired_R1_R3.fastq_info")
        );
    }

    #[test]
    fn original_filenames_use_base_name() {
        let sample = Sample {
            id: "S1".to_string(),
            read_paths: vec![Some("raw/run1/a_R1.fastq.gz".to_string()), None],
        };
        assert_eq!(
            sample.original_filenames(),
            vec![Cell::value("a_R1.fastq.gz"), Cell::Missing]
        );
    }
}
