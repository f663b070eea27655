use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::domain::AssayMode;
use crate::error::SummaryError;

/// On-disk JSON config. Every field may also come from the command line.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub sample_sheet: Option<Utf8PathBuf>,
    #[serde(default)]
    pub accession: Option<String>,
    #[serde(default)]
    pub read_dir: Option<Utf8PathBuf>,
    #[serde(default)]
    pub gzip_dir: Option<Utf8PathBuf>,
    #[serde(default)]
    pub fastq_info_dir: Option<Utf8PathBuf>,
    #[serde(default)]
    pub md5: Option<Utf8PathBuf>,
    #[serde(default)]
    pub multiqc_data_zip: Option<Utf8PathBuf>,
    #[serde(default)]
    pub reference_md5: Option<Utf8PathBuf>,
    #[serde(default)]
    pub assay: Option<AssayMode>,
    #[serde(default)]
    pub files_per_sample: Option<usize>,
    #[serde(default)]
    pub output_dir: Option<Utf8PathBuf>,
}

impl Config {
    pub fn merge(self, overrides: Config) -> Config {
        Config {
            sample_sheet: overrides.sample_sheet.or(self.sample_sheet),
            accession: overrides.accession.or(self.accession),
            read_dir: overrides.read_dir.or(self.read_dir),
            gzip_dir: overrides.gzip_dir.or(self.gzip_dir),
            fastq_info_dir: overrides.fastq_info_dir.or(self.fastq_info_dir),
            md5: overrides.md5.or(self.md5),
            multiqc_data_zip: overrides.multiqc_data_zip.or(self.multiqc_data_zip),
            reference_md5: overrides.reference_md5.or(self.reference_md5),
            assay: overrides.assay.or(self.assay),
            files_per_sample: overrides.files_per_sample.or(self.files_per_sample),
            output_dir: overrides.output_dir.or(self.output_dir),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub sample_sheet: Utf8PathBuf,
    pub accession: String,
    pub read_dir: Utf8PathBuf,
    pub gzip_dir: Utf8PathBuf,
    pub fastq_info_dir: Utf8PathBuf,
    pub md5: Utf8PathBuf,
    pub multiqc_data_zip: Utf8PathBuf,
    pub reference_md5: Option<Utf8PathBuf>,
    pub assay: AssayMode,
    pub files_per_sample: Option<usize>,
    pub output_dir: Utf8PathBuf,
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn resolve(path: Option<&Utf8Path>, overrides: Config) -> Result<RunConfig, SummaryError> {
        let base = match path {
            Some(path) => Self::read(path)?,
            None => Config::default(),
        };
        Self::resolve_config(base.merge(overrides))
    }

    pub fn read(path: &Utf8Path) -> Result<Config, SummaryError> {
        let content = fs::read_to_string(path.as_std_path())
            .map_err(|_| SummaryError::ConfigRead(path.to_path_buf()))?;
        serde_json::from_str(&content).map_err(|err| SummaryError::ConfigParse(err.to_string()))
    }

    pub fn resolve_config(config: Config) -> Result<RunConfig, SummaryError> {
        fn required<T>(value: Option<T>, name: &str) -> Result<T, SummaryError> {
            value.ok_or_else(|| SummaryError::InvalidConfig(format!("missing required `{name}`")))
        }

        let accession = required(config.accession, "accession")?;
        if accession.trim().is_empty() || accession.contains(['/', '\\']) {
            return Err(SummaryError::InvalidConfig(format!(
                "accession `{accession}` cannot be used in a file name"
            )));
        }

        Ok(RunConfig {
            sample_sheet: required(config.sample_sheet, "sample_sheet")?,
            accession,
            read_dir: required(config.read_dir, "read_dir")?,
            gzip_dir: required(config.gzip_dir, "gzip_dir")?,
            fastq_info_dir: required(config.fastq_info_dir, "fastq_info_dir")?,
            md5: required(config.md5, "md5")?,
            multiqc_data_zip: required(config.multiqc_data_zip, "multiqc_data_zip")?,
            reference_md5: config.reference_md5,
            assay: config.assay.unwrap_or_default(),
            // 0 was the old "not given" default.
            files_per_sample: config.files_per_sample.filter(|count| *count > 0),
            output_dir: config.output_dir.unwrap_or_else(|| Utf8PathBuf::from(".")),
        })
    }
}
