use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{info, warn};

use crate::artifacts::{ArtifactSource, FsArtifacts};
use crate::config::RunConfig;
use crate::error::SummaryError;
use crate::join::{RowJoiner, SampleRow};
use crate::manifest::{ChecksumMap, Manifest};
use crate::metrics::MetricsReport;
use crate::schema::Schema;
use crate::table::{output_file_name, write_table_atomic};

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub accession: String,
    pub output_path: String,
    pub samples: usize,
    pub read_files_per_sample: usize,
    pub assay: String,
    pub md5_check_columns: bool,
    pub samples_missing_from_multiqc: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub message: String,
    pub elapsed: Option<Duration>,
}

pub trait ProgressSink {
    fn event(&self, event: ProgressEvent);
}

#[derive(Debug, Clone)]
pub struct SummaryTable {
    pub schema: Schema,
    pub rows: Vec<SampleRow>,
}

pub struct App<A: ArtifactSource> {
    config: RunConfig,
    artifacts: A,
}

impl App<FsArtifacts> {
    pub fn from_config(config: RunConfig) -> Self {
        let artifacts = FsArtifacts::new(
            config.read_dir.clone(),
            config.gzip_dir.clone(),
            config.fastq_info_dir.clone(),
        );
        Self::new(config, artifacts)
    }
}

impl<A: ArtifactSource> App<A> {
    pub fn new(config: RunConfig, artifacts: A) -> Self {
        Self { config, artifacts }
    }

    pub fn build(&self, sink: &dyn ProgressSink) -> Result<SummaryTable, SummaryError> {
        let config = &self.config;

        sink.event(ProgressEvent {
            message: format!("phase=Load; sample sheet {}", config.sample_sheet),
            elapsed: None,
        });
        let manifest = Manifest::load(&config.sample_sheet)?;
        if let Some(expected) = config.files_per_sample
            && expected != manifest.layout.count()
        {
            return Err(SummaryError::malformed_manifest(
                config.sample_sheet.clone(),
                format!(
                    "expected {expected} read files per sample, sheet has {} read path columns",
                    manifest.layout.count()
                ),
            ));
        }
        let checksums = ChecksumMap::load(&config.md5)?;
        let reference = self.load_reference()?;

        sink.event(ProgressEvent {
            message: format!("phase=Load; multiqc archive {}", config.multiqc_data_zip),
            elapsed: None,
        });
        let start = Instant::now();
        let metrics = MetricsReport::load(&config.multiqc_data_zip)?;
        sink.event(ProgressEvent {
            message: "phase=Load; multiqc report parsed".to_string(),
            elapsed: Some(start.elapsed()),
        });

        let schema = Schema::build(manifest.layout, reference.is_some());
        let joiner = RowJoiner {
            layout: manifest.layout,
            assay: config.assay,
            checksums: &checksums,
            reference_checksums: reference.as_ref(),
            metrics: &metrics,
            artifacts: &self.artifacts,
        };

        sink.event(ProgressEvent {
            message: format!("phase=Join; {} samples", manifest.samples.len()),
            elapsed: None,
        });
        let rows = manifest
            .sorted_samples()
            .into_iter()
            .map(|sample| joiner.join(sample))
            .collect::<Vec<_>>();

        Ok(SummaryTable { schema, rows })
    }

    pub fn run(&self, sink: &dyn ProgressSink) -> Result<RunSummary, SummaryError> {
        let table = self.build(sink)?;
        let output_path = self
            .config
            .output_dir
            .join(output_file_name(&self.config.accession));

        sink.event(ProgressEvent {
            message: format!("phase=Write; {output_path}"),
            elapsed: None,
        });
        write_table_atomic(&output_path, &table.schema, &table.rows)?;

        let samples_missing_from_multiqc = table
            .rows
            .iter()
            .filter(|row| row.missing_from_metrics())
            .map(|row| row.sample_id.clone())
            .collect::<Vec<_>>();
        if !samples_missing_from_multiqc.is_empty() {
            warn!(
                samples = ?samples_missing_from_multiqc,
                "samples have no FastQC entries in the MultiQC report"
            );
        }
        info!(
            samples = table.rows.len(),
            "wrote validation summary {output_path}"
        );

        Ok(RunSummary {
            accession: self.config.accession.clone(),
            output_path: output_path.to_string(),
            samples: table.rows.len(),
            read_files_per_sample: table.schema.layout.count(),
            assay: self.config.assay.to_string(),
            md5_check_columns: table.schema.md5_check,
            samples_missing_from_multiqc,
        })
    }

    /// A reference listing that is absent or has no entries disables md5 verification.
    fn load_reference(&self) -> Result<Option<ChecksumMap>, SummaryError> {
        let Some(path) = &self.config.reference_md5 else {
            return Ok(None);
        };
        if !path.as_std_path().exists() {
            warn!("reference md5 file {path} does not exist, skipping md5 verification");
            return Ok(None);
        }
        let reference = ChecksumMap::load(path)?;
        if reference.is_empty() {
            warn!("reference md5 file {path} has no entries, skipping md5 verification");
            return Ok(None);
        }
        Ok(Some(reference))
    }
}
