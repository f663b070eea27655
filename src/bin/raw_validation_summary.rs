use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::Parser;
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use raw_validation_summary::app::App;
use raw_validation_summary::config::{Config, ConfigLoader};
use raw_validation_summary::domain::AssayMode;
use raw_validation_summary::error::SummaryError;
use raw_validation_summary::output::{JsonOutput, OutputMode, TextOutput};

#[derive(Parser)]
#[command(name = "raw-validation-summary")]
#[command(about = "Build the per-sample raw FASTQ validation summary table")]
#[command(version)]
struct Cli {
    /// JSON file with any of the options below; command-line values win.
    #[arg(long)]
    config: Option<Utf8PathBuf>,

    #[arg(long, alias = "sample_sheet")]
    sample_sheet: Option<Utf8PathBuf>,

    #[arg(long)]
    accession: Option<String>,

    /// Directory holding the renamed read files.
    #[arg(long, alias = "read_dir")]
    read_dir: Option<Utf8PathBuf>,

    #[arg(long, alias = "gzip_dir")]
    gzip_dir: Option<Utf8PathBuf>,

    #[arg(long, alias = "fastq_info_dir")]
    fastq_info_dir: Option<Utf8PathBuf>,

    /// Checksum listing of the renamed files.
    #[arg(long)]
    md5: Option<Utf8PathBuf>,

    #[arg(long, alias = "multiqc_data_zip")]
    multiqc_data_zip: Option<Utf8PathBuf>,

    /// Expected checksums keyed by original filename.
    #[arg(long, alias = "reference_md5")]
    reference_md5: Option<Utf8PathBuf>,

    #[arg(long, value_enum, conflicts_with_all = ["atacseq", "single_cell"])]
    assay: Option<AssayMode>,

    #[arg(long, conflicts_with = "single_cell")]
    atacseq: bool,

    #[arg(long, alias = "single_cell")]
    single_cell: bool,

    /// Read files per sample; must agree with the sheet's read path columns.
    #[arg(long, alias = "files_per_sample")]
    files_per_sample: Option<usize>,

    #[arg(long, alias = "output_dir")]
    output_dir: Option<Utf8PathBuf>,

    /// Print the run summary as JSON on stdout.
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn overrides(&self) -> Config {
        let assay = if self.atacseq {
            Some(AssayMode::Atacseq)
        } else if self.single_cell {
            Some(AssayMode::SingleCell)
        } else {
            self.assay
        };
        Config {
            sample_sheet: self.sample_sheet.clone(),
            accession: self.accession.clone(),
            read_dir: self.read_dir.clone(),
            gzip_dir: self.gzip_dir.clone(),
            fastq_info_dir: self.fastq_info_dir.clone(),
            md5: self.md5.clone(),
            multiqc_data_zip: self.multiqc_data_zip.clone(),
            reference_md5: self.reference_md5.clone(),
            assay,
            files_per_sample: self.files_per_sample,
            output_dir: self.output_dir.clone(),
        }
    }
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(error) = report.downcast_ref::<SummaryError>() {
            return ExitCode::from(map_exit_code(error));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &SummaryError) -> u8 {
    match error {
        SummaryError::MalformedManifest { .. } | SummaryError::ManifestRead { .. } => 2,
        SummaryError::ArchiveFormat { .. } | SummaryError::ArchiveRead { .. } => 3,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Text
    };

    let config = ConfigLoader::resolve(cli.config.as_deref(), cli.overrides())?;
    let app = App::from_config(config);

    match output_mode {
        OutputMode::Json => {
            let summary = app.run(&JsonOutput)?;
            JsonOutput::print_summary(&summary).into_diagnostic()?;
        }
        OutputMode::Text => {
            let summary = app.run(&TextOutput)?;
            TextOutput::print_summary(&summary);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_flags_select_assay() {
        let cli = Cli::parse_from(["raw-validation-summary", "--atacseq", "--accession", "OSD-1"]);
        assert_eq!(cli.overrides().assay, Some(AssayMode::Atacseq));

        let cli = Cli::parse_from(["raw-validation-summary", "--single_cell"]);
        assert_eq!(cli.overrides().assay, Some(AssayMode::SingleCell));

        let cli = Cli::parse_from(["raw-validation-summary", "--assay", "single-cell"]);
        assert_eq!(cli.overrides().assay, Some(AssayMode::SingleCell));
    }

    #[test]
    fn files_per_sample_flag_accepted() {
        let cli = Cli::parse_from(["raw-validation-summary", "--files_per_sample", "3"]);
        assert_eq!(cli.overrides().files_per_sample, Some(3));

        let cli = Cli::parse_from(["raw-validation-summary", "--files-per-sample", "2"]);
        assert_eq!(cli.overrides().files_per_sample, Some(2));
    }

    #[test]
    fn underscore_aliases_accepted() {
        let cli = Cli::parse_from([
            "raw-validation-summary",
            "--sample_sheet",
            "samples.tsv",
            "--multiqc_data_zip",
            "multiqc.zip",
        ]);
        let overrides = cli.overrides();
        assert_eq!(overrides.sample_sheet, Some(Utf8PathBuf::from("samples.tsv")));
        assert_eq!(overrides.files_per_sample, None);
        assert_eq!(
            overrides.multiqc_data_zip,
            Some(Utf8PathBuf::from("multiqc.zip"))
        );
    }
}
