use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum SummaryError {
    #[error("malformed sample sheet {path}: {message}")]
    #[diagnostic(help("expected a tab-delimited sheet with `Sample Name` and read1_path..readK_path (K = 2, 3 or 4)"))]
    MalformedManifest { path: Utf8PathBuf, message: String },

    #[error("failed to read {kind} at {path}: {message}")]
    ManifestRead {
        kind: &'static str,
        path: Utf8PathBuf,
        message: String,
    },

    #[error("malformed metrics archive {path}: {message}")]
    ArchiveFormat { path: Utf8PathBuf, message: String },

    #[error("failed to open metrics archive {path}: {message}")]
    ArchiveRead { path: Utf8PathBuf, message: String },

    #[error("row for sample {sample} has {found} cells, header has {expected}")]
    RowShape {
        sample: String,
        expected: usize,
        found: usize,
    },

    #[error("failed to write summary table {path}: {message}")]
    TableWrite { path: Utf8PathBuf, message: String },

    #[error("failed to read config file at {0}")]
    ConfigRead(Utf8PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),
}

impl SummaryError {
    pub fn malformed_manifest(path: impl Into<Utf8PathBuf>, message: impl Into<String>) -> Self {
        Self::MalformedManifest {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn archive_format(path: impl Into<Utf8PathBuf>, message: impl Into<String>) -> Self {
        Self::ArchiveFormat {
            path: path.into(),
            message: message.into(),
        }
    }
}
