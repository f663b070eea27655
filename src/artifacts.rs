use std::fs;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::warn;

use crate::domain::Cell;

pub const GZIP_CHECK_SUFFIX: &str = ".gzip_check";
pub const FASTQ_INFO_SUFFIX: &str = ".fastq_info";

/// Plain raw name first, then the host-read-removed variant.
pub fn renamed_candidates(sample_id: &str, read_index: usize) -> [String; 2] {
    [
        format!("{sample_id}_R{read_index}_raw.fastq.gz"),
        format!("{sample_id}_R{read_index}_HRremoved_raw.fastq.gz"),
    ]
}

pub trait ArtifactSource: Send + Sync {
    fn read_exists(&self, file_name: &str) -> bool;

    fn gzip_result(&self, check_file: &str) -> Cell;

    fn fastq_info_result(&self, check_file: &str) -> Cell;
}

#[derive(Debug, Clone)]
pub struct FsArtifacts {
    read_dir: Utf8PathBuf,
    gzip_dir: Utf8PathBuf,
    fastq_info_dir: Utf8PathBuf,
}

impl FsArtifacts {
    pub fn new(read_dir: Utf8PathBuf, gzip_dir: Utf8PathBuf, fastq_info_dir: Utf8PathBuf) -> Self {
        Self {
            read_dir,
            gzip_dir,
            fastq_info_dir,
        }
    }
}

impl ArtifactSource for FsArtifacts {
    fn read_exists(&self, file_name: &str) -> bool {
        self.read_dir.join(file_name).as_std_path().exists()
    }

    fn gzip_result(&self, check_file: &str) -> Cell {
        read_status(&self.gzip_dir.join(check_file))
    }

    fn fastq_info_result(&self, check_file: &str) -> Cell {
        read_status(&self.fastq_info_dir.join(check_file))
    }
}

pub fn read_status(path: &Utf8Path) -> Cell {
    match fs::read_to_string(path.as_std_path()) {
        Ok(content) => Cell::value(content.trim()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Cell::Missing,
        Err(err) => {
            warn!("unable to read check result {path}: {err}");
            Cell::Missing
        }
    }
}
