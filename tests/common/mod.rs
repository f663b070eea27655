#![allow(dead_code)]

use std::fs;
use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use raw_validation_summary::config::RunConfig;
use raw_validation_summary::domain::AssayMode;

pub const FASTQC_HEADER: &str =
    "Sample\tFilename\tFile type\tEncoding\tTotal Sequences\tSequence length\t%GC\tavg_sequence_length";

/// On-disk layout of one pipeline run.
pub struct Fixture {
    _temp: tempfile::TempDir,
    pub root: Utf8PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let temp = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        for dir in ["reads", "gzip", "fastq_info", "out"] {
            fs::create_dir_all(root.join(dir).as_std_path()).unwrap();
        }
        Self { _temp: temp, root }
    }

    pub fn write(&self, relative: &str, content: &str) -> Utf8PathBuf {
        let path = self.root.join(relative);
        fs::write(path.as_std_path(), content).unwrap();
        path
    }

    pub fn touch_read(&self, name: &str) {
        self.write(&format!("reads/{name}"), "");
    }

    pub fn sample_sheet(&self, content: &str) {
        self.write("samples.tsv", content);
    }

    pub fn md5(&self, content: &str) {
        self.write("md5.txt", content);
    }

    pub fn multiqc_zip(&self, members: &[(&str, &str)]) {
        write_zip(&self.root.join("multiqc_data.zip"), members);
    }

    /// MultiQC archive holding `multiqc_fastqc.txt` built from
    /// `(sample, total sequences, length range, avg length)` rows.
    pub fn fastqc_report(&self, rows: &[(&str, &str, &str, &str)]) {
        let mut table = format!("{FASTQC_HEADER}\n");
        for (sample, total, range, avg) in rows {
            table.push_str(&format!(
                "{sample}\t{sample}.fastq.gz\tConventional base calls\tSanger / Illumina 1.9\t{total}\t{range}\t48.0\t{avg}\n"
            ));
        }
        self.multiqc_zip(&[("multiqc_data/multiqc_fastqc.txt", &table)]);
    }

    pub fn config(&self) -> RunConfig {
        RunConfig {
            sample_sheet: self.root.join("samples.tsv"),
            accession: "OSD-123".to_string(),
            read_dir: self.root.join("reads"),
            gzip_dir: self.root.join("gzip"),
            fastq_info_dir: self.root.join("fastq_info"),
            md5: self.root.join("md5.txt"),
            multiqc_data_zip: self.root.join("multiqc_data.zip"),
            reference_md5: None,
            assay: AssayMode::Standard,
            files_per_sample: None,
            output_dir: self.root.join("out"),
        }
    }

    pub fn read_output(&self) -> Vec<Vec<String>> {
        let path = self.root.join("out").join("OSD-123-raw-validation-summary.tsv");
        let text = fs::read_to_string(path.as_std_path()).unwrap();
        text.lines()
            .map(|line| line.split('\t').map(str::to_string).collect())
            .collect()
    }
}

pub fn write_zip(path: &Utf8Path, members: &[(&str, &str)]) {
    let file = fs::File::create(path.as_std_path()).unwrap();
    let mut zip = ZipWriter::new(file);
    for (name, content) in members {
        zip.start_file(*name, SimpleFileOptions::default()).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
}

/// Value of `column` in the row for `sample`.
pub fn cell<'a>(table: &'a [Vec<String>], sample: &str, column: &str) -> &'a str {
    let col = table[0]
        .iter()
        .position(|name| name == column)
        .unwrap_or_else(|| panic!("no column {column}"));
    let row = table
        .iter()
        .skip(1)
        .find(|row| row[0] == sample)
        .unwrap_or_else(|| panic!("no row for {sample}"));
    &row[col]
}
