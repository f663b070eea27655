use std::io::{self, Write};

use serde::Serialize;

use crate::app::{ProgressEvent, ProgressSink, RunSummary};

#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    Text,
    Json,
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_summary(result: &RunSummary) -> io::Result<()> {
        Self::print_json(result)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

impl ProgressSink for JsonOutput {
    fn event(&self, _event: ProgressEvent) {}
}

pub struct TextOutput;

impl TextOutput {
    pub fn print_summary(result: &RunSummary) {
        eprintln!("validation summary: {}", result.output_path);
        eprintln!(
            "  samples: {} ({} read files each, assay {})",
            result.samples, result.read_files_per_sample, result.assay
        );
        eprintln!(
            "  md5 verification columns: {}",
            if result.md5_check_columns { "yes" } else { "no" }
        );
        if !result.samples_missing_from_multiqc.is_empty() {
            eprintln!(
                "  missing from MultiQC report: {}",
                result.samples_missing_from_multiqc.join(", ")
            );
        }
    }
}

impl ProgressSink for TextOutput {
    fn event(&self, event: ProgressEvent) {
        match event.elapsed {
            Some(elapsed) => eprintln!("{} ({} ms)", event.message, elapsed.as_millis()),
            None => eprintln!("{}", event.message),
        }
    }
}
