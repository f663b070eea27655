use std::fs;
use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::error::SummaryError;
use crate::join::SampleRow;
use crate::schema::Schema;

pub fn output_file_name(accession: &str) -> String {
    format!("{accession}-raw-validation-summary.tsv")
}

/// Fields are quoted only when they contain a delimiter, quote or newline.
pub fn write_table<W: Write>(
    writer: W,
    schema: &Schema,
    rows: &[SampleRow],
) -> Result<(), SummaryError> {
    write_records(writer, schema, rows, None)
}

pub fn write_table_atomic(
    path: &Utf8Path,
    schema: &Schema,
    rows: &[SampleRow],
) -> Result<(), SummaryError> {
    let table_err = |message: String| SummaryError::TableWrite {
        path: path.to_path_buf(),
        message,
    };
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent.to_path_buf(),
        _ => Utf8PathBuf::from("."),
    };
    fs::create_dir_all(parent.as_std_path()).map_err(|err| table_err(err.to_string()))?;

    let mut temp = tempfile::Builder::new()
        .prefix(".raw-validation-summary")
        .tempfile_in(parent.as_std_path())
        .map_err(|err| table_err(err.to_string()))?;
    write_records(temp.as_file_mut(), schema, rows, Some(path))?;
    temp.persist(path.as_std_path())
        .map_err(|err| table_err(err.to_string()))?;
    Ok(())
}

fn write_records<W: Write>(
    writer: W,
    schema: &Schema,
    rows: &[SampleRow],
    target: Option<&Utf8Path>,
) -> Result<(), SummaryError> {
    let mut writer = WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);
    let write_err = |message: String| match target {
        Some(path) => SummaryError::TableWrite {
            path: path.to_path_buf(),
            message,
        },
        None => SummaryError::Filesystem(message),
    };

    let expected = schema.columns().len();
    writer
        .write_record(schema.columns())
        .map_err(|err| write_err(err.to_string()))?;
    for row in rows {
        let record = row.to_record();
        if record.len() != expected {
            return Err(SummaryError::RowShape {
                sample: row.sample_id.clone(),
                expected,
                found: record.len(),
            });
        }
        writer
            .write_record(&record)
            .map_err(|err| write_err(err.to_string()))?;
    }
    writer.flush().map_err(|err| write_err(err.to_string()))?;
    Ok(())
}
