//! Result sinks: encode a batch and write it out.
//!
//! A sink receives outcomes in input order and writes one complete
//! document per call, replacing whatever it wrote before.

mod table;

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::model::Outcome;

use table::Table;

/// Errors that can occur while emitting a batch. Always fatal.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to encode CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to write {destination}: {source}")]
    Write {
        destination: Destination,
        source: io::Error,
    },
}

pub type Result<T> = core::result::Result<T, SinkError>;

/// Serialization format of the output document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// A JSON array of flat objects.
    Json,

    /// A CSV table with a header row.
    Csv,
}

impl OutputFormat {
    /// Infer the format from a path's extension: `.csv` is CSV, anything else JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Self::Csv,
            _ => Self::Json,
        }
    }
}

/// How failed lookups appear in the output document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureRendering {
    /// A row of sentinels carrying the identifier and an `error` column.
    #[default]
    Sentinel,

    /// Left out of the document entirely.
    Omit,
}

/// Where the output document goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    File(PathBuf),
    Stdout,
}

impl Destination {
    /// `-` means stdout; anything else is a file path.
    pub fn parse(value: &Path) -> Self {
        if value.as_os_str() == "-" {
            Self::Stdout
        } else {
            Self::File(value.to_path_buf())
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Stdout => f.write_str("stdout"),
        }
    }
}

/// Receives the outcomes of a batch, in input order.
pub trait ResultSink: Send + Sync {
    /// Write a complete document for `outcomes`.
    fn write(&self, outcomes: &[Outcome]) -> Result<()>;
}

/// Encode outcomes in the requested format.
pub fn render(
    outcomes: &[Outcome],
    format: OutputFormat,
    failures: FailureRendering,
) -> Result<Vec<u8>> {
    let table = Table::from_outcomes(outcomes, failures);
    match format {
        OutputFormat::Json => render_json(&table),
        OutputFormat::Csv => render_csv(&table),
    }
}

fn render_json(table: &Table) -> Result<Vec<u8>> {
    let rows: Vec<_> = table.objects().collect();
    let mut out = serde_json::to_vec_pretty(&rows)?;
    out.push(b'\n');
    Ok(out)
}

fn render_csv(table: &Table) -> Result<Vec<u8>> {
    if table.header.is_empty() {
        return Ok(Vec::new());
    }
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&table.header)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| SinkError::Csv(e.into_error().into()))
}

/// Sink that writes the encoded document to a file or stdout.
#[derive(Debug, Clone)]
pub struct OutputSink {
    destination: Destination,
    format: OutputFormat,
    failures: FailureRendering,
}

impl OutputSink {
    pub fn new(destination: Destination, format: OutputFormat, failures: FailureRendering) -> Self {
        Self {
            destination,
            format,
            failures,
        }
    }

    fn write_bytes(&self, bytes: &[u8]) -> io::Result<()> {
        match &self.destination {
            Destination::File(path) => fs::write(path, bytes),
            Destination::Stdout => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(bytes)?;
                stdout.flush()
            }
        }
    }
}

impl ResultSink for OutputSink {
    fn write(&self, outcomes: &[Outcome]) -> Result<()> {
        let bytes = render(outcomes, self.format, self.failures)?;
        self.write_bytes(&bytes).map_err(|source| SinkError::Write {
            destination: self.destination.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::BTreeMap;

    use tempfile::TempDir;

    use super::table::ERROR_FIELD;

    use crate::model::{BatchResult, CITY, FULL_NAME, Identifier, LookupKind, MISSING, Record};

    type Row = BTreeMap<String, String>;

    fn sample_batch() -> BatchResult {
        let mut jane = Record::blank(LookupKind::Email, "a@x.com");
        jane.set(FULL_NAME, "Jane Doe");
        jane.set(CITY, "Lisbon, Portugal");
        jane.set("LinkedinURL", "https://linkedin.com/in/jane");

        let mut bob = Record::blank(LookupKind::Email, "c@z.com");
        bob.set(FULL_NAME, "Bob, \"the builder\"");

        BatchResult::new(vec![
            Outcome::Success(jane),
            Outcome::failure(
                "provider returned 404: not found",
                Identifier::new(LookupKind::Email, "bad@y.com"),
            ),
            Outcome::Success(bob),
        ])
    }

    fn json_rows(bytes: &[u8]) -> Vec<Row> {
        serde_json::from_slice(bytes).unwrap()
    }

    fn csv_rows(bytes: &[u8]) -> Vec<Row> {
        let mut reader = csv::Reader::from_reader(bytes);
        reader.deserialize().map(|r| r.unwrap()).collect()
    }

    #[test]
    fn json_and_csv_carry_the_same_values() {
        let batch = sample_batch();
        let json = render(batch.outcomes(), OutputFormat::Json, FailureRendering::Sentinel).unwrap();
        let csv = render(batch.outcomes(), OutputFormat::Csv, FailureRendering::Sentinel).unwrap();

        let from_json = json_rows(&json);
        let from_csv = csv_rows(&csv);
        assert_eq!(from_json.len(), 3);
        assert_eq!(from_json, from_csv);
    }

    #[test]
    fn scenario_success_then_not_found() {
        let mut jane = Record::blank(LookupKind::Email, "a@x.com");
        jane.set(FULL_NAME, "Jane Doe");
        let outcomes = [
            Outcome::Success(jane),
            Outcome::failure(
                "provider returned 404: not found",
                Identifier::new(LookupKind::Email, "bad@y.com"),
            ),
        ];

        let json = render(&outcomes, OutputFormat::Json, FailureRendering::Sentinel).unwrap();
        let rows = json_rows(&json);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][FULL_NAME], "Jane Doe");
        assert_eq!(rows[0]["email"], "a@x.com");
        assert_eq!(rows[1]["email"], "bad@y.com");
        assert_eq!(rows[1][ERROR_FIELD], "provider returned 404: not found");
        assert!(
            rows[1]
                .iter()
                .filter(|(k, _)| *k != "email" && *k != ERROR_FIELD)
                .all(|(_, v)| v == MISSING)
        );
    }

    #[test]
    fn omitted_failures_leave_no_row() {
        let batch = sample_batch();
        let csv = render(batch.outcomes(), OutputFormat::Csv, FailureRendering::Omit).unwrap();
        let rows = csv_rows(&csv);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["email"], "a@x.com");
        assert_eq!(rows[1]["email"], "c@z.com");
        assert!(!rows[0].contains_key(ERROR_FIELD));
    }

    #[test]
    fn csv_header_follows_record_order() {
        let batch = sample_batch();
        let csv = render(batch.outcomes(), OutputFormat::Csv, FailureRendering::Sentinel).unwrap();
        let text = String::from_utf8(csv).unwrap();
        let header = text.lines().next().unwrap();

        assert_eq!(
            header,
            "fullName,City,Country,LIBio,email,TwitterURL,LinkedinURL,\
             FacebookURL,AngelListURL,KloutURL,YoutubeURL,error"
        );
    }

    #[test]
    fn empty_batch_renders_empty_documents() {
        let json = render(&[], OutputFormat::Json, FailureRendering::Sentinel).unwrap();
        assert_eq!(json, b"[]\n");

        let csv = render(&[], OutputFormat::Csv, FailureRendering::Sentinel).unwrap();
        assert!(csv.is_empty());
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(OutputFormat::from_path(Path::new("out.csv")), OutputFormat::Csv);
        assert_eq!(OutputFormat::from_path(Path::new("OUT.CSV")), OutputFormat::Csv);
        assert_eq!(OutputFormat::from_path(Path::new("out.json")), OutputFormat::Json);
        assert_eq!(OutputFormat::from_path(Path::new("out")), OutputFormat::Json);
    }

    #[test]
    fn dash_is_stdout() {
        assert_eq!(Destination::parse(Path::new("-")), Destination::Stdout);
        assert_eq!(
            Destination::parse(Path::new("out.json")),
            Destination::File(PathBuf::from("out.json"))
        );
    }

    #[test]
    fn output_sink_replaces_file_contents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("output.json");
        let sink = OutputSink::new(
            Destination::File(path.clone()),
            OutputFormat::Json,
            FailureRendering::Sentinel,
        );
        let batch = sample_batch();

        sink.write(&batch.outcomes()[..1]).unwrap();
        sink.write(batch.outcomes()).unwrap();

        let rows = json_rows(&fs::read(&path).unwrap());
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn unwritable_destination_is_a_write_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("output.json");
        let sink = OutputSink::new(
            Destination::File(path),
            OutputFormat::Json,
            FailureRendering::Sentinel,
        );

        let err = sink.write(sample_batch().outcomes()).unwrap_err();
        assert!(matches!(err, SinkError::Write { .. }));
    }
}
