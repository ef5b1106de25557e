//! CSV input records and result report.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::model::{BatchReport, Criterion, TestRecord};

/// Columns every input file must carry.
pub const REQUIRED_COLUMNS: [&str; 4] = ["id", "number", "instruction", "numtest"];

/// Upper bound on `numtest`. Each trial places a real call.
pub const MAX_TRIALS_PER_RECORD: u32 = 1000;

/// Output header, in column order.
pub const OUTPUT_HEADER: [&str; 14] = [
    "ID",
    "Passed",
    "Reasoning",
    "Transcript",
    "Instruction",
    "Test",
    "Title",
    "Number",
    "CallID",
    "Recording URL",
    "Receiver Call ID",
    "Trial",
    "Criterion",
    "Abort Reason",
];

#[derive(Debug, Error)]
pub enum TabularError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("missing required column: {name}")]
    MissingColumn { name: &'static str },

    #[error("line {line}: invalid {name}: {message}")]
    InvalidField {
        line: usize,
        name: &'static str,
        message: String,
    },
}

pub fn read_records(path: &Path) -> Result<Vec<TestRecord>, TabularError> {
    let file = File::open(path)?;
    let records = parse_records(file)?;
    debug!(path = %path.display(), records = records.len(), "loaded test records");
    Ok(records)
}

/// Parse test records from CSV. Header names are trimmed and lowercased.
pub fn parse_records<R: Read>(reader: R) -> Result<Vec<TestRecord>, TabularError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    for name in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == name) {
            return Err(TabularError::MissingColumn { name });
        }
    }

    let mut records = Vec::new();
    for (i, row) in rdr.records().enumerate() {
        let row = row?;
        // Line 1 is the header.
        records.push(record_from_row(&headers, &row, i + 2)?);
    }
    Ok(records)
}

fn record_from_row(
    headers: &[String],
    row: &csv::StringRecord,
    line: usize,
) -> Result<TestRecord, TabularError> {
    let mut record = TestRecord::default();
    let mut criteria: Vec<(u32, Criterion)> = Vec::new();
    let mut extra = BTreeMap::new();

    for (name, value) in headers.iter().zip(row.iter()) {
        match name.as_str() {
            "id" => record.id = value.trim().to_string(),
            "number" => record.number = value.trim().to_string(),
            "title" => record.title = value.to_string(),
            "instruction" => record.instruction = value.to_string(),
            "numtest" => {
                record.numtest =
                    value
                        .trim()
                        .parse()
                        .map_err(|e: std::num::ParseIntError| TabularError::InvalidField {
                            line,
                            name: "numtest",
                            message: format!("{:?}: {}", value, e),
                        })?;
                if record.numtest > MAX_TRIALS_PER_RECORD {
                    return Err(TabularError::InvalidField {
                        line,
                        name: "numtest",
                        message: format!(
                            "{} exceeds the limit of {} trials per record",
                            record.numtest, MAX_TRIALS_PER_RECORD
                        ),
                    });
                }
            }
            other => match criterion_index(other) {
                Some(n) => {
                    if !value.trim().is_empty() {
                        criteria.push((n, Criterion::new(other, value)));
                    }
                }
                None => {
                    extra.insert(other.to_string(), value.to_string());
                }
            },
        }
    }

    if record.id.is_empty() {
        return Err(TabularError::InvalidField {
            line,
            name: "id",
            message: "empty value".into(),
        });
    }
    if record.number.is_empty() {
        return Err(TabularError::InvalidField {
            line,
            name: "number",
            message: "empty value".into(),
        });
    }

    criteria.sort_by_key(|(n, _)| *n);
    record.criteria = criteria.into_iter().map(|(_, c)| c).collect();
    record.extra = extra;
    Ok(record)
}

/// `test<N>` with N a positive integer.
fn criterion_index(name: &str) -> Option<u32> {
    let digits = name.strip_prefix("test")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok().filter(|n| *n > 0)
}

pub fn write_report(path: &Path, report: &BatchReport) -> Result<(), TabularError> {
    let file = File::create(path)?;
    write_report_to(file, report)?;
    debug!(
        path = %path.display(),
        rows = report.rows.len(),
        aborts = report.aborts.len(),
        "wrote report"
    );
    Ok(())
}

/// Write verdict rows, then one line per aborted trial. Abort lines leave
/// `Passed` empty.
pub fn write_report_to<W: Write>(writer: W, report: &BatchReport) -> Result<(), TabularError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(OUTPUT_HEADER)?;

    for row in &report.rows {
        let trial = row.trial.to_string();
        wtr.write_record([
            row.id.as_str(),
            bool_field(row.passed),
            row.reasoning.as_str(),
            row.transcript.as_str(),
            row.instruction.as_str(),
            row.test.as_str(),
            row.title.as_str(),
            row.number.as_str(),
            row.call_id.as_str(),
            row.recording_url.as_deref().unwrap_or(""),
            row.receiver_call_id.as_deref().unwrap_or(""),
            trial.as_str(),
            row.criterion.as_str(),
            "",
        ])?;
    }

    for abort in &report.aborts {
        let trial = abort.trial.to_string();
        let reason = abort.reason.to_string();
        wtr.write_record([
            abort.record_id.as_str(),
            // No verdict exists for an aborted trial.
            "",
            "",
            "",
            abort.instruction.as_str(),
            "",
            abort.title.as_str(),
            abort.number.as_str(),
            abort.call_id.as_deref().unwrap_or(""),
            "",
            "",
            trial.as_str(),
            "",
            reason.as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

fn bool_field(b: bool) -> &'static str {
    if b {
        "true"
    } else {
        "false"
    }
}

/// `<stem>_out.csv` next to the input file.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "results".to_string());
    input.with_file_name(format!("{}_out.csv", stem))
}
