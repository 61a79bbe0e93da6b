//! Format dispatch and multi-file batch classification.

use crate::decode::{
    decode_delimited, decode_spreadsheet, decode_text, decode_transcript, is_transcript,
};
use crate::error::{IngestError, Result};
use crate::record::InterfaceRecord;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Decoder family selected by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// `.csv`
    Csv,
    /// `.xlsx` / `.xls`
    Excel,
    /// `.txt`: transcript when it looks like one, delimited table otherwise.
    Text,
}

impl FileFormat {
    /// Case-insensitive suffix match on the file name.
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.to_lowercase();
        if lower.ends_with(".csv") {
            Some(FileFormat::Csv)
        } else if lower.ends_with(".xlsx") || lower.ends_with(".xls") {
            Some(FileFormat::Excel)
        } else if lower.ends_with(".txt") {
            Some(FileFormat::Text)
        } else {
            None
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FileFormat::Csv => "CSV",
            FileFormat::Excel => "Excel",
            FileFormat::Text => "TXT",
        })
    }
}

/// A named blob of file content.
#[derive(Debug, Clone)]
pub struct InputFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl InputFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn read(path: &Path) -> Result<Self> {
        let name = path.display().to_string();
        let bytes = fs::read(path).map_err(|source| IngestError::Read {
            name: name.clone(),
            source,
        })?;
        Ok(Self { name, bytes })
    }
}

/// Decode one file with the decoder its extension selects.
pub fn parse_file(file: &InputFile) -> Result<Vec<InterfaceRecord>> {
    let format =
        FileFormat::from_name(&file.name).ok_or_else(|| IngestError::UnsupportedFormat {
            name: file.name.clone(),
        })?;
    debug!(file = %file.name, %format, bytes = file.bytes.len(), "dispatching");

    match format {
        FileFormat::Excel => decode_spreadsheet(&file.bytes),
        FileFormat::Csv => decode_delimited(&decode_text(&file.bytes), format),
        FileFormat::Text => {
            let text = decode_text(&file.bytes);
            if is_transcript(&text) {
                Ok(decode_transcript(&text))
            } else {
                decode_delimited(&text, format)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    UnsupportedFormat,
    NoRecords,
}

/// How one file of a batch fared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    Success { name: String, records: usize },
    Skipped { name: String, reason: SkipReason },
    Failed { name: String, error: String },
}

/// Records from every successful file, in submission order, plus one
/// outcome per file.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub records: Vec<InterfaceRecord>,
    pub files: Vec<FileOutcome>,
}

impl BatchReport {
    /// Decode `file` and classify the result. Errors never abort the batch.
    pub fn ingest(&mut self, file: &InputFile) {
        match parse_file(file) {
            Ok(records) => self.push_records(&file.name, records),
            Err(IngestError::UnsupportedFormat { .. }) => {
                self.push_skipped(&file.name, SkipReason::UnsupportedFormat)
            }
            Err(err) => self.push_failed(&file.name, &err),
        }
    }

    fn push_records(&mut self, name: &str, records: Vec<InterfaceRecord>) {
        if records.is_empty() {
            self.push_skipped(name, SkipReason::NoRecords);
            return;
        }
        info!(file = %name, records = records.len(), "ingested");
        self.files.push(FileOutcome::Success {
            name: name.to_string(),
            records: records.len(),
        });
        self.records.extend(records);
    }

    pub fn push_skipped(&mut self, name: &str, reason: SkipReason) {
        info!(file = %name, ?reason, "skipped");
        self.files.push(FileOutcome::Skipped {
            name: name.to_string(),
            reason,
        });
    }

    pub fn push_failed(&mut self, name: &str, err: &IngestError) {
        warn!(file = %name, error = %err, "failed");
        self.files.push(FileOutcome::Failed {
            name: name.to_string(),
            error: err.to_string(),
        });
    }

    pub fn success_count(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Success { .. }))
    }

    pub fn skipped_count(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Skipped { .. }))
    }

    pub fn failed_count(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Failed { .. }))
    }

    /// `"<name>: <message>"` for every failed file.
    pub fn errors(&self) -> Vec<String> {
        self.files
            .iter()
            .filter_map(|o| match o {
                FileOutcome::Failed { name, error } => Some(format!("{}: {}", name, error)),
                _ => None,
            })
            .collect()
    }

    fn count(&self, pred: impl Fn(&FileOutcome) -> bool) -> usize {
        self.files.iter().filter(|o| pred(*o)).count()
    }
}

/// Decode files strictly in order, concatenating successful results.
pub fn ingest_batch<'a, I>(files: I) -> BatchReport
where
    I: IntoIterator<Item = &'a InputFile>,
{
    let mut report = BatchReport::default();
    for file in files {
        report.ingest(file);
    }
    report
}
