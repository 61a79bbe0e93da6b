//! Ingest network-device interface exports (spreadsheets, delimited text,
//! CLI session transcripts) into one uniform [`InterfaceRecord`] schema.

pub mod decode;
pub mod dispatch;
pub mod error;
pub mod record;

pub use dispatch::{
    BatchReport, FileFormat, FileOutcome, InputFile, SkipReason, ingest_batch, parse_file,
};
pub use error::{ACCEPTED_EXTENSIONS, IngestError};
pub use record::{InterfaceRecord, RawRow, map_row, normalize_header};
