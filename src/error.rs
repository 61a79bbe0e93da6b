//! Error taxonomy for the ingestion pipeline.
//!
//! Errors are always scoped to a single input file. A row that fails the
//! record invariant is never an error; it is dropped by the mapper.

use crate::dispatch::FileFormat;
use thiserror::Error;

/// Extensions accepted by the dispatcher, in the order they are advertised.
pub const ACCEPTED_EXTENSIONS: &[&str] = &[".xlsx", ".xls", ".csv", ".txt"];

#[derive(Debug, Error)]
pub enum IngestError {
    /// The file name does not end in one of [`ACCEPTED_EXTENSIONS`].
    #[error("unsupported file format for {name}; use {}", ACCEPTED_EXTENSIONS.join(", "))]
    UnsupportedFormat { name: String },

    /// The underlying workbook or text decoder rejected the content.
    #[error("invalid {format} format: {message}")]
    Decode { format: FileFormat, message: String },

    /// The file content could not be read from its source.
    #[error("failed to read file {name}: {source}")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

impl IngestError {
    pub(crate) fn decode(format: FileFormat, err: impl std::fmt::Display) -> Self {
        IngestError::Decode {
            format,
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
