//! Decoders: raw file content to header+row tuples, then through the mapper.
//!
//! - `text`: bytes to `String` (BOM sniffing, legacy fallback)
//! - `delimited`: CSV / TSV / semicolon / pipe tables
//! - `spreadsheet`: first worksheet of an xlsx/xls workbook
//! - `transcript`: two-command device session captures

pub mod delimited;
pub mod spreadsheet;
pub mod text;
pub mod transcript;

pub use delimited::{decode_delimited, detect_delimiter};
pub use spreadsheet::decode_spreadsheet;
pub use text::decode_text;
pub use transcript::{decode_transcript, is_transcript};
