//! Byte-to-text decoding for delimited and transcript input.

use encoding_rs::{UTF_8, WINDOWS_1252};
use std::borrow::Cow;
use tracing::debug;

/// Decode file bytes to text.
///
/// A UTF-8 or UTF-16 BOM selects that encoding. Otherwise the content is read
/// as UTF-8, and if that is malformed it is re-read as Windows-1252, which
/// accepts any byte sequence.
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    let (text, encoding, had_errors) = UTF_8.decode(bytes);
    if !had_errors {
        return text;
    }
    debug!(detected = encoding.name(), "content is not valid UTF-8, using windows-1252");
    let (text, _, _) = WINDOWS_1252.decode(bytes);
    text
}
