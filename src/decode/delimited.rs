use crate::dispatch::FileFormat;
use crate::error::{IngestError, Result};
use crate::record::{InterfaceRecord, RawRow, mapper::map_rows};
use csv::{ReaderBuilder, Trim};
use tracing::debug;

/// Candidate delimiters in priority order; comma is the fallback.
const DELIMITER_PRIORITY: &[u8] = b"\t;|";

/// Pick the delimiter for a whole file from its first non-blank line.
pub fn detect_delimiter(first_line: &str) -> u8 {
    DELIMITER_PRIORITY
        .iter()
        .copied()
        .find(|d| first_line.as_bytes().contains(d))
        .unwrap_or(b',')
}

/// Split delimited text into header-keyed rows.
///
/// Blank lines are dropped before parsing. The first remaining line is the
/// header row and fixes the delimiter for every following line. Each line is
/// read on its own, so an unbalanced quote never runs into the next row.
pub fn delimited_rows(text: &str, format: FileFormat) -> Result<Vec<RawRow>> {
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let Some((first, body)) = lines.split_first() else {
        return Ok(Vec::new());
    };

    let delimiter = detect_delimiter(first);
    debug!(
        delimiter = %(delimiter as char).escape_default(),
        lines = lines.len(),
        "delimited table"
    );

    let headers = split_line(first, delimiter, format)?;
    let mut rows = Vec::with_capacity(body.len());
    for line in body {
        let values = split_line(line, delimiter, format)?;
        rows.push(RawRow::from_values(&headers, &values));
    }
    Ok(rows)
}

/// Cells of a single line, trimmed. Quoted cells may hold the delimiter.
fn split_line(line: &str, delimiter: u8, format: FileFormat) -> Result<Vec<String>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(line.as_bytes());

    match reader.records().next() {
        Some(record) => {
            let record = record.map_err(|e| IngestError::decode(format, e))?;
            Ok(record.iter().map(str::to_string).collect())
        }
        None => Ok(Vec::new()),
    }
}

/// Decode a delimited table straight to records.
pub fn decode_delimited(text: &str, format: FileFormat) -> Result<Vec<InterfaceRecord>> {
    Ok(map_rows(delimited_rows(text, format)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn delimiter_priority() {
        assert_eq!(detect_delimiter("a\tb;c|d,e"), b'\t');
        assert_eq!(detect_delimiter("a;b|c,d"), b';');
        assert_eq!(detect_delimiter("a|b,c"), b'|');
        assert_eq!(detect_delimiter("a,b"), b',');
        assert_eq!(detect_delimiter("single"), b',');
    }

    #[test]
    fn csv_scenario() {
        let text = "Device,Interface,Link Status\nSW1,Gi0/1,connected\n";
        let records = decode_delimited(text, FileFormat::Csv).unwrap();
        assert_eq!(
            records,
            vec![InterfaceRecord {
                device: "SW1".to_string(),
                interface_name: "Gi0/1".to_string(),
                link_status: "connected".to_string(),
                ..Default::default()
            }]
        );
    }

    #[test]
    fn tab_header_fixes_delimiter_for_every_row() {
        let text = "Device\tInterface\tDescription\nSW1\tGi0/1\tuplink, core\n";
        let records = decode_delimited(text, FileFormat::Text).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].description, "uplink, core");
    }

    #[test]
    fn blank_lines_and_crlf_are_tolerated() {
        let text = "\r\n  \r\nDevice;Interface\r\n\r\nSW1;Gi0/1\r\nSW1;Gi0/2\r\n   \r\n";
        let records = decode_delimited(text, FileFormat::Text).unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.interface_name.as_str()).collect();
        assert_eq!(names, vec!["Gi0/1", "Gi0/2"]);
    }

    #[test]
    fn short_rows_and_garbage_rows() {
        let text = "Device|Interface|Speed\nSW1|Gi0/1\n|||\nSW2|Gi0/3|1000|extra\n";
        let records = decode_delimited(text, FileFormat::Text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].speed, "");
        assert_eq!(records[1].speed, "1000");
    }

    #[test]
    fn quoted_fields_keep_embedded_delimiters() {
        let text = "Interface,Description\nGi0/1,\"to core, rack 4\"\n";
        let records = decode_delimited(text, FileFormat::Csv).unwrap();
        assert_eq!(records[0].description, "to core, rack 4");
    }

    #[test]
    fn unclosed_quote_stays_inside_its_line() {
        let text = "Device,Interface,Description\n\
                    SW1,Gi0/1,\"uplink\n\
                    SW1,Gi0/2,core\n\
                    SW1,Gi0/3,edge\n";
        for format in [FileFormat::Text, FileFormat::Csv] {
            let records = decode_delimited(text, format).unwrap();
            let names: Vec<&str> = records.iter().map(|r| r.interface_name.as_str()).collect();
            assert_eq!(names, vec!["Gi0/1", "Gi0/2", "Gi0/3"]);
            assert_eq!(records[0].description, "uplink");
            assert_eq!(records[2].description, "edge");
        }
    }

    #[test]
    fn empty_and_unmatched_input_yield_nothing() {
        assert!(decode_delimited("", FileFormat::Csv).unwrap().is_empty());
        assert!(decode_delimited("\n\n  \n", FileFormat::Csv).unwrap().is_empty());
        assert!(
            decode_delimited("hello world\nnothing here\n", FileFormat::Text)
                .unwrap()
                .is_empty()
        );
    }
}
