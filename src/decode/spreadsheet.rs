use crate::dispatch::FileFormat;
use crate::error::{IngestError, Result};
use crate::record::{InterfaceRecord, RawRow, mapper::map_rows};
use calamine::{Data, DataType, Range, Reader, open_workbook_auto_from_rs};
use std::io::Cursor;
use tracing::debug;

/// Decode an xlsx/xls workbook held in memory.
///
/// Only the first worksheet is read. Zero-byte content and a workbook with no
/// worksheets both decode to an empty sequence.
pub fn decode_spreadsheet(bytes: &[u8]) -> Result<Vec<InterfaceRecord>> {
    if bytes.is_empty() {
        debug!("empty workbook content");
        return Ok(Vec::new());
    }

    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| IngestError::decode(FileFormat::Excel, e))?;

    let sheet_names = workbook.sheet_names();
    let Some(range) = workbook.worksheet_range_at(0) else {
        debug!("workbook has no worksheets");
        return Ok(Vec::new());
    };
    let range = range.map_err(|e| IngestError::decode(FileFormat::Excel, e))?;
    debug!(
        sheet = ?sheet_names.first(),
        sheets = sheet_names.len(),
        "reading first worksheet"
    );

    Ok(map_rows(sheet_rows(&range)))
}

/// Header row is the first row of the used range; every later non-blank row
/// becomes one raw row.
pub fn sheet_rows(range: &Range<Data>) -> Vec<RawRow> {
    let mut rows = range.rows();
    let Some(header_cells) = rows.next() else {
        return Vec::new();
    };
    let headers: Vec<String> = header_cells.iter().map(cell_text).collect();

    rows.filter(|cells| cells.iter().any(|c| !c.is_empty()))
        .map(|cells| {
            let values: Vec<String> = cells.iter().map(cell_text).collect();
            RawRow::from_values(&headers, &values)
        })
        .collect()
}

/// Formatted text of a cell, as a spreadsheet would display it.
fn cell_text(cell: &Data) -> String {
    cell.as_string().unwrap_or_else(|| cell.to_string())
}
