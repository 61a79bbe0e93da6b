use crate::record::header::canonical_field;
use crate::record::{InterfaceRecord, RawRow};

/// Map one source row onto the canonical schema.
///
/// Headers without a synonym are ignored. When two headers resolve to the same
/// field, the later one in `row.headers` wins. Returns `None` when both
/// `device` and `interface_name` end up empty.
pub fn map_row(row: &RawRow) -> Option<InterfaceRecord> {
    let mut record = InterfaceRecord::default();

    for header in &row.headers {
        if let Some(field) = canonical_field(header) {
            *record.field_mut(field) = row.get(header).trim().to_string();
        }
    }

    if record.device.is_empty() && record.interface_name.is_empty() {
        return None;
    }
    Some(record)
}

/// Map every row, dropping those that fail the device/interface invariant.
pub fn map_rows<I>(rows: I) -> Vec<InterfaceRecord>
where
    I: IntoIterator<Item = RawRow>,
{
    rows.into_iter().filter_map(|row| map_row(&row)).collect()
}
