//! Normalized interface records and the pipeline-internal raw row.

pub mod header;
pub mod mapper;

pub use header::{CanonicalField, normalize_header};
pub use mapper::map_row;

use serde::Serialize;
use std::collections::HashMap;

/// One interface of one device, in the uniform output schema.
///
/// Status fields keep the source casing; consumers compare them
/// case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceRecord {
    pub device: String,
    pub interface_name: String,
    pub link_status: String,
    pub admin_status: String,
    pub oper_status: String,
    pub vlan_mode: String,
    pub duplex: String,
    pub speed: String,
    #[serde(rename = "type")]
    pub port_type: String,
    pub ip_address: String,
    pub description: String,
}

impl InterfaceRecord {
    pub fn field(&self, field: CanonicalField) -> &str {
        match field {
            CanonicalField::Device => &self.device,
            CanonicalField::Interface => &self.interface_name,
            CanonicalField::LinkStatus => &self.link_status,
            CanonicalField::AdminStatus => &self.admin_status,
            CanonicalField::OperStatus => &self.oper_status,
            CanonicalField::VlanMode => &self.vlan_mode,
            CanonicalField::Duplex => &self.duplex,
            CanonicalField::Speed => &self.speed,
            CanonicalField::Type => &self.port_type,
            CanonicalField::IpAddress => &self.ip_address,
            CanonicalField::Description => &self.description,
        }
    }

    pub(crate) fn field_mut(&mut self, field: CanonicalField) -> &mut String {
        match field {
            CanonicalField::Device => &mut self.device,
            CanonicalField::Interface => &mut self.interface_name,
            CanonicalField::LinkStatus => &mut self.link_status,
            CanonicalField::AdminStatus => &mut self.admin_status,
            CanonicalField::OperStatus => &mut self.oper_status,
            CanonicalField::VlanMode => &mut self.vlan_mode,
            CanonicalField::Duplex => &mut self.duplex,
            CanonicalField::Speed => &mut self.speed,
            CanonicalField::Type => &mut self.port_type,
            CanonicalField::IpAddress => &mut self.ip_address,
            CanonicalField::Description => &mut self.description,
        }
    }
}

/// A source row keyed by its original header text.
///
/// `headers` keeps the table's column order; the mapper walks it so that a
/// later header wins when two normalize to the same field.
#[derive(Debug, Clone, Default)]
pub struct RawRow {
    pub headers: Vec<String>,
    pub cells: HashMap<String, String>,
}

impl RawRow {
    /// Pair headers with positional values. Missing trailing values are empty.
    pub fn from_values<S: AsRef<str>>(headers: &[String], values: &[S]) -> Self {
        let mut cells = HashMap::with_capacity(headers.len());
        for (idx, header) in headers.iter().enumerate() {
            let value = values.get(idx).map(|v| v.as_ref()).unwrap_or("");
            cells.insert(header.clone(), value.to_string());
        }
        Self {
            headers: headers.to_vec(),
            cells,
        }
    }

    pub fn get(&self, header: &str) -> &str {
        self.cells.get(header).map(String::as_str).unwrap_or("")
    }
}
