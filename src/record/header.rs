//! Header normalization and the canonical-field synonym table.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// The fixed output attributes of an [`InterfaceRecord`](super::InterfaceRecord).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    Device,
    Interface,
    LinkStatus,
    AdminStatus,
    OperStatus,
    VlanMode,
    Duplex,
    Speed,
    Type,
    IpAddress,
    Description,
}

/// Normalized header text to canonical field. Keys must already be in
/// [`normalize_header`] form.
pub const SYNONYMS: &[(&str, CanonicalField)] = &[
    ("device", CanonicalField::Device),
    ("interface", CanonicalField::Interface),
    ("link status", CanonicalField::LinkStatus),
    ("linkstatus", CanonicalField::LinkStatus),
    ("admin status", CanonicalField::AdminStatus),
    ("adminstatus", CanonicalField::AdminStatus),
    ("oper status", CanonicalField::OperStatus),
    ("operstatus", CanonicalField::OperStatus),
    ("vlan/mode", CanonicalField::VlanMode),
    ("vlan", CanonicalField::VlanMode),
    ("mode", CanonicalField::VlanMode),
    ("duplex", CanonicalField::Duplex),
    ("speed", CanonicalField::Speed),
    ("type", CanonicalField::Type),
    ("ip address", CanonicalField::IpAddress),
    ("ipaddress", CanonicalField::IpAddress),
    ("ip", CanonicalField::IpAddress),
    ("description", CanonicalField::Description),
    ("desc", CanonicalField::Description),
];

static SYNONYM_INDEX: Lazy<HashMap<&'static str, CanonicalField>> =
    Lazy::new(|| SYNONYMS.iter().copied().collect());

static SEPARATOR_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[_\s]+").unwrap());

/// Lower-case, collapse whitespace/underscore runs to one space, trim.
///
/// Collapsing happens before trimming so the result is a fixed point:
/// `normalize_header(&normalize_header(s)) == normalize_header(s)`.
pub fn normalize_header(header: &str) -> String {
    let lowered = header.to_lowercase();
    SEPARATOR_RUN.replace_all(&lowered, " ").trim().to_string()
}

/// Resolve raw header text to its canonical field, if it has one.
pub fn canonical_field(header: &str) -> Option<CanonicalField> {
    SYNONYM_INDEX.get(normalize_header(header).as_str()).copied()
}
