//! Reconstruct interface records from a captured CLI session.
//!
//! A transcript holds the output of two commands run against one device:
//!
//! ```text
//! SW-DC1-CORE-01#show int status
//!
//! Port      Name            Status       Vlan   Duplex  Speed   Type
//! Gi0/1     uplink          connected    trunk  a-full  a-1000  10/100/1000BaseTX
//! SW-DC1-CORE-01#show int des
//! Interface                 Status         Protocol Description
//! Gi0/1                     up             up       uplink to core
//! ```
//!
//! Every command echo opens a block. A block starts two lines after its echo
//! and ends at the first blank line, `###` banner, prompt line, or further
//! command echo. Rows from all blocks are merged per interface name, and the
//! merged entries are emitted in first-sight order.

use crate::record::{CanonicalField, InterfaceRecord, RawRow, mapper::map_rows};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use tracing::{debug, info};

const STATUS_ECHO: &str = "show int status";
const DESCRIPTION_ECHO: &str = "show int des";

/// Lines between a command echo and its first data row.
const BLOCK_OFFSET: usize = 2;

/// Device identity used when the banner carries no recognizable hostname.
pub const UNKNOWN_DEVICE: &str = "Unknown";

/// Four dash-joined upper-case alphanumeric segments, e.g. `DRC-DC1-CORE-SW01`.
static DEVICE_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Z0-9]+-[A-Z0-9]+-[A-Z0-9]+-[A-Z0-9]+").unwrap());

/// A prompt line opens with a dash-joined hostname.
static PROMPT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z0-9]+-[A-Z0-9]").unwrap());

static STATUS_COLUMN_GAP: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").unwrap());

/// Header vocabulary used to push merged entries back through the mapper.
const TRANSCRIPT_COLUMNS: &[(&str, CanonicalField)] = &[
    ("device", CanonicalField::Device),
    ("interface", CanonicalField::Interface),
    ("link status", CanonicalField::LinkStatus),
    ("admin status", CanonicalField::AdminStatus),
    ("oper status", CanonicalField::OperStatus),
    ("vlan", CanonicalField::VlanMode),
    ("duplex", CanonicalField::Duplex),
    ("speed", CanonicalField::Speed),
    ("type", CanonicalField::Type),
    ("description", CanonicalField::Description),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Link status, VLAN, duplex, speed and media type.
    Status,
    /// Admin/oper state and free-text description.
    Description,
}

impl Command {
    fn from_echo(line: &str) -> Option<Self> {
        if line.contains(STATUS_ECHO) {
            Some(Command::Status)
        } else if line.contains(DESCRIPTION_ECHO) {
            Some(Command::Description)
        } else {
            None
        }
    }

    /// First column of the command's own header row.
    fn header_label(self) -> &'static str {
        match self {
            Command::Status => "Port",
            Command::Description => "Interface",
        }
    }

    fn parse_line(self, line: &str) -> Option<InterfaceRecord> {
        match self {
            Command::Status => parse_status_line(line),
            Command::Description => parse_description_line(line),
        }
        .filter(|row| !row.interface_name.eq_ignore_ascii_case(self.header_label()))
    }
}

/// True when the text looks like a device session capture rather than a table.
pub fn is_transcript(text: &str) -> bool {
    text.contains(STATUS_ECHO)
        || (text.contains("Port") && text.contains("Status") && text.contains("Vlan"))
}

/// First four-segment hostname in the text, or [`UNKNOWN_DEVICE`].
pub fn device_identity(text: &str) -> &str {
    DEVICE_ID
        .find(text)
        .map(|m| m.as_str())
        .unwrap_or(UNKNOWN_DEVICE)
}

/// Decode a transcript to records. Never fails; unrecognized content yields
/// an empty sequence.
pub fn decode_transcript(text: &str) -> Vec<InterfaceRecord> {
    let device = device_identity(text);
    let lines: Vec<&str> = text.lines().collect();
    let mut table = InterfaceTable::default();

    for (idx, line) in lines.iter().enumerate() {
        let Some(command) = Command::from_echo(line.trim()) else {
            continue;
        };

        let mut accepted = 0usize;
        for data_line in block_lines(&lines, idx + BLOCK_OFFSET) {
            if !starts_with_letter(data_line) {
                continue;
            }
            if let Some(seen) = command.parse_line(data_line) {
                table.merge(device, seen);
                accepted += 1;
            }
        }
        debug!(?command, echo_line = idx + 1, accepted, "transcript block");
    }

    info!(device, interfaces = table.len(), "parsed transcript");
    map_rows(table.into_raw_rows())
}

/// Lines of one command block, starting at `start` and stopping before the
/// first terminator.
fn block_lines<'a>(lines: &'a [&'a str], start: usize) -> impl Iterator<Item = &'a str> + 'a {
    lines
        .get(start..)
        .unwrap_or_default()
        .iter()
        .copied()
        .take_while(|line| !is_block_end(line))
}

fn is_block_end(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty()
        || trimmed.starts_with("###")
        || PROMPT.is_match(trimmed)
        || Command::from_echo(trimmed).is_some()
}

fn starts_with_letter(line: &str) -> bool {
    line.starts_with(|c: char| c.is_ascii_alphabetic())
}

/// `Port  Name  Status  Vlan  Duplex  Speed  Type...`, columns separated by
/// two or more spaces. Needs at least four columns.
fn parse_status_line(line: &str) -> Option<InterfaceRecord> {
    let parts: Vec<&str> = STATUS_COLUMN_GAP
        .split(line.trim_end())
        .map(str::trim)
        .collect();
    if parts.len() < 4 || !starts_with_letter(parts[0]) {
        return None;
    }

    let col = |i: usize| parts.get(i).copied().unwrap_or("").to_string();
    Some(InterfaceRecord {
        interface_name: col(0),
        description: col(1),
        link_status: col(2),
        vlan_mode: col(3),
        duplex: col(4),
        speed: col(5),
        port_type: parts.get(6..).map(|rest| rest.join(" ")).unwrap_or_default(),
        ..Default::default()
    })
}

/// `Interface  Admin  Oper  Description...`, whitespace separated. Needs at
/// least three tokens.
fn parse_description_line(line: &str) -> Option<InterfaceRecord> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 3 || !starts_with_letter(tokens[0]) {
        return None;
    }

    Some(InterfaceRecord {
        interface_name: tokens[0].to_string(),
        admin_status: tokens[1].to_string(),
        oper_status: tokens[2].to_string(),
        description: tokens[3..].join(" "),
        ..Default::default()
    })
}

/// Partial records keyed by interface name, iterated in first-sight order.
#[derive(Debug, Default)]
struct InterfaceTable {
    entries: Vec<InterfaceRecord>,
    index: HashMap<String, usize>,
}

impl InterfaceTable {
    fn len(&self) -> usize {
        self.entries.len()
    }

    /// Fold a parsed row into its entry; non-empty values overwrite.
    fn merge(&mut self, device: &str, seen: InterfaceRecord) {
        let slot = match self.index.get(&seen.interface_name) {
            Some(&slot) => slot,
            None => {
                self.index
                    .insert(seen.interface_name.clone(), self.entries.len());
                self.entries.push(InterfaceRecord {
                    device: device.to_string(),
                    interface_name: seen.interface_name.clone(),
                    ..Default::default()
                });
                self.entries.len() - 1
            }
        };

        let entry = &mut self.entries[slot];
        for &(_, field) in TRANSCRIPT_COLUMNS {
            let value = seen.field(field);
            if !value.is_empty() {
                *entry.field_mut(field) = value.to_string();
            }
        }
    }

    fn into_raw_rows(self) -> impl Iterator<Item = RawRow> {
        let headers: Vec<String> = TRANSCRIPT_COLUMNS
            .iter()
            .map(|(header, _)| header.to_string())
            .collect();
        self.entries.into_iter().map(move |entry| {
            let values: Vec<&str> = TRANSCRIPT_COLUMNS
                .iter()
                .map(|&(_, field)| entry.field(field))
                .collect();
            RawRow::from_values(&headers, &values)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SESSION: &str = "\
######## DRC-DC1-CORE-SW01 ########
DRC-DC1-CORE-SW01#show int status

Port      Name               Status       Vlan       Duplex  Speed   Type
Gi1/0/1   uplink-to-core     connected    trunk      a-full  a-1000  10/100/1000BaseTX
Gi1/0/2   printer-lab        notconnect   20         auto    auto    10/100/1000BaseTX
Te1/1/1   dc-link            connected    trunk      full    10G     SFP-10GBase SR
DRC-DC1-CORE-SW01#show int des
Interface                      Status         Protocol Description
Gi1/0/1                        up             up       uplink to core
Gi1/0/2                        down           down
Vl20                           up             up       printers
DRC-DC1-CORE-SW01#
";

    #[test]
    fn detects_transcripts() {
        assert!(is_transcript("sw#show int status\n"));
        assert!(is_transcript("Port Name Status Vlan\n"));
        assert!(!is_transcript("Device,Interface\nSW1,Gi0/1\n"));
        assert!(!is_transcript("port status vlan"));
    }

    #[test]
    fn device_identity_falls_back_to_unknown() {
        assert_eq!(device_identity(SESSION), "DRC-DC1-CORE-SW01");
        assert_eq!(device_identity("core1#show int status"), UNKNOWN_DEVICE);
        assert_eq!(device_identity("A-B-C"), UNKNOWN_DEVICE);
    }

    #[test]
    fn merges_both_blocks_in_first_sight_order() {
        let records = decode_transcript(SESSION);
        let names: Vec<&str> = records.iter().map(|r| r.interface_name.as_str()).collect();
        assert_eq!(names, vec!["Gi1/0/1", "Gi1/0/2", "Te1/1/1", "Vl20"]);

        assert_eq!(
            records[0],
            InterfaceRecord {
                device: "DRC-DC1-CORE-SW01".to_string(),
                interface_name: "Gi1/0/1".to_string(),
                link_status: "connected".to_string(),
                admin_status: "up".to_string(),
                oper_status: "up".to_string(),
                vlan_mode: "trunk".to_string(),
                duplex: "a-full".to_string(),
                speed: "a-1000".to_string(),
                port_type: "10/100/1000BaseTX".to_string(),
                ip_address: String::new(),
                description: "uplink to core".to_string(),
            }
        );
    }

    #[test]
    fn empty_values_do_not_erase_earlier_ones() {
        let records = decode_transcript(SESSION);
        let printer = &records[1];
        assert_eq!(printer.description, "printer-lab");
        assert_eq!(printer.admin_status, "down");
        assert_eq!(printer.link_status, "notconnect");
    }

    #[test]
    fn remaining_status_columns_join_into_type() {
        let records = decode_transcript(SESSION);
        assert_eq!(records[2].port_type, "SFP-10GBase SR");
    }

    #[test]
    fn header_rows_are_not_interfaces() {
        let records = decode_transcript(SESSION);
        assert!(records.iter().all(|r| r.interface_name != "Port"));
        assert!(records.iter().all(|r| r.interface_name != "Interface"));
    }

    #[test]
    fn two_pass_merge_for_single_interface() {
        let text = "\
SW-A-B-1#show int status
Port    Name    Status     Vlan  Duplex  Speed  Type
Gi0/1   core    connected  1     full    100    copper

SW-A-B-1#show int des
Interface  Status  Protocol  Description
Gi0/1      up      up        uplink
";
        let records = decode_transcript(text);
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.device, "SW-A-B-1");
        assert_eq!(r.link_status, "connected");
        assert_eq!(r.admin_status, "up");
        assert_eq!(r.oper_status, "up");
        assert_eq!(r.description, "uplink");
        assert_eq!(r.interface_name, "Gi0/1");
    }

    #[test]
    fn blocks_stop_at_terminators() {
        let text = "\
core#show int status
Port    Name    Status     Vlan
Gi0/1   a       connected  1
### banner ###
Gi0/2   b       connected  1
core#show int des
Interface  Status  Protocol
Gi0/3      up      up
X-1 prompt line
Gi0/4      up      up
";
        let names: Vec<String> = decode_transcript(text)
            .into_iter()
            .map(|r| r.interface_name)
            .collect();
        assert_eq!(names, vec!["Gi0/1", "Gi0/3"]);
    }

    #[test]
    fn short_and_indented_lines_are_ignored() {
        let text = "\
x#show int status
Port  Name
Gi0/1  a  connected
  Gi0/2  b  connected  1
1/0/3  c  connected  1
Gi0/4  d  connected  1
";
        let records = decode_transcript(text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].interface_name, "Gi0/4");
        assert_eq!(records[0].device, UNKNOWN_DEVICE);
    }

    #[test]
    fn two_token_description_lines_are_ignored() {
        let text = "\
x#show int des
Interface  Status  Protocol  Description
Gi0/5  up
Gi0/6  up  up  spare
";
        let records = decode_transcript(text);
        assert_eq!(
            records,
            vec![InterfaceRecord {
                device: UNKNOWN_DEVICE.to_string(),
                interface_name: "Gi0/6".to_string(),
                admin_status: "up".to_string(),
                oper_status: "up".to_string(),
                description: "spare".to_string(),
                ..Default::default()
            }]
        );
    }

    #[test]
    fn unmatched_transcript_is_empty() {
        assert!(decode_transcript("Port Status Vlan but no echo\n").is_empty());
        assert!(decode_transcript("").is_empty());
        assert!(decode_transcript("sw#show int status").is_empty());
    }
}
