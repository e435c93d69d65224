//! Decoded DBC model
//!
//! Messages own their signals; the whole tree is serializable so callers can
//! hand it to JSON (or any other serde format) without further conversion.

use crate::can_id::CanIdentifierFields;
use crate::types::{Problem, Severity};
use serde::Serialize;
use std::collections::BTreeMap;

/// A complete CAN message definition (`BO_` block)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Message name
    pub name: String,
    /// Raw CAN identifier as written in the DBC file
    pub can_id: u32,
    /// Fields derived from the raw identifier
    #[serde(flatten)]
    pub id_fields: CanIdentifierFields,
    /// Sender ECU name
    pub sender: String,
    /// Message size in bytes
    pub length: u32,
    /// Line of the `BO_` record
    pub line: usize,
    /// All signals in file order
    pub signals: Vec<Signal>,
}

impl Message {
    pub fn pgn(&self) -> Option<u32> {
        self.id_fields.pgn
    }

    /// Find a signal by its bare name
    pub fn signal(&self, name: &str) -> Option<&Signal> {
        self.signals.iter().find(|s| s.name == name)
    }

    /// The multiplexer signal of this message, if any
    pub fn multiplexer(&self) -> Option<&Signal> {
        self.signals
            .iter()
            .find(|s| s.multiplexer == MultiplexIndicator::Multiplexor)
    }
}

/// A CAN signal definition (`SG_` record)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Signal {
    /// Signal name
    pub name: String,
    /// Output label: the name, or `Message.Signal` with extended labels
    pub label: String,
    /// Start bit in the CAN frame
    pub start_bit: u16,
    /// Length in bits
    pub bit_length: u16,
    pub byte_order: ByteOrder,
    pub value_type: ValueType,
    /// Scale factor to convert raw value to physical value
    pub factor: f64,
    /// Offset to add after scaling
    pub offset: f64,
    /// Minimum physical value
    pub min: f64,
    /// Maximum physical value
    pub max: f64,
    /// Engineering unit, empty if none
    pub unit: String,
    /// Receiving ECUs in file order
    pub receivers: Vec<String>,
    pub multiplexer: MultiplexIndicator,
    /// Value table (raw_value -> description)
    pub value_labels: BTreeMap<i64, String>,
    /// Line of the `SG_` record
    pub line: usize,
}

/// Byte order for signal extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ByteOrder {
    /// Little-endian (Intel format), `@1` in DBC
    LittleEndian,
    /// Big-endian (Motorola format), `@0` in DBC
    BigEndian,
}

/// Value type for signal interpretation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueType {
    /// Signed integer, `-` in DBC
    Signed,
    /// Unsigned integer, `+` in DBC
    Unsigned,
}

/// Multiplexing role of a signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "role", rename_all = "camelCase")]
pub enum MultiplexIndicator {
    /// Always present in the frame
    Plain,
    /// Selects which multiplexed signals are valid (`M`)
    Multiplexor,
    /// Only valid when the multiplexer equals `index` (`m<index>`)
    Multiplexed { index: u64 },
    /// The marker could not be parsed
    Unresolved,
}

/// Decoded DBC document: messages plus everything worth reporting
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dbc {
    /// Messages in file order
    pub params: Vec<Message>,
    /// Recoverable problems in order of detection
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub problems: Vec<Problem>,
}

impl Dbc {
    /// Find a message by raw CAN identifier (first definition wins)
    pub fn message(&self, can_id: u32) -> Option<&Message> {
        self.params.iter().find(|m| m.can_id == can_id)
    }

    /// Find a message by name
    pub fn message_by_name(&self, name: &str) -> Option<&Message> {
        self.params.iter().find(|m| m.name == name)
    }

    /// True if any problem corrupted data
    pub fn has_errors(&self) -> bool {
        self.problems.iter().any(|p| p.severity == Severity::Error)
    }

    /// Get document statistics
    pub fn stats(&self) -> DbcStats {
        let num_warnings = self
            .problems
            .iter()
            .filter(|p| p.severity == Severity::Warning)
            .count();

        DbcStats {
            num_messages: self.params.len(),
            num_signals: self.params.iter().map(|m| m.signals.len()).sum(),
            num_warnings,
            num_errors: self.problems.len() - num_warnings,
        }
    }
}

/// Document statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DbcStats {
    /// Total number of messages in the output
    pub num_messages: usize,
    /// Total number of signals in the output
    pub num_signals: usize,
    /// Problems with warning severity
    pub num_warnings: usize,
    /// Problems with error severity
    pub num_errors: usize,
}
