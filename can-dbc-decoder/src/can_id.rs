//! CAN identifier decomposition
//!
//! DBC files mark 29-bit identifiers by setting bit 31 of the raw ID. For
//! those, the J1939 fields (priority, PGN, source address) are derived here.

use serde::Serialize;

/// PGN of the J1939 DM1 diagnostic message (active fault codes)
pub const DM1_PGN: u32 = 65226;

const EXTENDED_FRAME_FLAG: u32 = 1 << 31;
const PGN_MASK: u32 = 0x3_FFFF;

/// Fields derived from a raw DBC CAN identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanIdentifierFields {
    /// True if bit 31 of the raw identifier is set
    pub is_extended_frame: bool,
    /// Top byte of the raw identifier (extended frames only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
    /// Parameter group number, bits 8-25 (extended frames only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pgn: Option<u32>,
    /// Source address, bits 0-7 (extended frames only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<u8>,
}

impl CanIdentifierFields {
    /// Split a raw identifier into its fields
    ///
    /// # Example
    /// ```
    /// use can_dbc_decoder::CanIdentifierFields;
    ///
    /// let fields = CanIdentifierFields::split(0x98FEAE55);
    /// assert!(fields.is_extended_frame);
    /// assert_eq!(fields.priority, Some(0x98));
    /// assert_eq!(fields.pgn, Some(0xFEAE));
    /// assert_eq!(fields.source, Some(0x55));
    /// ```
    pub fn split(raw: u32) -> Self {
        if raw & EXTENDED_FRAME_FLAG == 0 {
            return Self {
                is_extended_frame: false,
                priority: None,
                pgn: None,
                source: None,
            };
        }

        Self {
            is_extended_frame: true,
            priority: Some((raw >> 24) as u8),
            pgn: Some((raw >> 8) & PGN_MASK),
            source: Some((raw & 0xFF) as u8),
        }
    }

    /// True if this identifier carries the DM1 PGN
    pub fn is_dm1(&self) -> bool {
        self.pgn == Some(DM1_PGN)
    }
}

/// The 3-bit J1939 priority (bits 26-28) of an extended identifier
pub fn j1939_priority(raw: u32) -> Option<u8> {
    if raw & EXTENDED_FRAME_FLAG == 0 {
        return None;
    }
    Some(((raw >> 26) & 0x7) as u8)
}
