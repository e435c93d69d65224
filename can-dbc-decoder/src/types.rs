//! Core types for the DBC decoder library
//!
//! This module defines the two error channels of the decoder: fatal
//! [`DbcError`]s that abort a conversion, and recoverable [`Problem`]s that
//! are collected alongside the decoded messages.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result type for decoder operations
pub type Result<T> = std::result::Result<T, DbcError>;

/// Structural errors that abort the whole conversion
///
/// The rendered messages embed the 1-based line number and are part of the
/// observable output, so their wording must stay stable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DbcError {
    #[error("BO_ on line {line} does not follow DBC standard; should have a CAN ID, a name, a length and a sender.")]
    MessageNotStandard { line: usize },

    #[error("BO_ CAN ID on line {line} is not a number")]
    MessageIdNotNumber { line: usize },

    #[error("BO_ length on line {line} is not a number")]
    MessageLengthNotNumber { line: usize },

    #[error("SG_ line at {line} does not follow DBC standard; should have eight or nine fields.")]
    SignalNotStandard { line: usize },

    #[error("SG_ line at {line} is not preceded by a BO_ line; there is no message to add the parameter to.")]
    SignalWithoutMessage { line: usize },
}

impl DbcError {
    /// Line of the record that caused the error
    pub fn line(&self) -> usize {
        match self {
            DbcError::MessageNotStandard { line }
            | DbcError::MessageIdNotNumber { line }
            | DbcError::MessageLengthNotNumber { line }
            | DbcError::SignalNotStandard { line }
            | DbcError::SignalWithoutMessage { line } => *line,
        }
    }
}

/// How badly a problem affects the decoded data
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Nothing is lost, or the loss is cosmetic
    Warning,
    /// The data of one field is wrong, the rest of the file is fine
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Every recoverable issue the decoder knows how to report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProblemKind {
    /// A `BO_` line reuses the CAN ID of an earlier message
    DuplicateCanId,
    /// A `BO_` block closed without any `SG_` line
    EmptyMessage,
    /// The multiplexer marker of an `SG_` line is neither `M` nor `m<N>`
    MalformedMultiplexer,
    /// A numeric field of an `SG_` line could not be parsed
    MalformedSignalField(&'static str),
    /// A `VAL_` line has a dangling value or label
    OddValueTable,
    /// A `VAL_` line defines a single state
    SingleState,
    /// A `VAL_` pair whose value is not an integer
    StateValueNotNumber(String),
    /// A `VAL_` line without a numeric CAN ID and signal name
    ValueTableWithoutReference,
    /// A `VAL_` line names a CAN ID no message uses
    UnmatchedMessage(u32),
    /// A `VAL_` line names a signal its message does not have
    UnmatchedSignal(String),
}

impl ProblemKind {
    pub fn severity(&self) -> Severity {
        match self {
            ProblemKind::MalformedMultiplexer | ProblemKind::MalformedSignalField(_) => {
                Severity::Error
            }
            _ => Severity::Warning,
        }
    }
}

impl fmt::Display for ProblemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProblemKind::DuplicateCanId => write!(
                f,
                "BO_ CAN ID already exists in this file. Nothing will break on our side, but the data will be wrong because the exact same CAN data will be used on two different parameters."
            ),
            ProblemKind::EmptyMessage => write!(
                f,
                "BO_ does not contain any SG_ lines; message does not have any parameters."
            ),
            ProblemKind::MalformedMultiplexer => write!(
                f,
                "Can't parse multiplexer data from SG_ line, there should either be \" M \" or \" m0 \" where 0 can be any number. This will lead to incorrect data for this parameter."
            ),
            ProblemKind::MalformedSignalField(field) => write!(
                f,
                "Can't parse {} from SG_ line. This will lead to incorrect data for this parameter.",
                field
            ),
            ProblemKind::OddValueTable => write!(
                f,
                "VAL_ line does not follow DBC standard; amount of text/numbers in the line should be an even number. States/values will be incorrect, but data is unaffected."
            ),
            ProblemKind::SingleState => write!(
                f,
                "VAL_ line only contains one state, nothing will break but it defeats the purpose of having states/values for this parameter."
            ),
            ProblemKind::StateValueNotNumber(value) => write!(
                f,
                "VAL_ line contains the value {} which is not a number; this state will be skipped, but data is unaffected.",
                value
            ),
            ProblemKind::ValueTableWithoutReference => write!(
                f,
                "VAL_ line does not start with a CAN ID and a parameter name; the line is ignored, but data is unaffected."
            ),
            ProblemKind::UnmatchedMessage(can_id) => write!(
                f,
                "VAL_ line could not be matched to BO_ because CAN ID {} can not be found in any message. Nothing will break, and if we add the correct values/states later there won't even be any data loss.",
                can_id
            ),
            ProblemKind::UnmatchedSignal(name) => write!(
                f,
                "VAL_ line could not be matched to SG_ because there's no parameter with the name {} in the DBC file. Nothing will break, but the customer might intend to add another parameter to the DBC file, so they might complain that it's missing.",
                name
            ),
        }
    }
}

/// A recoverable issue found while decoding, tied to a source line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Problem {
    /// Impact on the decoded data
    pub severity: Severity,
    /// 1-based line number of the offending record
    pub line: usize,
    /// Human-readable description
    pub description: String,
    /// Template the description was rendered from
    #[serde(skip)]
    pub kind: ProblemKind,
}

impl Problem {
    /// Create a problem; severity and description follow from the kind
    pub fn new(line: usize, kind: ProblemKind) -> Self {
        Self {
            severity: kind.severity(),
            line,
            description: kind.to_string(),
            kind,
        }
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on line {}: {}", self.severity, self.line, self.description)
    }
}
