//! DBC record parsing and assembly
//!
//! This module contains the line classifier, one parser per supported record
//! type, the problem collector and the assembler that links records into the
//! decoded model.

pub mod assembler;
pub mod lexer;
pub mod message;
pub mod model;
pub mod problems;
pub mod signal;
pub mod value_table;

// Re-export key types for convenience
pub use lexer::{DbcLine, DbcLines, RecordKind};
pub use model::{ByteOrder, Dbc, DbcStats, Message, MultiplexIndicator, Signal, ValueType};
