//! CAN DBC Decoder Library
//!
//! A stateless library that converts the text of a DBC file into a
//! serializable model of its messages, signals and value tables.
//!
//! # Architecture
//!
//! A conversion is a single forward pass:
//! - Lines are numbered and classified by record prefix (`BO_`, `SG_`, `VAL_`)
//! - Each record is parsed by its own parser
//! - Signals and value tables are resolved against their messages
//! - Optional post-processing filters DM1 messages and extends signal labels
//!
//! Problems come in two flavours. Structural errors ([`DbcError`]) abort the
//! conversion and nothing is returned. Data-quality issues ([`Problem`]) are
//! collected in [`Dbc::problems`] and the conversion carries on.
//!
//! The library does NOT:
//! - Read or write files
//! - Cover the full DBC grammar (comments, attributes, signal groups)
//! - Write DBC text back out
//!
//! All I/O lives in the application layer (can-dbc-cli).
//!
//! # Example Usage
//!
//! ```
//! use can_dbc_decoder::{transmute, Severity, TransmuteConfig};
//!
//! let text = r#"
//! BO_ 2566844926 StandardMessage: 8 Vector__XXX
//!  SG_ normal : 0|8@1+ (1,0) [0|255] "" Vector__XXX
//!
//! VAL_ 2566844926 normal 0 "Off" 1 "On" ;
//! "#;
//!
//! let config = TransmuteConfig::new().with_extended_labels(true);
//! let dbc = transmute(text, config).unwrap();
//!
//! let message = &dbc.params[0];
//! assert_eq!(message.id_fields.pgn, Some(0xFEF1));
//! assert_eq!(message.signals[0].label, "StandardMessage.normal");
//! assert_eq!(message.signals[0].value_labels[&1], "On");
//! assert!(dbc.problems.iter().all(|p| p.severity != Severity::Error));
//! ```

// Public modules
pub mod can_id;
pub mod config;
pub mod dbc;
pub mod transmuter;
pub mod types;

// Re-export main types for convenience
pub use can_id::{CanIdentifierFields, DM1_PGN};
pub use config::TransmuteConfig;
pub use dbc::{ByteOrder, Dbc, DbcStats, Message, MultiplexIndicator, Signal, ValueType};
pub use transmuter::{transmute, Transmuter};
pub use types::{DbcError, Problem, ProblemKind, Result, Severity};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_basics() {
        // Smoke test: an empty document decodes to nothing
        let dbc = Transmuter::default().transmute("").unwrap();
        let stats = dbc.stats();
        assert_eq!(stats.num_messages, 0);
        assert!(!VERSION.is_empty());
    }
}
