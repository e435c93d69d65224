//! Main decoder API
//!
//! The [`Transmuter`] drives a single pass over the DBC text: every line is
//! classified, handed to its record parser and fed into the assembler. The
//! first structural error aborts the pass and nothing else is returned.

use crate::config::TransmuteConfig;
use crate::dbc::assembler::Assembler;
use crate::dbc::lexer::{DbcLines, RecordKind};
use crate::dbc::{message, signal, value_table, Dbc};
use crate::types::Result;

/// Entry point for converting DBC text
#[derive(Debug, Clone, Default)]
pub struct Transmuter {
    config: TransmuteConfig,
}

impl Transmuter {
    /// Create a transmuter with the given post-processing options
    pub fn new(config: TransmuteConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TransmuteConfig {
        &self.config
    }

    /// Convert DBC text into messages and problems
    ///
    /// # Arguments
    /// * `text` - Full DBC document
    ///
    /// # Returns
    /// * `Result<Dbc>` - The decoded model with its problems, or the first
    ///   structural error
    ///
    /// # Example
    /// ```
    /// use can_dbc_decoder::{TransmuteConfig, Transmuter};
    ///
    /// let text = "BO_ 291 EngineData: 8 ECU1\n SG_ EngineSpeed : 0|16@1+ (1,0) [0|8000] \"rpm\" ECU2\n";
    /// let transmuter = Transmuter::new(TransmuteConfig::new().with_extended_labels(true));
    /// let dbc = transmuter.transmute(text).unwrap();
    ///
    /// assert_eq!(dbc.params[0].signals[0].label, "EngineData.EngineSpeed");
    /// assert!(dbc.problems.is_empty());
    /// ```
    pub fn transmute(&self, text: &str) -> Result<Dbc> {
        let mut assembler = Assembler::new();

        for line in DbcLines::new(text) {
            match line.kind {
                RecordKind::Message => {
                    assembler.open_message(message::parse_message(&line)?);
                }
                RecordKind::Signal => {
                    let signal = signal::parse_signal(&line, assembler.problems_mut())?;
                    assembler.attach_signal(signal)?;
                }
                RecordKind::ValueTable => {
                    if let Some(table) =
                        value_table::parse_value_table(&line, assembler.problems_mut())
                    {
                        assembler.add_value_table(table);
                    }
                }
                RecordKind::Ignored => {
                    log::trace!("Skipping line {}", line.number);
                }
            }
        }

        let dbc = assembler.finish(&self.config);
        let stats = dbc.stats();
        log::info!(
            "Decoded {} messages with {} signals ({} warnings, {} errors)",
            stats.num_messages,
            stats.num_signals,
            stats.num_warnings,
            stats.num_errors
        );

        Ok(dbc)
    }
}

/// Convert DBC text with the given options
pub fn transmute(text: &str, config: TransmuteConfig) -> Result<Dbc> {
    Transmuter::new(config).transmute(text)
}
