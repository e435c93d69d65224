//! Decoder configuration types
//!
//! The decoder only knows two post-processing options. Everything else
//! (where the text comes from, where the output goes) belongs to the caller.

use serde::{Deserialize, Serialize};

/// Options applied after all records have been parsed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransmuteConfig {
    /// Drop DM1 messages (PGN 65226) from the output
    #[serde(rename = "filterDM1", alias = "filter_dm1")]
    pub filter_dm1: bool,

    /// Prefix every signal label with its message name (`Message.Signal`)
    pub extended: bool,
}

impl TransmuteConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: enable or disable DM1 filtering
    pub fn with_dm1_filter(mut self, enabled: bool) -> Self {
        self.filter_dm1 = enabled;
        self
    }

    /// Builder method: enable or disable extended signal labels
    pub fn with_extended_labels(mut self, enabled: bool) -> Self {
        self.extended = enabled;
        self
    }
}
