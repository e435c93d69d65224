//! DBC file reading

use anyhow::{Context, Result};
use std::path::Path;

/// Read a DBC file as text
///
/// DBC files exported by older tools are often Windows-1252; anything that is
/// not valid UTF-8 is decoded as Latin-1 instead.
pub fn read_dbc_file(path: &Path) -> Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read DBC file {:?}", path))?;

    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(err) => {
            log::warn!("DBC file {:?} is not UTF-8, trying Latin-1 encoding", path);
            Ok(err.into_bytes().iter().map(|&b| b as char).collect())
        }
    }
}
