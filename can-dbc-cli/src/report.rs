//! Conversion summaries

use can_dbc_decoder::{Dbc, Severity};
use std::path::Path;

/// Log every problem of a converted file
pub fn log_problems(path: &Path, dbc: &Dbc) {
    for problem in &dbc.problems {
        match problem.severity {
            Severity::Warning => log::warn!("{:?}: {}", path, problem),
            Severity::Error => log::error!("{:?}: {}", path, problem),
        }
    }
}

/// One-line summary of a converted file
pub fn summary(path: &Path, dbc: &Dbc) -> String {
    let stats = dbc.stats();
    format!(
        "{}: {} messages, {} signals, {} warnings, {} errors",
        path.display(),
        stats.num_messages,
        stats.num_signals,
        stats.num_warnings,
        stats.num_errors
    )
}
