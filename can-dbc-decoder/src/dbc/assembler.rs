//! Resolver and assembler
//!
//! Collects parsed records into messages: signals go to the message whose
//! `BO_` line precedes them. Value tables are held back until every line has
//! been seen and are then matched by CAN ID and signal name, so a `VAL_` line
//! may come before the message it describes. Post-processing options run last.

use crate::config::TransmuteConfig;
use crate::dbc::model::{Dbc, Message, Signal};
use crate::dbc::problems::ProblemLog;
use crate::dbc::value_table::ValueTableRecord;
use crate::types::{DbcError, ProblemKind, Result};
use std::collections::HashMap;

/// Accumulator for a single conversion
#[derive(Debug, Default)]
pub struct Assembler {
    messages: Vec<Message>,
    /// CAN ID -> index of the first message using it
    first_by_id: HashMap<u32, usize>,
    /// Index of the message new signals attach to
    active: Option<usize>,
    /// Value tables in file order, resolved in `finish`
    pending_tables: Vec<ValueTableRecord>,
    problems: ProblemLog,
}

impl Assembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn problems_mut(&mut self) -> &mut ProblemLog {
        &mut self.problems
    }

    /// Close the current block and make `message` the active one
    pub fn open_message(&mut self, message: Message) {
        self.close_active();

        let index = self.messages.len();
        if self.first_by_id.contains_key(&message.can_id) {
            self.problems.report(message.line, ProblemKind::DuplicateCanId);
        } else {
            self.first_by_id.insert(message.can_id, index);
        }

        log::debug!("BO_ {} (ID 0x{:X}) on line {}", message.name, message.can_id, message.line);
        self.messages.push(message);
        self.active = Some(index);
    }

    /// Append a signal to the active message
    pub fn attach_signal(&mut self, signal: Signal) -> Result<()> {
        let message = self
            .active
            .and_then(|index| self.messages.get_mut(index))
            .ok_or(DbcError::SignalWithoutMessage { line: signal.line })?;

        log::trace!("SG_ {} -> {}", signal.name, message.name);
        message.signals.push(signal);
        Ok(())
    }

    /// Queue a value table for resolution once all messages are known
    pub fn add_value_table(&mut self, table: ValueTableRecord) {
        log::trace!("VAL_ {} {} on line {}", table.can_id, table.signal_name, table.line);
        self.pending_tables.push(table);
    }

    /// Close the last block, resolve value tables and apply the post-processing options
    pub fn finish(mut self, config: &TransmuteConfig) -> Dbc {
        self.close_active();

        for table in std::mem::take(&mut self.pending_tables) {
            self.resolve_value_table(table);
        }

        let mut messages = self.messages;
        if config.filter_dm1 {
            let before = messages.len();
            messages.retain(|m| !m.id_fields.is_dm1());
            log::debug!("Filtered {} DM1 message(s)", before - messages.len());
        }

        if config.extended {
            for message in &mut messages {
                for signal in &mut message.signals {
                    signal.label = format!("{}.{}", message.name, signal.name);
                }
            }
        }

        // Resolution problems are found last; report everything in file order
        let mut problems = self.problems.into_vec();
        problems.sort_by_key(|p| p.line);

        Dbc {
            params: messages,
            problems,
        }
    }

    /// Merge a value table into the signal it names
    fn resolve_value_table(&mut self, table: ValueTableRecord) {
        let Some(&index) = self.first_by_id.get(&table.can_id) else {
            self.problems
                .report(table.line, ProblemKind::UnmatchedMessage(table.can_id));
            return;
        };

        let signal = self.messages[index]
            .signals
            .iter_mut()
            .find(|s| s.name == table.signal_name);
        let Some(signal) = signal else {
            self.problems
                .report(table.line, ProblemKind::UnmatchedSignal(table.signal_name));
            return;
        };

        signal.value_labels.extend(table.states);
    }

    fn close_active(&mut self) {
        if let Some(message) = self.active.take().and_then(|i| self.messages.get(i)) {
            if message.signals.is_empty() {
                self.problems.report(message.line, ProblemKind::EmptyMessage);
            }
        }
    }
}
