//! `BO_` record parser
//!
//! `BO_ <can id> <name>: <length> <sender>`

use crate::can_id::CanIdentifierFields;
use crate::dbc::lexer::DbcLine;
use crate::dbc::model::Message;
use crate::types::{DbcError, Result};

/// Fields after the `BO_` prefix
const MESSAGE_FIELDS: usize = 4;

/// Parse a `BO_` line into a message without signals
pub fn parse_message(line: &DbcLine<'_>) -> Result<Message> {
    let fields = line.tokens.get(1..).unwrap_or(&[]);
    if fields.len() != MESSAGE_FIELDS {
        return Err(DbcError::MessageNotStandard { line: line.number });
    }

    let can_id: u32 = fields[0]
        .parse()
        .map_err(|_| DbcError::MessageIdNotNumber { line: line.number })?;
    let length: u32 = fields[2]
        .parse()
        .map_err(|_| DbcError::MessageLengthNotNumber { line: line.number })?;
    let name = fields[1].strip_suffix(':').unwrap_or(fields[1]);

    Ok(Message {
        name: name.to_string(),
        can_id,
        id_fields: CanIdentifierFields::split(can_id),
        sender: fields[3].to_string(),
        length,
        line: line.number,
        signals: Vec::new(),
    })
}
