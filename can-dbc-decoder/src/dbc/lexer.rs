//! Line tokenizer and record classifier
//!
//! Splits DBC text into numbered lines, breaks every line into whitespace
//! separated tokens and tags it with the record type named by its first token.

/// Record types the decoder understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// `BO_` message definition
    Message,
    /// `SG_` signal definition
    Signal,
    /// `VAL_` value table
    ValueTable,
    /// Anything else (comments, attributes, node lists, blank lines)
    Ignored,
}

impl RecordKind {
    /// Classify a record by its first token
    pub fn from_prefix(prefix: &str) -> Self {
        match prefix {
            "BO_" => RecordKind::Message,
            "SG_" => RecordKind::Signal,
            "VAL_" => RecordKind::ValueTable,
            _ => RecordKind::Ignored,
        }
    }
}

/// One classified line of DBC text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbcLine<'a> {
    /// 1-based line number
    pub number: usize,
    pub kind: RecordKind,
    /// All tokens, the record prefix included
    pub tokens: Vec<&'a str>,
}

/// Lazy iterator over the classified lines of a DBC document
pub struct DbcLines<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
}

impl<'a> DbcLines<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().enumerate(),
        }
    }
}

impl<'a> Iterator for DbcLines<'a> {
    type Item = DbcLine<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (index, line) = self.lines.next()?;
        let tokens = tokenize(line);
        let kind = match tokens.as_slice() {
            // `NS_ :` symbol list entry, not a value table
            ["VAL_"] => RecordKind::Ignored,
            [prefix, ..] => RecordKind::from_prefix(prefix),
            [] => RecordKind::Ignored,
        };

        Some(DbcLine {
            number: index + 1,
            kind,
            tokens,
        })
    }
}

/// Split a line on whitespace, keeping double-quoted strings in one token
///
/// Quotes stay part of the token; use [`unquote`] to strip them.
pub fn tokenize(line: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;
    let mut in_quotes = false;

    for (pos, ch) in line.char_indices() {
        if ch == '"' {
            in_quotes = !in_quotes;
            start.get_or_insert(pos);
        } else if ch.is_whitespace() && !in_quotes {
            if let Some(begin) = start.take() {
                tokens.push(&line[begin..pos]);
            }
        } else {
            start.get_or_insert(pos);
        }
    }

    if let Some(begin) = start {
        tokens.push(&line[begin..]);
    }

    tokens
}

/// Strip one pair of surrounding double quotes, if present
pub fn unquote(token: &str) -> &str {
    token
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(token)
}
