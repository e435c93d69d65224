//! `VAL_` record parser
//!
//! `VAL_ <can id> <signal name> <value> "<label>" <value> "<label>" ... ;`

use crate::dbc::lexer::{unquote, DbcLine};
use crate::dbc::problems::ProblemLog;
use crate::types::ProblemKind;

/// A parsed `VAL_` line, not yet matched to a signal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueTableRecord {
    pub line: usize,
    /// Raw CAN ID of the owning message
    pub can_id: u32,
    pub signal_name: String,
    /// (raw value, label) pairs in file order
    pub states: Vec<(i64, String)>,
}

/// Parse a `VAL_` line
///
/// Never fatal: shape problems are reported and the usable pairs are kept.
/// Returns `None` when the line does not say which signal it belongs to.
pub fn parse_value_table(line: &DbcLine<'_>, problems: &mut ProblemLog) -> Option<ValueTableRecord> {
    let reference = line
        .tokens
        .get(1..3)
        .and_then(|r| r[0].parse::<u32>().ok().map(|can_id| (can_id, r[1])));
    let Some((can_id, signal_name)) = reference else {
        problems.report(line.number, ProblemKind::ValueTableWithoutReference);
        return None;
    };

    let pairs = strip_terminator(&line.tokens[3..]);
    // An odd line is reported once, even when it holds a single pair
    if pairs.len() % 2 != 0 {
        problems.report(line.number, ProblemKind::OddValueTable);
    } else if pairs.len() == 2 {
        problems.report(line.number, ProblemKind::SingleState);
    }

    let mut states = Vec::with_capacity(pairs.len() / 2);
    for pair in pairs.chunks_exact(2) {
        match pair[0].parse::<i64>() {
            Ok(value) => states.push((value, unquote(pair[1]).to_string())),
            Err(_) => problems.report(
                line.number,
                ProblemKind::StateValueNotNumber(pair[0].to_string()),
            ),
        }
    }

    Some(ValueTableRecord {
        line: line.number,
        can_id,
        signal_name: signal_name.to_string(),
        states,
    })
}

/// Drop the closing `;`, whether it stands alone or sticks to the last label
fn strip_terminator<'a>(tokens: &[&'a str]) -> Vec<&'a str> {
    let mut tokens = tokens.to_vec();
    if let Some(last) = tokens.pop() {
        match last.strip_suffix(';') {
            Some("") => {}
            Some(rest) => tokens.push(rest),
            None => tokens.push(last),
        }
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dbc::lexer::DbcLines;
    use crate::types::{Problem, Severity};

    fn parse(text: &str) -> (Option<ValueTableRecord>, Vec<Problem>) {
        let line = DbcLines::new(text).next().unwrap();
        let mut problems = ProblemLog::new();
        let record = parse_value_table(&line, &mut problems);
        (record, problems.into_vec())
    }

    #[test]
    fn test_parse_value_table() {
        let (record, problems) =
            parse(r#"VAL_ 2364540158 Status 0 "Off" 1 "On" 2 "Not available" ;"#);
        let record = record.unwrap();

        assert!(problems.is_empty());
        assert_eq!(record.can_id, 2364540158);
        assert_eq!(record.signal_name, "Status");
        assert_eq!(
            record.states,
            vec![
                (0, "Off".to_string()),
                (1, "On".to_string()),
                (2, "Not available".to_string()),
            ]
        );
    }

    #[test]
    fn test_terminator_attached_to_label() {
        let (record, problems) = parse(r#"VAL_ 100 Gear 0 "P" 1 "R";"#);
        assert!(problems.is_empty());
        assert_eq!(record.unwrap().states[1], (1, "R".to_string()));
    }

    #[test]
    fn test_odd_token_count() {
        let (record, problems) = parse(r#"VAL_ 100 Gear 0 "P" 1 "R" 2 ;"#);
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].severity, Severity::Warning);
        assert_eq!(problems[0].kind, ProblemKind::OddValueTable);
        assert_eq!(record.unwrap().states.len(), 2);
    }

    #[test]
    fn test_single_state() {
        let (record, problems) = parse(r#"VAL_ 100 Gear 0 "P" ;"#);
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].kind, ProblemKind::SingleState);
        assert_eq!(problems[0].severity, Severity::Warning);
        assert_eq!(record.unwrap().states.len(), 1);
    }

    #[test]
    fn test_single_pair_with_dangling_token() {
        let (record, problems) = parse(r#"VAL_ 100 Gear 0 "P" 2 ;"#);
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].kind, ProblemKind::OddValueTable);
        assert_eq!(record.unwrap().states, vec![(0, "P".to_string())]);
    }

    #[test]
    fn test_no_states() {
        let (record, problems) = parse("VAL_ 100 Gear ;");
        assert!(problems.is_empty());
        assert!(record.unwrap().states.is_empty());
    }

    #[test]
    fn test_negative_and_invalid_values() {
        let (record, problems) = parse(r#"VAL_ 100 Temp -1 "Fault" x "Bad" 3 "Ok" ;"#);
        let record = record.unwrap();

        assert_eq!(record.states, vec![(-1, "Fault".to_string()), (3, "Ok".to_string())]);
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].kind, ProblemKind::StateValueNotNumber("x".to_string()));
    }

    #[test]
    fn test_missing_reference() {
        let (record, problems) = parse("VAL_ Gear 0 \"P\" 1 \"R\" ;");
        assert!(record.is_none());
        assert_eq!(problems[0].kind, ProblemKind::ValueTableWithoutReference);

        let (record, _) = parse("VAL_ 100");
        assert!(record.is_none());
    }
}
