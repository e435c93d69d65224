//! `SG_` record parser
//!
//! `SG_ <name> [M|m<N>] : <start>|<length>@<order><sign> (<factor>,<offset>) [<min>|<max>] "<unit>" <receivers>`
//!
//! A line has eight tokens, or nine when a multiplexer marker sits between
//! the name and the colon. A nine token line whose colon directly follows the
//! name carries a second, space separated receiver list instead.

use crate::dbc::lexer::{unquote, DbcLine};
use crate::dbc::model::{ByteOrder, MultiplexIndicator, Signal, ValueType};
use crate::dbc::problems::ProblemLog;
use crate::types::{DbcError, ProblemKind, Result};
use std::collections::BTreeMap;

const MIN_TOKENS: usize = 8;
const MAX_TOKENS: usize = 9;

/// Parse an `SG_` line
///
/// Field level damage (bad multiplexer marker, unreadable numbers) is
/// reported to `problems`; only a wrong token count is fatal.
pub fn parse_signal(line: &DbcLine<'_>, problems: &mut ProblemLog) -> Result<Signal> {
    let tokens = &line.tokens;
    if !(MIN_TOKENS..=MAX_TOKENS).contains(&tokens.len()) {
        return Err(DbcError::SignalNotStandard { line: line.number });
    }

    let name = tokens[1];
    let (marker, fields) = if tokens.len() == MAX_TOKENS && tokens[2] != ":" {
        (Some(tokens[2]), &tokens[4..])
    } else {
        (None, &tokens[3..])
    };

    let multiplexer = match marker {
        None => MultiplexIndicator::Plain,
        Some(marker) => parse_multiplexer(marker).unwrap_or_else(|| {
            problems.report(line.number, ProblemKind::MalformedMultiplexer);
            MultiplexIndicator::Unresolved
        }),
    };

    let (start_bit, bit_length, byte_order, value_type) =
        parse_layout(fields[0]).unwrap_or_else(|| {
            problems.report(line.number, ProblemKind::MalformedSignalField("bit layout"));
            (0, 0, ByteOrder::LittleEndian, ValueType::Unsigned)
        });

    let (factor, offset) = parse_pair(fields[1], ('(', ')'), ',').unwrap_or_else(|| {
        problems.report(line.number, ProblemKind::MalformedSignalField("factor/offset"));
        (1.0, 0.0)
    });

    let (min, max) = parse_pair(fields[2], ('[', ']'), '|').unwrap_or_else(|| {
        problems.report(line.number, ProblemKind::MalformedSignalField("minimum/maximum"));
        (0.0, 0.0)
    });

    Ok(Signal {
        name: name.to_string(),
        label: name.to_string(),
        start_bit,
        bit_length,
        byte_order,
        value_type,
        factor,
        offset,
        min,
        max,
        unit: unquote(fields[3]).to_string(),
        receivers: parse_receivers(&fields[4..]),
        multiplexer,
        value_labels: BTreeMap::new(),
        line: line.number,
    })
}

/// `M` or `m<N>`
fn parse_multiplexer(marker: &str) -> Option<MultiplexIndicator> {
    if marker == "M" {
        return Some(MultiplexIndicator::Multiplexor);
    }
    let index = marker.strip_prefix('m')?;
    if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    index
        .parse()
        .ok()
        .map(|index| MultiplexIndicator::Multiplexed { index })
}

/// `<start>|<length>@<order><sign>`
fn parse_layout(field: &str) -> Option<(u16, u16, ByteOrder, ValueType)> {
    let (start, rest) = field.split_once('|')?;
    let (length, order_sign) = rest.split_once('@')?;

    let byte_order = match order_sign.get(..1)? {
        "1" => ByteOrder::LittleEndian,
        "0" => ByteOrder::BigEndian,
        _ => return None,
    };
    let value_type = match order_sign.get(1..)? {
        "+" => ValueType::Unsigned,
        "-" => ValueType::Signed,
        _ => return None,
    };

    Some((start.parse().ok()?, length.parse().ok()?, byte_order, value_type))
}

/// Two floats wrapped in `open`/`close` and split by `separator`
fn parse_pair(field: &str, (open, close): (char, char), separator: char) -> Option<(f64, f64)> {
    let inner = field.strip_prefix(open)?.strip_suffix(close)?;
    let (first, second) = inner.split_once(separator)?;
    Some((first.trim().parse().ok()?, second.trim().parse().ok()?))
}

/// Comma separated receivers, possibly spread over several tokens
fn parse_receivers(tokens: &[&str]) -> Vec<String> {
    let mut receivers: Vec<String> = Vec::new();
    for receiver in tokens.iter().flat_map(|t| t.split(',')) {
        let receiver = receiver.trim();
        if !receiver.is_empty() && !receivers.iter().any(|r| r == receiver) {
            receivers.push(receiver.to_string());
        }
    }
    receivers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dbc::lexer::DbcLines;
    use crate::types::Severity;

    fn parse(text: &str) -> (Result<Signal>, Vec<crate::types::Problem>) {
        let line = DbcLines::new(text).next().unwrap();
        let mut problems = ProblemLog::new();
        let result = parse_signal(&line, &mut problems);
        (result, problems.into_vec())
    }

    #[test]
    fn test_parse_plain_signal() {
        let (signal, problems) =
            parse(r#" SG_ EngineTemp : 16|8@1- (0.5,-40) [-40|87.5] "deg C" ECU2,ECU3"#);
        let signal = signal.unwrap();

        assert!(problems.is_empty());
        assert_eq!(signal.name, "EngineTemp");
        assert_eq!(signal.label, "EngineTemp");
        assert_eq!(signal.start_bit, 16);
        assert_eq!(signal.bit_length, 8);
        assert_eq!(signal.byte_order, ByteOrder::LittleEndian);
        assert_eq!(signal.value_type, ValueType::Signed);
        assert_eq!(signal.factor, 0.5);
        assert_eq!(signal.offset, -40.0);
        assert_eq!(signal.min, -40.0);
        assert_eq!(signal.max, 87.5);
        assert_eq!(signal.unit, "deg C");
        assert_eq!(signal.receivers, vec!["ECU2", "ECU3"]);
        assert_eq!(signal.multiplexer, MultiplexIndicator::Plain);
    }

    #[test]
    fn test_big_endian_unsigned() {
        let (signal, _) = parse(r#" SG_ Speed : 7|16@0+ (0.01,0) [0|655.35] "km/h" Vector__XXX"#);
        let signal = signal.unwrap();
        assert_eq!(signal.byte_order, ByteOrder::BigEndian);
        assert_eq!(signal.value_type, ValueType::Unsigned);
        assert_eq!(signal.receivers, vec!["Vector__XXX"]);
    }

    #[test]
    fn test_multiplexer_markers() {
        let (signal, problems) = parse(r#" SG_ Mode M : 0|8@1+ (1,0) [0|3] "" ECU1"#);
        assert_eq!(signal.unwrap().multiplexer, MultiplexIndicator::Multiplexor);
        assert!(problems.is_empty());

        let (signal, problems) = parse(r#" SG_ SignalB m12 : 8|16@1+ (0.1,0) [0|1000] "mV" ECU1"#);
        let signal = signal.unwrap();
        assert_eq!(signal.multiplexer, MultiplexIndicator::Multiplexed { index: 12 });
        assert_eq!(signal.factor, 0.1);
        assert!(problems.is_empty());
    }

    #[test]
    fn test_malformed_multiplexer_is_an_error_problem() {
        for marker in ["X", "m", "mx", "m1M", "m-1", "M1"] {
            let text = format!(r#" SG_ Sig {} : 0|8@1+ (1,0) [0|255] "" ECU1"#, marker);
            let (signal, problems) = parse(&text);

            let signal = signal.unwrap();
            assert_eq!(signal.multiplexer, MultiplexIndicator::Unresolved, "{}", marker);
            assert_eq!(signal.bit_length, 8);
            assert_eq!(problems.len(), 1);
            assert_eq!(problems[0].severity, Severity::Error);
            assert_eq!(problems[0].kind, ProblemKind::MalformedMultiplexer);
        }
    }

    #[test]
    fn test_nine_tokens_without_marker() {
        let (signal, problems) = parse(r#" SG_ Sig : 0|8@1+ (1,0) [0|255] "" ECU1, ECU2"#);
        let signal = signal.unwrap();
        assert!(problems.is_empty());
        assert_eq!(signal.multiplexer, MultiplexIndicator::Plain);
        assert_eq!(signal.receivers, vec!["ECU1", "ECU2"]);
    }

    #[test]
    fn test_wrong_token_count_is_fatal() {
        let (result, _) = parse(r#" SG_ Sig : 0|8@1+ (1,0) [0|255] ECU1"#);
        let err = result.unwrap_err();
        assert_eq!(err, DbcError::SignalNotStandard { line: 1 });
        assert!(err
            .to_string()
            .starts_with("SG_ line at 1 does not follow DBC standard; should have eight"));

        let (result, _) = parse(r#" SG_ Sig M : 0|8@1+ (1,0) [0|255] "" ECU1 ECU2"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_malformed_numbers_fall_back_to_defaults() {
        let (signal, problems) = parse(r#" SG_ Sig : 0|x@1+ (a,0) [0;1] "" ECU1"#);
        let signal = signal.unwrap();

        assert_eq!(signal.bit_length, 0);
        assert_eq!(signal.factor, 1.0);
        assert_eq!(signal.max, 0.0);
        assert_eq!(problems.len(), 3);
        assert!(problems.iter().all(|p| p.severity == Severity::Error));
        assert!(problems[0].description.contains("bit layout"));
        assert!(problems[1].description.contains("factor/offset"));
        assert!(problems[2].description.contains("minimum/maximum"));
    }

    #[test]
    fn test_scientific_notation_factor() {
        let (signal, _) = parse(r#" SG_ Sig : 0|32@1+ (1E-005,0) [0|1] "" ECU1"#);
        assert_eq!(signal.unwrap().factor, 1e-5);
    }
}
