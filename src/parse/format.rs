// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Strict parser for manually entered coordinates.
//!
//! Parsing happens in two passes. The input is first split into tokens:
//! every non-blank line is one token, except that a line containing
//! whitespace but no parenthesis is split on whitespace into several tokens.
//! Each token is then matched against
//!
//! ```text
//! token     := "("? digits separator digits ")"? (separator label)?
//! separator := ("," | whitespace)+
//! label     := any text without ","
//! ```
//!
//! Any malformed or out-of-range token fails the whole call.

use crate::models::coordinate::{grid_label, Bounds, Coordinate};
use thiserror::Error;

/// Reasons a coordinate list is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("coordinate {position} is malformed: \"{token}\"")]
    Format { position: usize, token: String },

    #[error(
        "coordinate {position} is out of range: ({x}, {y}), map size is {width}×{height}"
    )]
    Range {
        position: usize,
        x: u64,
        y: u64,
        width: u32,
        height: u32,
    },
}

/// Parse free-form coordinate text into coordinates within `bounds`.
pub fn parse(input: &str, bounds: Bounds) -> Result<Vec<Coordinate>, ParseError> {
    tokenize(input)
        .into_iter()
        .enumerate()
        .map(|(index, token)| -> Result<Coordinate, ParseError> {
            let position = index + 1;
            let raw = match_token(token).ok_or_else(|| ParseError::Format {
                position,
                token: token.to_string(),
            })?;
            check_bounds(position, raw.x, raw.y, bounds)?;
            let label = raw.label.unwrap_or_else(|| grid_label(index));
            // Both values fit in u32 once they are inside the bounds.
            Ok(Coordinate::new(raw.x as u32, raw.y as u32, label))
        })
        .collect()
}

/// Reject a point outside `bounds`, reporting it as the `position`-th entry.
pub fn check_bounds(position: usize, x: u64, y: u64, bounds: Bounds) -> Result<(), ParseError> {
    if bounds.contains(x, y) {
        Ok(())
    } else {
        Err(ParseError::Range {
            position,
            x,
            y,
            width: bounds.width,
            height: bounds.height,
        })
    }
}

fn tokenize(input: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    for line in input.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let has_paren = line.contains(['(', ')']);
        if !has_paren && line.contains(char::is_whitespace) {
            tokens.extend(line.split_whitespace());
        } else {
            tokens.push(line);
        }
    }
    tokens
}

#[derive(Debug, PartialEq, Eq)]
struct RawToken {
    x: u64,
    y: u64,
    label: Option<String>,
}

fn is_separator(c: char) -> bool {
    c == ',' || c.is_whitespace()
}

/// Match a single token against the grammar.
fn match_token(token: &str) -> Option<RawToken> {
    let rest = token.strip_prefix('(').unwrap_or(token);

    let (x, rest) = take_number(rest)?;
    let rest = take_separator(rest)?;
    let (y, rest) = take_number(rest)?;
    let rest = rest.strip_prefix(')').unwrap_or(rest);

    if rest.is_empty() {
        return Some(RawToken { x, y, label: None });
    }

    let label = take_separator(rest)?;
    if label.is_empty() || label.contains(',') {
        return None;
    }
    let label = label.trim();

    Some(RawToken {
        x,
        y,
        label: (!label.is_empty()).then(|| label.to_string()),
    })
}

/// Consume leading ASCII digits. Values too large for `u64` saturate, which
/// still lands them outside any map.
fn take_number(s: &str) -> Option<(u64, &str)> {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    if end == 0 {
        return None;
    }
    let value = s[..end].parse::<u64>().unwrap_or(u64::MAX);
    Some((value, &s[end..]))
}

/// Consume one or more separators.
fn take_separator(s: &str) -> Option<&str> {
    let rest = s.trim_start_matches(is_separator);
    (rest.len() < s.len()).then_some(rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: Bounds = Bounds {
        width: 287,
        height: 143,
    };

    #[test]
    fn test_parse_accepted_forms() {
        let coords = parse("10,20\n30,40,资源点\n(50,60)\n(70,80),BOSS位置", BOUNDS).unwrap();
        assert_eq!(
            coords,
            vec![
                Coordinate::new(10, 20, "1-1"),
                Coordinate::new(30, 40, "资源点"),
                Coordinate::new(50, 60, "1-3"),
                Coordinate::new(70, 80, "BOSS位置"),
            ]
        );
    }

    #[test]
    fn test_parse_separator_flexibility() {
        let coords = parse("(1, 2)\n(3 4) east gate\n5,,6", BOUNDS).unwrap();
        assert_eq!(coords[0], Coordinate::new(1, 2, "1-1"));
        assert_eq!(coords[1], Coordinate::new(3, 4, "east gate"));
        assert_eq!(coords[2], Coordinate::new(5, 6, "1-3"));
    }

    #[test]
    fn test_whitespace_splits_lines_without_parens() {
        let coords = parse("1,2 3,4,A\n\n  5,6  ", BOUNDS).unwrap();
        assert_eq!(
            coords,
            vec![
                Coordinate::new(1, 2, "1-1"),
                Coordinate::new(3, 4, "A"),
                Coordinate::new(5, 6, "1-3"),
            ]
        );
    }

    #[test]
    fn test_synthetic_labels_follow_grid() {
        let input = (0..7).map(|i| format!("{},{}", i, i)).collect::<Vec<_>>().join("\n");
        let coords = parse(&input, BOUNDS).unwrap();
        assert_eq!(coords[4].label, "1-5");
        assert_eq!(coords[5].label, "2-1");
        assert_eq!(coords[6].label, "2-2");
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let coords = parse("0,0\n287,143", BOUNDS).unwrap();
        assert_eq!(coords.len(), 2);
    }

    #[test]
    fn test_out_of_range_fails_whole_input() {
        let err = parse("1,1\n288,10", BOUNDS).unwrap_err();
        assert_eq!(
            err,
            ParseError::Range {
                position: 2,
                x: 288,
                y: 10,
                width: 287,
                height: 143,
            }
        );
        assert_eq!(
            err.to_string(),
            "coordinate 2 is out of range: (288, 10), map size is 287×143"
        );

        let err = parse("5,144", BOUNDS).unwrap_err();
        assert!(matches!(err, ParseError::Range { y: 144, .. }));
    }

    #[test]
    fn test_huge_values_are_range_errors() {
        let err = parse("99999999999999999999999,1", BOUNDS).unwrap_err();
        assert!(matches!(err, ParseError::Range { position: 1, .. }));
    }

    #[test]
    fn test_malformed_tokens() {
        for bad in ["abc,def", "12", "1,2,", "1,2,a,b", "1,2abc", "-1,2", "(1,)", ",1,2"] {
            let err = parse(bad, BOUNDS).unwrap_err();
            assert!(
                matches!(err, ParseError::Format { position: 1, .. }),
                "expected format error for {:?}, got {:?}",
                bad,
                err
            );
        }
    }

    #[test]
    fn test_format_error_reports_position_and_text() {
        let err = parse("1,2\n3,4 oops\n5,6", BOUNDS).unwrap_err();
        assert_eq!(
            err,
            ParseError::Format {
                position: 3,
                token: "oops".to_string(),
            }
        );
        assert_eq!(err.to_string(), "coordinate 3 is malformed: \"oops\"");
    }

    #[test]
    fn test_first_error_wins() {
        let err = parse("abc\n999,999", BOUNDS).unwrap_err();
        assert!(matches!(err, ParseError::Format { position: 1, .. }));
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        assert_eq!(parse("", BOUNDS).unwrap(), Vec::new());
        assert_eq!(parse("\n  \n", BOUNDS).unwrap(), Vec::new());
    }
}
