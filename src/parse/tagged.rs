// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Lenient extraction of `[坐标]<label>(<x>,<y>)` entries from free text.
//!
//! Used on OCR output, so it never fails: anything that does not look like a
//! tagged coordinate is skipped.

use regex::Regex;
use std::sync::OnceLock;

/// Marker that introduces a tagged coordinate.
pub const COORDINATE_TAG: &str = "[坐标]";

/// A location found in free text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedCoordinate {
    pub location: String,
    pub x: u32,
    pub y: u32,
}

fn pair_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\((\d+),(\d+)\)").expect("valid pair pattern"))
}

/// Extract every tagged coordinate, left to right.
///
/// The label is the shortest text between the tag and the first `(x,y)` pair
/// on the same line. A tag with no usable pair before the next tag (or line
/// end) is skipped.
pub fn extract(text: &str) -> Vec<TaggedCoordinate> {
    let mut found = Vec::new();

    for line in text.lines() {
        // The first piece precedes any tag.
        for segment in line.split(COORDINATE_TAG).skip(1) {
            if let Some(entry) = extract_segment(segment) {
                found.push(entry);
            }
        }
    }

    found
}

fn extract_segment(segment: &str) -> Option<TaggedCoordinate> {
    let caps = pair_pattern().captures(segment)?;
    let pair = caps.get(0)?;
    let x = caps[1].parse().ok()?;
    let y = caps[2].parse().ok()?;

    Some(TaggedCoordinate {
        location: segment[..pair.start()].trim().to_string(),
        x,
        y,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tagged(location: &str, x: u32, y: u32) -> TaggedCoordinate {
        TaggedCoordinate {
            location: location.to_string(),
            x,
            y,
        }
    }

    #[test]
    fn test_single_entry() {
        assert_eq!(extract("[坐标]普陀山(48,26)"), vec![tagged("普陀山", 48, 26)]);
    }

    #[test]
    fn test_no_tags() {
        assert!(extract("no tags here").is_empty());
        assert!(extract("普通文本，没有坐标信息").is_empty());
        assert!(extract("").is_empty());
    }

    #[test]
    fn test_multiple_entries_in_order() {
        assert_eq!(
            extract("[坐标]A(1,2) text [坐标]B(3,4)"),
            vec![tagged("A", 1, 2), tagged("B", 3, 4)]
        );
    }

    #[test]
    fn test_label_is_trimmed() {
        assert_eq!(extract("队友: [坐标]  东海湾 (100,200)"), vec![tagged("东海湾", 100, 200)]);
    }

    #[test]
    fn test_non_numeric_pair_is_skipped() {
        assert!(extract("[坐标]地点(abc,def)").is_empty());
        assert_eq!(
            extract("[坐标]地点(abc,def) [坐标]花果山(300,400)"),
            vec![tagged("花果山", 300, 400)]
        );
    }

    #[test]
    fn test_pair_must_be_tight() {
        assert!(extract("[坐标]A(1, 2)").is_empty());
        assert_eq!(extract("[坐标]A((1,2))"), vec![tagged("A(", 1, 2)]);
    }

    #[test]
    fn test_entries_across_lines() {
        let ocr = "[坐标]朱紫国(123,45)\n杂项 (9,9)\n[坐标]建业城(67,89)";
        assert_eq!(
            extract(ocr),
            vec![tagged("朱紫国", 123, 45), tagged("建业城", 67, 89)]
        );
    }

    #[test]
    fn test_label_does_not_span_lines() {
        assert!(extract("[坐标]普陀山\n(48,26)").is_empty());
    }

    #[test]
    fn test_overflowing_numbers_are_skipped() {
        assert!(extract("[坐标]A(99999999999,1)").is_empty());
    }
}
