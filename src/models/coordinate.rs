// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Coordinate data structures.
//!
//! Coordinates live in the map's logical coordinate system: origin at the
//! bottom-left corner of the map image, x growing rightward, y growing upward.

/// Number of columns in the grid used for synthetic labels.
pub const GRID_COLUMNS: usize = 5;

/// A bare position in map coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapPoint {
    pub x: u32,
    pub y: u32,
}

impl MapPoint {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Inclusive extent of a map: valid points satisfy `0 <= x <= width` and
/// `0 <= y <= height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub width: u32,
    pub height: u32,
}

impl Bounds {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Check whether a point lies inside the map.
    pub fn contains(&self, x: u64, y: u64) -> bool {
        x <= u64::from(self.width) && y <= u64::from(self.height)
    }
}

/// A labelled annotation on the current map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coordinate {
    pub x: u32,
    pub y: u32,
    pub label: String,
    pub visible: bool,
}

impl Coordinate {
    /// Create a new visible coordinate.
    pub fn new(x: u32, y: u32, label: impl Into<String>) -> Self {
        Self {
            x,
            y,
            label: label.into(),
            visible: true,
        }
    }

    pub fn point(&self) -> MapPoint {
        MapPoint::new(self.x, self.y)
    }

    /// Render as a line accepted by the coordinate text parser.
    ///
    /// Labels containing whitespace need the parenthesised form, otherwise the
    /// parser would split the line into separate tokens.
    pub fn to_input_line(&self) -> String {
        if self.label.contains(char::is_whitespace) {
            format!("({},{}),{}", self.x, self.y, self.label)
        } else {
            format!("{},{},{}", self.x, self.y, self.label)
        }
    }
}

/// Label for the `index`-th point (0-based) in a 5-column grid, e.g. `1-1`, `1-5`, `2-1`.
pub fn grid_label(index: usize) -> String {
    let row = index / GRID_COLUMNS + 1;
    let col = index % GRID_COLUMNS + 1;
    format!("{}-{}", row, col)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_label_wraps_every_five() {
        assert_eq!(grid_label(0), "1-1");
        assert_eq!(grid_label(4), "1-5");
        assert_eq!(grid_label(5), "2-1");
        assert_eq!(grid_label(19), "4-5");
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let bounds = Bounds::new(287, 143);
        assert!(bounds.contains(0, 0));
        assert!(bounds.contains(287, 143));
        assert!(!bounds.contains(288, 0));
        assert!(!bounds.contains(0, 144));
    }

    #[test]
    fn test_input_line_format() {
        let coord = Coordinate::new(48, 26, "普陀山");
        assert_eq!(coord.to_input_line(), "48,26,普陀山");
        assert!(coord.visible);

        let spaced = Coordinate::new(1, 2, "east gate");
        assert_eq!(spaced.to_input_line(), "(1,2),east gate");
    }
}
