// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation session state.
//!
//! The session owns the ordered list of coordinates placed on the currently
//! selected map. It is capped at [`MAX_COORDINATES`] entries; batches that
//! would overflow the cap are truncated and the number of dropped entries is
//! reported back to the caller.

use super::coordinate::{grid_label, Coordinate, MapPoint};

/// Maximum number of coordinates held by a session.
pub const MAX_COORDINATES: usize = 20;

/// Result of adding a batch of coordinates to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AppendOutcome {
    pub added: usize,
    pub dropped: usize,
}

impl AppendOutcome {
    pub fn is_truncated(&self) -> bool {
        self.dropped > 0
    }
}

/// Ordered, capped set of coordinates for one map.
#[derive(Debug, Clone)]
pub struct AnnotationSession {
    coordinates: Vec<Coordinate>,
    capacity: usize,
}

impl Default for AnnotationSession {
    fn default() -> Self {
        Self::new()
    }
}

impl AnnotationSession {
    pub fn new() -> Self {
        Self::with_capacity(MAX_COORDINATES)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            coordinates: Vec::new(),
            capacity,
        }
    }

    pub fn coordinates(&self) -> &[Coordinate] {
        &self.coordinates
    }

    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.coordinates.len() >= self.capacity
    }

    /// Replace the session with a freshly parsed set.
    pub fn apply_parsed_coordinates(&mut self, parsed: Vec<Coordinate>) -> AppendOutcome {
        self.coordinates.clear();
        self.append(parsed)
    }

    /// Add coordinates after the existing ones, dropping whatever exceeds the cap.
    pub fn append(&mut self, incoming: Vec<Coordinate>) -> AppendOutcome {
        let room = self.capacity.saturating_sub(self.coordinates.len());
        let total = incoming.len();
        let added = total.min(room);

        self.coordinates.extend(incoming.into_iter().take(added));

        let outcome = AppendOutcome {
            added,
            dropped: total - added,
        };
        if outcome.is_truncated() {
            log::warn!(
                "Session cap of {} reached, dropped {} coordinate(s)",
                self.capacity,
                outcome.dropped
            );
        }
        outcome
    }

    /// Add a single clicked point labelled by its grid position.
    ///
    /// Returns `None` when the session is already full.
    pub fn add_point(&mut self, point: MapPoint) -> Option<&Coordinate> {
        if self.is_full() {
            return None;
        }
        let label = grid_label(self.coordinates.len());
        self.coordinates.push(Coordinate::new(point.x, point.y, label));
        self.coordinates.last()
    }

    /// Flip visibility of one coordinate, returning the new state.
    pub fn toggle_visibility(&mut self, index: usize) -> Option<bool> {
        let coord = self.coordinates.get_mut(index)?;
        coord.visible = !coord.visible;
        Some(coord.visible)
    }

    pub fn clear(&mut self) {
        self.coordinates.clear();
    }

    /// Render the session as parser input, one `x,y,label` line per coordinate.
    pub fn to_input_text(&self) -> String {
        self.coordinates
            .iter()
            .map(Coordinate::to_input_line)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
