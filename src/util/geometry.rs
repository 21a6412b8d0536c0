// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module maps between the map's logical coordinates (origin at the
//! bottom-left, y up) and screen positions inside a container (origin at the
//! top-left, y down). The map image is fitted into the container with
//! "contain" semantics: fully visible, uncropped and centered on the axis
//! that has space left over.

use crate::models::{coordinate::MapPoint, map::MapDefinition};

/// Slack allowed when a pointer sits exactly on the image edge.
const EDGE_EPSILON: f64 = 1e-6;

/// Screen rectangle of the element that hosts the map image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Container {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Container {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Where the image is drawn, relative to the container's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayRect {
    pub offset_x: f64,
    pub offset_y: f64,
    pub width: f64,
    pub height: f64,
}

/// Marker placement as percentages of the container's extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerPosition {
    pub left_percent: f64,
    pub top_percent: f64,
}

/// Fit the map into the container.
///
/// Returns `None` for a container with no area.
pub fn display_rect(container: &Container, map: &MapDefinition) -> Option<DisplayRect> {
    if container.is_degenerate() {
        return None;
    }

    let container_ratio = container.width / container.height;
    let image_ratio = map.aspect_ratio();

    let rect = if container_ratio > image_ratio {
        // Container is wider: fill the height, center horizontally
        let height = container.height;
        let width = height * image_ratio;
        DisplayRect {
            offset_x: (container.width - width) / 2.0,
            offset_y: 0.0,
            width,
            height,
        }
    } else {
        // Container is taller: fill the width, center vertically
        let width = container.width;
        let height = width / image_ratio;
        DisplayRect {
            offset_x: 0.0,
            offset_y: (container.height - height) / 2.0,
            width,
            height,
        }
    };

    Some(rect)
}

/// Fractional position of a map point within the image, y flipped to point down.
fn image_fraction(point: MapPoint, map: &MapDefinition) -> (f64, f64) {
    let width = f64::from(map.width);
    let height = f64::from(map.height);
    (f64::from(point.x) / width, (height - f64::from(point.y)) / height)
}

/// Absolute screen position of a map point.
pub fn map_to_display_pixel(
    point: MapPoint,
    map: &MapDefinition,
    container: &Container,
) -> Option<(f64, f64)> {
    let rect = display_rect(container, map)?;
    let (left_frac, top_frac) = image_fraction(point, map);
    Some((
        container.left + rect.offset_x + rect.width * left_frac,
        container.top + rect.offset_y + rect.height * top_frac,
    ))
}

/// Marker position of a map point as a percentage of the container.
pub fn map_to_display(
    point: MapPoint,
    map: &MapDefinition,
    container: &Container,
) -> Option<MarkerPosition> {
    let (x, y) = map_to_display_pixel(point, map, container)?;
    Some(MarkerPosition {
        left_percent: (x - container.left) / container.width * 100.0,
        top_percent: (y - container.top) / container.height * 100.0,
    })
}

/// Map a pointer position back to map coordinates.
///
/// Returns `None` when the pointer is outside the drawn image.
pub fn display_to_map(
    pointer_x: f64,
    pointer_y: f64,
    container: &Container,
    map: &MapDefinition,
) -> Option<MapPoint> {
    let rect = display_rect(container, map)?;

    let relative_x = pointer_x - container.left - rect.offset_x;
    let relative_y = pointer_y - container.top - rect.offset_y;

    let inside =
        |value: f64, extent: f64| value >= -EDGE_EPSILON && value <= extent + EDGE_EPSILON;
    if !inside(relative_x, rect.width) || !inside(relative_y, rect.height) {
        return None;
    }
    let relative_x = relative_x.clamp(0.0, rect.width);
    let relative_y = relative_y.clamp(0.0, rect.height);

    let scale_x = f64::from(map.width) / rect.width;
    let scale_y = f64::from(map.height) / rect.height;

    let map_x = (relative_x * scale_x).round() as u32;
    let map_y = ((rect.height - relative_y) * scale_y).round() as u32;

    Some(MapPoint::new(map_x.min(map.width), map_y.min(map.height)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(width: u32, height: u32) -> MapDefinition {
        MapDefinition {
            id: "test".to_string(),
            name: "test".to_string(),
            image_ref: "test.png".to_string(),
            width,
            height,
            description: String::new(),
        }
    }

    /// A container at the screen origin.
    fn sized(width: f64, height: f64) -> Container {
        Container::new(0.0, 0.0, width, height)
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 0.0001,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_letterbox_centers_vertically() {
        let rect = display_rect(&sized(800.0, 600.0), &map(200, 100)).unwrap();
        assert_close(rect.width, 800.0);
        assert_close(rect.height, 400.0);
        assert_close(rect.offset_x, 0.0);
        assert_close(rect.offset_y, 100.0);
    }

    #[test]
    fn test_pillarbox_centers_horizontally() {
        let rect = display_rect(&sized(1000.0, 400.0), &map(200, 100)).unwrap();
        assert_close(rect.width, 800.0);
        assert_close(rect.height, 400.0);
        assert_close(rect.offset_x, 100.0);
        assert_close(rect.offset_y, 0.0);
    }

    #[test]
    fn test_degenerate_container() {
        assert!(display_rect(&sized(0.0, 600.0), &map(200, 100)).is_none());
        assert!(display_to_map(1.0, 1.0, &sized(800.0, 0.0), &map(200, 100)).is_none());
    }

    #[test]
    fn test_axis_flip() {
        let m = map(100, 50);
        // Same aspect ratio as the map, so the image fills the container
        let container = sized(200.0, 100.0);

        let bottom = map_to_display(MapPoint::new(0, 0), &m, &container).unwrap();
        assert_close(bottom.left_percent, 0.0);
        assert_close(bottom.top_percent, 100.0);

        let top = map_to_display(MapPoint::new(0, 50), &m, &container).unwrap();
        assert_close(top.top_percent, 0.0);

        let right = map_to_display(MapPoint::new(100, 25), &m, &container).unwrap();
        assert_close(right.left_percent, 100.0);
        assert_close(right.top_percent, 50.0);
    }

    #[test]
    fn test_marker_percentages_include_letterbox() {
        let m = map(200, 100);
        let container = Container::new(30.0, 40.0, 800.0, 600.0);

        // Map origin sits at the bottom of the 800x400 band starting at y=100
        let origin = map_to_display(MapPoint::new(0, 0), &m, &container).unwrap();
        assert_close(origin.left_percent, 0.0);
        assert_close(origin.top_percent, 500.0 / 600.0 * 100.0);

        let (px, py) = map_to_display_pixel(MapPoint::new(100, 50), &m, &container).unwrap();
        assert_close(px, 30.0 + 400.0);
        assert_close(py, 40.0 + 300.0);
    }

    #[test]
    fn test_pointer_outside_image() {
        let m = map(200, 100);
        let container = sized(800.0, 600.0);

        // Letterbox band above and below the image
        assert!(display_to_map(400.0, 50.0, &container, &m).is_none());
        assert!(display_to_map(400.0, 550.0, &container, &m).is_none());
        // Left of the container entirely
        assert!(display_to_map(-1.0, 300.0, &container, &m).is_none());
    }

    #[test]
    fn test_pointer_maps_with_flip_and_rounding() {
        let m = map(200, 100);
        let container = Container::new(10.0, 20.0, 800.0, 600.0);

        // Top-left corner of the drawn image is (0, height)
        assert_eq!(display_to_map(10.0, 120.0, &container, &m), Some(MapPoint::new(0, 100)));
        // Bottom-right corner is (width, 0)
        assert_eq!(display_to_map(810.0, 520.0, &container, &m), Some(MapPoint::new(200, 0)));
        // Scale is 4 screen pixels per map unit
        assert_eq!(
            display_to_map(10.0 + 41.0, 120.0 + 39.0, &container, &m),
            Some(MapPoint::new(10, 90))
        );
    }

    #[test]
    fn test_roundtrip_within_one_unit() {
        let maps = [map(287, 143), map(191, 119), map(1200, 900), map(960, 720), map(100, 300)];
        let containers = [
            sized(800.0, 600.0),
            Container::new(12.5, 7.25, 1280.0, 400.0),
            Container::new(0.0, 64.0, 333.0, 777.0),
        ];

        for m in &maps {
            for container in &containers {
                let points = [
                    (0, 0),
                    (m.width, m.height),
                    (m.width / 3, m.height / 7),
                    (1, m.height - 1),
                ];
                for &(x, y) in &points {
                    let point = MapPoint::new(x, y);
                    let (px, py) = map_to_display_pixel(point, m, container).unwrap();
                    let back = display_to_map(px, py, container, m)
                        .unwrap_or_else(|| panic!("{:?} fell outside the image", point));
                    assert!((back.x as i64 - x as i64).abs() <= 1, "x: {} -> {}", x, back.x);
                    assert!((back.y as i64 - y as i64).abs() <= 1, "y: {} -> {}", y, back.y);
                }
            }
        }
    }
}
