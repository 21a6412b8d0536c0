// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Map canvas.
//!
//! Draws the selected map fitted into the available space, the visible
//! coordinate markers on top of it, a coordinate readout under the pointer,
//! and turns left clicks on the image into new points.

use crate::models::{
    coordinate::{Coordinate, MapPoint},
    map::MapDefinition,
};
use crate::util::geometry::{self, Container};

const MARKER_RADIUS: f32 = 6.0;

/// Result of canvas interaction.
pub enum CanvasAction {
    None,
    AddPoint(MapPoint),
}

/// Display the map canvas and handle pointer interaction.
pub fn show(
    ui: &mut egui::Ui,
    map: &MapDefinition,
    map_texture: &Option<egui::TextureHandle>,
    coordinates: &[Coordinate],
) -> CanvasAction {
    let mut action = CanvasAction::None;

    let (container_rect, response) =
        ui.allocate_exact_size(ui.available_size(), egui::Sense::click());
    let container = Container::new(
        container_rect.min.x as f64,
        container_rect.min.y as f64,
        container_rect.width() as f64,
        container_rect.height() as f64,
    );

    let painter = ui.painter_at(container_rect);
    painter.rect_filled(container_rect, 0.0, egui::Color32::from_gray(40));

    let Some(display) = geometry::display_rect(&container, map) else {
        return action;
    };
    let image_rect = egui::Rect::from_min_size(
        container_rect.min + egui::vec2(display.offset_x as f32, display.offset_y as f32),
        egui::vec2(display.width as f32, display.height as f32),
    );

    match map_texture {
        Some(texture) => {
            painter.image(
                texture.id(),
                image_rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }
        None => {
            // Image could not be decoded; keep the geometry usable
            painter.rect_filled(image_rect, 0.0, egui::Color32::from_gray(70));
            painter.text(
                image_rect.center(),
                egui::Align2::CENTER_CENTER,
                format!("{} ({}×{})", map.name, map.width, map.height),
                egui::FontId::proportional(16.0),
                egui::Color32::from_gray(180),
            );
        }
    }

    for coord in coordinates.iter().filter(|c| c.visible) {
        if let Some(position) = geometry::map_to_display(coord.point(), map, &container) {
            let center = container_rect.min
                + egui::vec2(
                    container_rect.width() * (position.left_percent / 100.0) as f32,
                    container_rect.height() * (position.top_percent / 100.0) as f32,
                );
            draw_marker(&painter, center, coord);
        }
    }

    if let Some(pos) = response.hover_pos() {
        if let Some(point) = geometry::display_to_map(pos.x as f64, pos.y as f64, &container, map) {
            painter.text(
                pos + egui::vec2(10.0, 10.0),
                egui::Align2::LEFT_TOP,
                format!("({}, {})", point.x, point.y),
                egui::FontId::monospace(13.0),
                egui::Color32::WHITE,
            );
        }
    }

    if response.clicked() {
        if let Some(pos) = response.interact_pointer_pos() {
            if let Some(point) =
                geometry::display_to_map(pos.x as f64, pos.y as f64, &container, map)
            {
                action = CanvasAction::AddPoint(point);
            }
        }
    }

    action
}

/// Draw a marker dot with its label above it.
fn draw_marker(painter: &egui::Painter, center: egui::Pos2, coord: &Coordinate) {
    painter.circle_filled(center, MARKER_RADIUS, egui::Color32::from_rgb(230, 60, 60));
    painter.circle_stroke(center, MARKER_RADIUS, egui::Stroke::new(1.5, egui::Color32::WHITE));
    painter.text(
        center - egui::vec2(0.0, MARKER_RADIUS + 2.0),
        egui::Align2::CENTER_BOTTOM,
        &coord.label,
        egui::FontId::proportional(12.0),
        egui::Color32::YELLOW,
    );
}
