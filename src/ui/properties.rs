// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Coordinate list panel.
//!
//! Lists the session's coordinates with a visibility toggle for each.

use crate::models::coordinate::Coordinate;

/// Result of properties panel interaction.
pub enum PropertiesAction {
    None,
    ToggleVisibility(usize),
}

/// Display the coordinate list.
pub fn show(ui: &mut egui::Ui, coordinates: &[Coordinate]) -> PropertiesAction {
    let mut action = PropertiesAction::None;

    ui.heading("Locations");
    ui.separator();

    if coordinates.is_empty() {
        ui.label(egui::RichText::new("No locations yet").weak());
        return action;
    }

    egui::ScrollArea::vertical().show(ui, |ui| {
        for (idx, coord) in coordinates.iter().enumerate() {
            ui.horizontal(|ui| {
                let mut visible = coord.visible;
                if ui.checkbox(&mut visible, "").changed() {
                    action = PropertiesAction::ToggleVisibility(idx);
                }
                let text = egui::RichText::new(&coord.label).strong();
                ui.label(if coord.visible { text } else { text.weak() });
                ui.label(
                    egui::RichText::new(format!("({}, {})", coord.x, coord.y)).monospace(),
                );
            });
        }
    });

    action
}
