// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar with map selection.

use crate::models::{
    map::{MapCatalog, MapDefinition},
    session::AnnotationSession,
};

/// Result of toolbar interaction.
pub enum ToolbarAction {
    None,
    SelectMap(String),
}

/// Display the map selector and session summary.
pub fn show(
    ui: &mut egui::Ui,
    catalog: &MapCatalog,
    current: &MapDefinition,
    session: &AnnotationSession,
) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        ui.label("Map:");

        let mut chosen = current.id.clone();
        egui::ComboBox::from_id_source("map_selector")
            .selected_text(format!("{} - {}×{}", current.name, current.width, current.height))
            .width(220.0)
            .show_ui(ui, |ui| {
                for map in catalog.list_maps() {
                    ui.selectable_value(
                        &mut chosen,
                        map.id.clone(),
                        format!("{} - {}×{}", map.name, map.width, map.height),
                    );
                }
            });
        if chosen != current.id {
            action = ToolbarAction::SelectMap(chosen);
        }

        ui.separator();

        ui.label(format!("Points: {}/{}", session.len(), session.capacity()));

        if !current.description.is_empty() {
            ui.separator();
            ui.label(egui::RichText::new(&current.description).italics().weak());
        }
    });

    action
}
