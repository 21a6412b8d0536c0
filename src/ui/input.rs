// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Text input panel.
//!
//! Hosts the manual coordinate box, the tagged text box used for OCR output,
//! and the screenshot queue for OCR.

/// Text typed by the user.
#[derive(Debug, Default)]
pub struct InputState {
    pub coordinates_text: String,
    pub tagged_text: String,
}

impl InputState {
    /// Append a line to the coordinate box.
    pub fn push_coordinate_line(&mut self, line: &str) {
        if !self.coordinates_text.is_empty() && !self.coordinates_text.ends_with('\n') {
            self.coordinates_text.push('\n');
        }
        self.coordinates_text.push_str(line);
    }
}

/// Result of input panel interaction.
pub enum InputAction {
    None,
    ApplyCoordinates,
    ClearCoordinates,
    ExtractTagged,
    AddImages,
    Recognize,
    ClearImages,
}

/// Display the input panel.
pub fn show(
    ui: &mut egui::Ui,
    state: &mut InputState,
    pending_images: &[String],
    ocr_busy: bool,
) -> InputAction {
    let mut action = InputAction::None;

    egui::ScrollArea::vertical().show(ui, |ui| {
        ui.heading("Coordinates");
        ui.label(
            egui::RichText::new("One per line: x,y or x,y,label or (x,y)")
                .weak()
                .small(),
        );
        ui.add(
            egui::TextEdit::multiline(&mut state.coordinates_text)
                .hint_text("100,200,资源点\n(30,40)\n50,60")
                .desired_rows(8)
                .desired_width(f32::INFINITY),
        );
        ui.horizontal(|ui| {
            if ui.button("Apply").clicked() {
                action = InputAction::ApplyCoordinates;
            }
            if ui.button("Clear all").clicked() {
                action = InputAction::ClearCoordinates;
            }
        });

        ui.separator();

        ui.heading("Tagged text");
        ui.label(
            egui::RichText::new("Extracts [坐标]label(x,y) entries")
                .weak()
                .small(),
        );
        ui.add(
            egui::TextEdit::multiline(&mut state.tagged_text)
                .hint_text("[坐标]普陀山(48,26)")
                .desired_rows(5)
                .desired_width(f32::INFINITY),
        );
        if ui.button("Extract").clicked() {
            action = InputAction::ExtractTagged;
        }

        ui.separator();

        ui.heading("Screenshots");
        if pending_images.is_empty() {
            ui.label(egui::RichText::new("Drop images here or add them below").weak());
        } else {
            for name in pending_images {
                ui.label(format!("• {}", name));
            }
        }
        ui.horizontal(|ui| {
            if ui.add_enabled(!ocr_busy, egui::Button::new("Add images...")).clicked() {
                action = InputAction::AddImages;
            }
            let can_run = !ocr_busy && !pending_images.is_empty();
            if ui.add_enabled(can_run, egui::Button::new("Recognize")).clicked() {
                action = InputAction::Recognize;
            }
            if ui
                .add_enabled(!ocr_busy && !pending_images.is_empty(), egui::Button::new("Clear"))
                .clicked()
            {
                action = InputAction::ClearImages;
            }
        });
        if ocr_busy {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Recognizing...");
            });
        }
    });

    action
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_coordinate_line() {
        let mut state = InputState::default();
        state.push_coordinate_line("1,2,1-1");
        state.push_coordinate_line("3,4,1-2");
        assert_eq!(state.coordinates_text, "1,2,1-1\n3,4,1-2");

        state.coordinates_text = "5,6\n".to_string();
        state.push_coordinate_line("7,8,x");
        assert_eq!(state.coordinates_text, "5,6\n7,8,x");
    }
}
