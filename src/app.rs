// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module owns the annotation session and the selected map, and wires
//! the UI panels to the parser, the tagged text extractor and the OCR client.
//! Map images and OCR batches run on background threads; their results are
//! polled from channels every frame.

use crate::config::AppConfig;
use crate::io::{
    media::{self, ImagePayload, LoadedImage},
    ocr::{self, Credentials, TencentOcr},
};
use crate::models::{
    coordinate::{grid_label, Bounds, Coordinate, MapPoint},
    map::{MapCatalog, MapDefinition},
    session::{AnnotationSession, AppendOutcome},
};
use crate::parse::{format, tagged::{self, TaggedCoordinate}};
use crate::ui::{canvas, input, properties, toolbar};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};

const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "bmp", "gif", "webp"];

/// Message shown in the status bar.
enum Status {
    Info(String),
    Error(String),
}

/// A running OCR batch over the first `image_count` queued screenshots.
struct OcrJob {
    receiver: Receiver<Result<String, String>>,
    image_count: usize,
}

/// Main application state.
pub struct MapMarkApp {
    config: AppConfig,

    catalog: MapCatalog,

    /// Selected map with file-name dimensions applied
    selected_map: MapDefinition,

    session: AnnotationSession,

    input: input::InputState,

    status: Option<Status>,

    map_texture: Option<egui::TextureHandle>,

    /// Receiver for background map image loading
    image_loader: Option<Receiver<Result<LoadedImage, String>>>,

    /// Screenshots queued for OCR
    pending_images: Vec<ImagePayload>,

    /// Running OCR batch, if any
    ocr_job: Option<OcrJob>,
}

impl MapMarkApp {
    /// Create the application with the first catalog map selected.
    pub fn new(config: AppConfig, catalog: MapCatalog) -> Self {
        let first = catalog.first().id.clone();
        let selected_map = catalog
            .select(&first)
            .unwrap_or_else(|| catalog.first().clone());

        let mut app = Self {
            config,
            catalog,
            selected_map,
            session: AnnotationSession::new(),
            input: input::InputState::default(),
            status: None,
            map_texture: None,
            image_loader: None,
            pending_images: Vec::new(),
            ocr_job: None,
        };
        app.load_map_image();
        app
    }

    fn info(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::info!("{}", message);
        self.status = Some(Status::Info(message));
    }

    fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::error!("{}", message);
        self.status = Some(Status::Error(message));
    }

    /// Switch maps. The session is cleared since its points belong to the old map.
    fn select_map(&mut self, id: &str) {
        let Some(map) = self.catalog.select(id) else {
            self.error(format!("Unknown map: {}", id));
            return;
        };

        log::info!("Selected map {} ({}×{})", map.id, map.width, map.height);
        self.selected_map = map;
        self.session.clear();
        self.status = None;
        self.load_map_image();
    }

    /// Load the selected map's image on a background thread.
    fn load_map_image(&mut self) {
        let (sender, receiver) = channel();
        self.image_loader = Some(receiver);
        self.map_texture = None;

        let path = self.config.image_path(&self.selected_map);
        std::thread::spawn(move || {
            let result = media::load_image(&path).map_err(|e| format!("{:#}", e));
            let _ = sender.send(result);
        });
    }

    fn apply_coordinates(&mut self) {
        if self.input.coordinates_text.trim().is_empty() {
            self.error("Enter coordinates first");
            return;
        }

        match format::parse(&self.input.coordinates_text, self.selected_map.bounds()) {
            Ok(parsed) => {
                let outcome = self.session.apply_parsed_coordinates(parsed);
                if outcome.is_truncated() {
                    self.input.coordinates_text = self.session.to_input_text();
                }
                self.info(describe_outcome("Applied", outcome, 0));
            }
            Err(e) => self.error(e.to_string()),
        }
    }

    fn clear_coordinates(&mut self) {
        if !self.session.is_empty() {
            log::info!("Cleared {} location(s)", self.session.len());
        }
        self.session.clear();
        self.input.coordinates_text.clear();
        self.status = None;
    }

    fn add_point(&mut self, point: MapPoint) {
        let line = match self.session.add_point(point) {
            Some(coord) => coord.to_input_line(),
            None => {
                self.error(format!(
                    "At most {} locations can be marked",
                    self.session.capacity()
                ));
                return;
            }
        };
        log::info!("Added point {}", line);
        self.input.push_coordinate_line(&line);
    }

    /// Extract tagged coordinates from the tagged text box into the session.
    ///
    /// Points outside the current map are skipped, the rest are appended.
    fn extract_tagged(&mut self) {
        let extracted = tagged::extract(&self.input.tagged_text);
        if extracted.is_empty() {
            self.info("No [坐标] entries found");
            return;
        }

        let (accepted, skipped) =
            merge_extracted(extracted, self.selected_map.bounds(), self.session.len());
        let added: Vec<String> = accepted.iter().map(Coordinate::to_input_line).collect();
        let outcome = self.session.append(accepted);
        for line in added.iter().take(outcome.added) {
            self.input.push_coordinate_line(line);
        }

        self.info(describe_outcome("Extracted", outcome, skipped));
    }

    fn add_images(&mut self) {
        let Some(paths) = rfd::FileDialog::new()
            .add_filter("Images", &IMAGE_EXTENSIONS)
            .pick_files()
        else {
            return;
        };
        self.queue_image_files(paths);
    }

    fn queue_image_files(&mut self, paths: Vec<PathBuf>) {
        for path in paths {
            match ImagePayload::from_file(&path) {
                Ok(payload) => {
                    log::info!("Queued {} for OCR", payload.name);
                    self.pending_images.push(payload);
                }
                Err(e) => self.error(format!("{:#}", e)),
            }
        }
    }

    /// Queue images dropped onto the window.
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        for file in dropped {
            if let Some(path) = file.path {
                self.queue_image_files(vec![path]);
            } else if let Some(bytes) = file.bytes {
                let name = if file.name.is_empty() {
                    "dropped image".to_string()
                } else {
                    file.name
                };
                self.pending_images.push(ImagePayload::from_bytes(&name, &bytes));
            }
        }
    }

    /// Send all queued screenshots to OCR on a background thread.
    ///
    /// Images queued while the batch runs stay in the queue for the next one.
    fn start_recognition(&mut self) {
        if self.ocr_job.is_some() || self.pending_images.is_empty() {
            return;
        }

        let credentials = match Credentials::from_env() {
            Ok(credentials) => credentials,
            Err(e) => {
                self.error(e.to_string());
                return;
            }
        };

        let settings = self.config.ocr.clone();
        let images = self.pending_images.clone();
        log::info!("Starting OCR for {} image(s)", images.len());

        let (sender, receiver) = channel();
        self.ocr_job = Some(OcrJob {
            receiver,
            image_count: images.len(),
        });
        self.status = None;

        std::thread::spawn(move || {
            let result = (|| -> anyhow::Result<String> {
                let client = TencentOcr::new(&settings, credentials)?;
                let results = ocr::run_batch(&client, &images)?;
                Ok(ocr::joined_text(&results))
            })();

            let _ = sender.send(result.map_err(|e| format!("{:#}", e)));
        });
    }

    fn poll_background(&mut self, ctx: &egui::Context) {
        if let Some(ref receiver) = self.image_loader {
            if let Ok(result) = receiver.try_recv() {
                self.image_loader = None;
                match result {
                    Ok(loaded) => {
                        let size = [loaded.width as usize, loaded.height as usize];
                        let color_image =
                            egui::ColorImage::from_rgba_unmultiplied(size, &loaded.pixels);
                        self.map_texture = Some(ctx.load_texture(
                            "map_image",
                            color_image,
                            egui::TextureOptions::LINEAR,
                        ));
                        log::info!("Map image loaded ({}x{})", loaded.width, loaded.height);
                    }
                    Err(e) => {
                        log::warn!("Map image unavailable, drawing placeholder: {}", e);
                    }
                }
            }
        }

        if let Some(ref job) = self.ocr_job {
            if let Ok(result) = job.receiver.try_recv() {
                let sent = job.image_count.min(self.pending_images.len());
                self.ocr_job = None;
                match result {
                    Ok(text) => {
                        log::info!("OCR finished for {} image(s)", sent);
                        self.pending_images.drain(..sent);
                        self.input.tagged_text = text;
                        self.extract_tagged();
                    }
                    Err(e) => self.error(e),
                }
            }
        }

        if self.image_loader.is_some() || self.ocr_job.is_some() {
            ctx.request_repaint();
        }
    }
}

/// Convert an extracted entry into a session coordinate.
///
/// Labels must survive a round trip through the coordinate text box, so
/// commas are replaced and empty labels fall back to the grid label.
fn tagged_coordinate(entry: TaggedCoordinate, index: usize) -> Coordinate {
    let label = entry.location.replace(',', " ");
    let label = label.trim();
    let label = if label.is_empty() { grid_label(index) } else { label.to_string() };
    Coordinate::new(entry.x, entry.y, label)
}

/// Keep the extracted entries that fall inside `bounds`.
///
/// Accepted entries are labelled as if appended after `start` existing
/// points. Returns them with the number of entries skipped.
fn merge_extracted(
    entries: Vec<TaggedCoordinate>,
    bounds: Bounds,
    start: usize,
) -> (Vec<Coordinate>, usize) {
    let mut accepted = Vec::new();
    let mut skipped = 0;

    for (idx, entry) in entries.into_iter().enumerate() {
        match format::check_bounds(idx + 1, u64::from(entry.x), u64::from(entry.y), bounds) {
            Ok(()) => {
                let label_index = start + accepted.len();
                accepted.push(tagged_coordinate(entry, label_index));
            }
            Err(e) => {
                log::warn!("Skipping extracted point: {}", e);
                skipped += 1;
            }
        }
    }

    (accepted, skipped)
}

fn describe_outcome(verb: &str, outcome: AppendOutcome, skipped: usize) -> String {
    let mut message = format!("{} {} location(s)", verb, outcome.added);
    if outcome.dropped > 0 {
        message.push_str(&format!(", {} dropped (limit reached)", outcome.dropped));
    }
    if skipped > 0 {
        message.push_str(&format!(", {} skipped (outside map)", skipped));
    }
    message
}

impl eframe::App for MapMarkApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_background(ctx);
        self.handle_dropped_files(ctx);

        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| {
                toolbar::show(ui, &self.catalog, &self.selected_map, &self.session)
            })
            .inner;
        if let toolbar::ToolbarAction::SelectMap(id) = toolbar_action {
            self.select_map(&id);
        }

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| match &self.status {
                Some(Status::Info(message)) => {
                    ui.label(message);
                }
                Some(Status::Error(message)) => {
                    let color = egui::Color32::from_rgb(230, 80, 80);
                    ui.label(egui::RichText::new(message).color(color));
                }
                None => {
                    ui.label(egui::RichText::new("Left click on the map to add a point").weak());
                }
            });
        });

        let pending_names: Vec<String> =
            self.pending_images.iter().map(|p| p.name.clone()).collect();
        let input_action = egui::SidePanel::left("input")
            .default_width(280.0)
            .show(ctx, |ui| {
                input::show(ui, &mut self.input, &pending_names, self.ocr_job.is_some())
            })
            .inner;
        match input_action {
            input::InputAction::ApplyCoordinates => self.apply_coordinates(),
            input::InputAction::ClearCoordinates => self.clear_coordinates(),
            input::InputAction::ExtractTagged => self.extract_tagged(),
            input::InputAction::AddImages => self.add_images(),
            input::InputAction::Recognize => self.start_recognition(),
            input::InputAction::ClearImages => self.pending_images.clear(),
            input::InputAction::None => {}
        }

        let properties_action = egui::SidePanel::right("properties")
            .default_width(220.0)
            .show(ctx, |ui| properties::show(ui, self.session.coordinates()))
            .inner;
        if let properties::PropertiesAction::ToggleVisibility(idx) = properties_action {
            if let Some(visible) = self.session.toggle_visibility(idx) {
                log::info!("Location {} visible: {}", idx + 1, visible);
            }
        }

        let canvas_action = egui::CentralPanel::default()
            .show(ctx, |ui| {
                canvas::show(
                    ui,
                    &self.selected_map,
                    &self.map_texture,
                    self.session.coordinates(),
                )
            })
            .inner;
        if let canvas::CanvasAction::AddPoint(point) = canvas_action {
            self.add_point(point);
        }
    }
}
