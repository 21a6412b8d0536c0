// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application configuration.
//!
//! Configuration is read from YAML or JSON (chosen by file extension). The
//! file is looked up in `$MAPMARK_CONFIG`, then `mapmark.yaml` in the working
//! directory; without either, built-in defaults are used.

use crate::models::map::{MapCatalog, MapDefinition};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "MAPMARK_CONFIG";
/// Config file picked up from the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "mapmark.yaml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory that map image references are resolved against.
    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,
    #[serde(default = "MapCatalog::builtin")]
    pub maps: Vec<MapDefinition>,
    /// Extra font with CJK coverage, appended to egui's font families.
    #[serde(default)]
    pub font_path: Option<PathBuf>,
    #[serde(default)]
    pub ocr: OcrSettings,
}

/// Tencent Cloud OCR endpoint settings. Credentials come from the environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrSettings {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default = "default_action")]
    pub action: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_assets_dir() -> PathBuf {
    PathBuf::from("assets")
}

fn default_endpoint() -> String {
    "ocr.tencentcloudapi.com".to_string()
}

fn default_region() -> String {
    "ap-beijing".to_string()
}

fn default_action() -> String {
    "GeneralAccurateOCR".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            region: default_region(),
            action: default_action(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            assets_dir: default_assets_dir(),
            maps: MapCatalog::builtin(),
            font_path: None,
            ocr: OcrSettings::default(),
        }
    }
}

impl AppConfig {
    /// Build the map catalog described by this configuration.
    pub fn catalog(&self) -> Result<MapCatalog> {
        MapCatalog::new(self.maps.clone()).context("Invalid map configuration")
    }

    /// Absolute-or-relative path of a map image.
    pub fn image_path(&self, map: &MapDefinition) -> PathBuf {
        self.assets_dir.join(&map.image_ref)
    }
}

/// Import configuration from YAML format.
pub fn import_yaml(path: &Path) -> Result<AppConfig> {
    let yaml = std::fs::read_to_string(path)?;
    let config = serde_yaml::from_str(&yaml)?;
    Ok(config)
}

/// Import configuration from JSON format.
pub fn import_json(path: &Path) -> Result<AppConfig> {
    let json = std::fs::read_to_string(path)?;
    let config = serde_json::from_str(&json)?;
    Ok(config)
}

/// Load configuration from a file, dispatching on its extension.
pub fn load_file(path: &Path) -> Result<AppConfig> {
    let extension = path.extension().and_then(|s| s.to_str());
    let result = match extension {
        Some("yaml") | Some("yml") => import_yaml(path),
        Some("json") => import_json(path),
        _ => bail!("Unsupported config file extension: {:?}", extension),
    };
    result.with_context(|| format!("Failed to load config from {}", path.display()))
}

/// Locate and load the configuration.
pub fn load() -> Result<AppConfig> {
    if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
        let path = PathBuf::from(path);
        log::info!("Loading config from {} (via {})", path.display(), CONFIG_ENV_VAR);
        return load_file(&path);
    }

    let local = Path::new(DEFAULT_CONFIG_FILE);
    if local.exists() {
        log::info!("Loading config from {}", local.display());
        return load_file(local);
    }

    log::info!("No config file found, using built-in defaults");
    Ok(AppConfig::default())
}
