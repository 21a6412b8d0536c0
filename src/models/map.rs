// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Map definitions and the map catalog.
//!
//! The catalog is built once at startup and handed to whoever needs map
//! lookups. Map image file names may carry their own dimensions in the form
//! `name_WIDTH_HEIGHT.ext`, which take precedence over the declared size.

use super::coordinate::Bounds;
use anyhow::{bail, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;

/// A selectable game map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapDefinition {
    pub id: String,
    pub name: String,
    /// Image path relative to the configured assets directory.
    pub image_ref: String,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub description: String,
}

impl MapDefinition {
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.width, self.height)
    }

    /// Aspect ratio (width / height) of the map image.
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

fn dimension_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^(.+)_(\d+)_(\d+)\.(png|jpg|jpeg|svg)$").expect("valid dimension pattern")
    })
}

/// Decode `name_WIDTH_HEIGHT.ext` from the file name of an image reference.
///
/// Returns `None` if the name has a different shape or either dimension is zero.
pub fn resolve_dimensions_from_ref(image_ref: &str) -> Option<Bounds> {
    let file_name = image_ref.rsplit(['/', '\\']).next()?;
    let caps = dimension_pattern().captures(file_name)?;
    let width: u32 = caps[2].parse().ok()?;
    let height: u32 = caps[3].parse().ok()?;
    if width == 0 || height == 0 {
        return None;
    }
    Some(Bounds::new(width, height))
}

/// Immutable registry of the maps available in this session.
#[derive(Debug, Clone)]
pub struct MapCatalog {
    maps: Vec<MapDefinition>,
}

impl MapCatalog {
    /// Build a catalog, rejecting empty lists, duplicate ids and zero dimensions.
    pub fn new(maps: Vec<MapDefinition>) -> Result<Self> {
        if maps.is_empty() {
            bail!("Map catalog is empty");
        }

        let mut seen = HashSet::new();
        for map in &maps {
            if !seen.insert(map.id.as_str()) {
                bail!("Duplicate map id: {}", map.id);
            }
            if map.width == 0 || map.height == 0 {
                bail!(
                    "Map {} has invalid dimensions {}×{}",
                    map.id,
                    map.width,
                    map.height
                );
            }
        }

        Ok(Self { maps })
    }

    /// The built-in catalog.
    pub fn builtin() -> Vec<MapDefinition> {
        vec![
            MapDefinition {
                id: "jian_ye_cheng".to_string(),
                name: "建业城".to_string(),
                image_ref: "maps/jian_ye_cheng_287_143.png".to_string(),
                width: 287,
                height: 143,
                description: "茂密的森林区域，包含多个资源点和隐藏路径".to_string(),
            },
            MapDefinition {
                id: "zhu_zi_guo".to_string(),
                name: "朱紫国".to_string(),
                image_ref: "maps/zhu_zi_guo_191_119.png".to_string(),
                width: 191,
                height: 119,
                description: "广阔的沙漠地带，视野开阔但资源稀少".to_string(),
            },
            MapDefinition {
                id: "map3".to_string(),
                name: "城市地图".to_string(),
                image_ref: "maps/city-map.jpg.svg".to_string(),
                width: 1200,
                height: 900,
                description: "现代化城市区域，建筑密集，适合巷战".to_string(),
            },
            MapDefinition {
                id: "map4".to_string(),
                name: "雪山地图".to_string(),
                image_ref: "maps/snow-mountain-map.jpg.svg".to_string(),
                width: 960,
                height: 720,
                description: "冰雪覆盖的山脉，地形复杂，视野受限".to_string(),
            },
        ]
    }

    /// All maps in declaration order.
    pub fn list_maps(&self) -> &[MapDefinition] {
        &self.maps
    }

    pub fn first(&self) -> &MapDefinition {
        // Non-empty by construction.
        &self.maps[0]
    }

    pub fn get(&self, id: &str) -> Option<&MapDefinition> {
        self.maps.iter().find(|m| m.id == id)
    }

    /// Resolve a map for use, applying file-name encoded dimensions if present.
    pub fn select(&self, id: &str) -> Option<MapDefinition> {
        let mut map = self.get(id)?.clone();
        if let Some(bounds) = resolve_dimensions_from_ref(&map.image_ref) {
            if bounds != map.bounds() {
                log::info!(
                    "Map {} dimensions overridden by file name: {}×{} -> {}×{}",
                    map.id,
                    map.width,
                    map.height,
                    bounds.width,
                    bounds.height
                );
            }
            map.width = bounds.width;
            map.height = bounds.height;
        }
        Some(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(id: &str, image_ref: &str, width: u32, height: u32) -> MapDefinition {
        MapDefinition {
            id: id.to_string(),
            name: id.to_string(),
            image_ref: image_ref.to_string(),
            width,
            height,
            description: String::new(),
        }
    }

    #[test]
    fn test_resolve_dimensions_from_file_name() {
        assert_eq!(
            resolve_dimensions_from_ref("jian_ye_cheng_287_143.png"),
            Some(Bounds::new(287, 143))
        );
        assert_eq!(
            resolve_dimensions_from_ref("maps/zhu_zi_guo_191_119.PNG"),
            Some(Bounds::new(191, 119))
        );
        assert_eq!(
            resolve_dimensions_from_ref("maps\\desert_640_480.jpeg"),
            Some(Bounds::new(640, 480))
        );
    }

    #[test]
    fn test_resolve_dimensions_rejects_bad_names() {
        assert_eq!(resolve_dimensions_from_ref("badname.png"), None);
        assert_eq!(resolve_dimensions_from_ref("x_0_5.png"), None);
        assert_eq!(resolve_dimensions_from_ref("x_5_0.png"), None);
        assert_eq!(resolve_dimensions_from_ref("map_100_200.gif"), None);
        assert_eq!(resolve_dimensions_from_ref("city-map.jpg.svg"), None);
        assert_eq!(resolve_dimensions_from_ref("_100_200.png"), None);
        assert_eq!(resolve_dimensions_from_ref("big_99999999999_2.png"), None);
    }

    #[test]
    fn test_catalog_validation() {
        assert!(MapCatalog::new(Vec::new()).is_err());
        assert!(MapCatalog::new(vec![map("a", "a.png", 0, 10)]).is_err());
        let duplicate = vec![map("a", "a.png", 10, 10), map("a", "b.png", 10, 10)];
        assert!(MapCatalog::new(duplicate).is_err());
        assert!(MapCatalog::new(MapCatalog::builtin()).is_ok());
    }

    #[test]
    fn test_select_applies_file_name_dimensions() {
        let catalog = MapCatalog::new(vec![
            map("forest", "maps/forest_300_150.png", 100, 100),
            map("plain", "maps/plain.png", 640, 480),
        ])
        .unwrap();

        let forest = catalog.select("forest").unwrap();
        assert_eq!((forest.width, forest.height), (300, 150));
        // Registry entry is untouched
        assert_eq!(catalog.get("forest").unwrap().width, 100);

        let plain = catalog.select("plain").unwrap();
        assert_eq!((plain.width, plain.height), (640, 480));

        assert!(catalog.select("missing").is_none());
    }

    #[test]
    fn test_list_maps_keeps_order() {
        let catalog = MapCatalog::new(MapCatalog::builtin()).unwrap();
        let ids: Vec<&str> = catalog.list_maps().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["jian_ye_cheng", "zhu_zi_guo", "map3", "map4"]);
        assert_eq!(catalog.first().id, "jian_ye_cheng");
    }
}
