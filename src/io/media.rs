// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Media file loading.
//!
//! This module decodes map images into RGBA pixels for display in egui and
//! turns screenshot files into data-URL payloads for the OCR service.

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use std::path::Path;

/// Decoded RGBA image ready for upload as a texture.
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Load an image file and convert it to RGBA8.
pub fn load_image(path: &Path) -> Result<LoadedImage> {
    let img = image::open(path)
        .with_context(|| format!("Failed to decode {}", path.display()))?
        .to_rgba8();

    Ok(LoadedImage {
        width: img.width(),
        height: img.height(),
        pixels: img.into_raw(),
    })
}

/// A screenshot waiting to be sent to OCR, carried as a data URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub name: String,
    pub data_url: String,
}

impl ImagePayload {
    /// Wrap raw image bytes, guessing the MIME type from the file name.
    pub fn from_bytes(name: &str, bytes: &[u8]) -> Self {
        Self {
            name: name.to_string(),
            data_url: format!("data:{};base64,{}", mime_for(name), STANDARD.encode(bytes)),
        }
    }

    /// Read an image file from disk.
    pub fn from_file(path: &Path) -> Result<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::from_bytes(&name, &bytes))
    }

    /// Base64 body of the payload, without the data URL header.
    pub fn base64(&self) -> &str {
        strip_data_url(&self.data_url)
    }
}

/// Strip a `data:image/<type>;base64,` header. Other input is returned as is.
pub fn strip_data_url(data_url: &str) -> &str {
    data_url
        .strip_prefix("data:image/")
        .and_then(|rest| {
            let (mime, body) = rest.split_once(";base64,")?;
            (!mime.is_empty() && !mime.contains(';')).then_some(body)
        })
        .unwrap_or(data_url)
}

fn mime_for(name: &str) -> &'static str {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("bmp") => "image/bmp",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "image/png",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_data_url() {
        assert_eq!(strip_data_url("data:image/png;base64,iVBORw0"), "iVBORw0");
        assert_eq!(strip_data_url("data:image/jpeg;base64,/9j/4AA"), "/9j/4AA");
        assert_eq!(strip_data_url("iVBORw0"), "iVBORw0");
        assert_eq!(strip_data_url("data:text/plain;base64,aGk="), "data:text/plain;base64,aGk=");
    }

    #[test]
    fn test_payload_from_bytes() {
        let payload = ImagePayload::from_bytes("shot.JPG", b"hi");
        assert_eq!(payload.data_url, "data:image/jpeg;base64,aGk=");
        assert_eq!(payload.base64(), "aGk=");

        let payload = ImagePayload::from_bytes("clipboard", b"hi");
        assert!(payload.data_url.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_payload_from_missing_file() {
        let err = ImagePayload::from_file(Path::new("/nonexistent/shot.png")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/shot.png"));
    }

    #[test]
    fn test_load_image_roundtrip_through_png() {
        let path = std::env::temp_dir().join(format!("mapmark_media_{}.png", std::process::id()));
        image::RgbaImage::from_pixel(3, 2, image::Rgba([1, 2, 3, 255]))
            .save(&path)
            .unwrap();

        let loaded = load_image(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!((loaded.width, loaded.height), (3, 2));
        assert_eq!(loaded.pixels.len(), 3 * 2 * 4);
        assert_eq!(&loaded.pixels[..4], &[1, 2, 3, 255]);
    }
}
