// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Cloud OCR client.
//!
//! Screenshots are sent to Tencent Cloud's `GeneralAccurateOCR` API one at a
//! time. Only the recognized text matters to the rest of the application; it
//! is fed into the tagged coordinate extractor.

use super::media::ImagePayload;
use crate::config::OcrSettings;
use anyhow::{anyhow, bail, Context, Result};
use chrono::{TimeZone, Utc};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::time::Duration;

const API_VERSION: &str = "2018-11-19";
const SERVICE: &str = "ocr";
const ALGORITHM: &str = "TC3-HMAC-SHA256";
const CONTENT_TYPE: &str = "application/json; charset=utf-8";

pub const SECRET_ID_VAR: &str = "TENCENT_CLOUD_SECRET_ID";
pub const SECRET_KEY_VAR: &str = "TENCENT_CLOUD_SECRET_KEY";

/// Axis-aligned box around a detected text line, in screenshot pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Quad {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

/// One recognized line of text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextDetection {
    pub detected_text: String,
    pub bounding_quad: Option<Quad>,
    pub confidence: Option<f64>,
}

/// Anything that turns an image into text detections.
pub trait TextRecognizer {
    fn recognize(&self, image_base64: &str) -> Result<Vec<TextDetection>>;
}

/// Recognize each image in order, one request at a time.
///
/// The first failure aborts the batch; results gathered so far are dropped.
pub fn run_batch<R: TextRecognizer + ?Sized>(
    recognizer: &R,
    images: &[ImagePayload],
) -> Result<Vec<Vec<TextDetection>>> {
    let total = images.len();
    let mut results = Vec::with_capacity(total);

    for (index, image) in images.iter().enumerate() {
        log::debug!("OCR {} of {}: {}", index + 1, total, image.name);
        let detections = recognizer
            .recognize(image.base64())
            .with_context(|| {
                format!("OCR failed for image {} of {} ({})", index + 1, total, image.name)
            })?;
        results.push(detections);
    }

    Ok(results)
}

/// Concatenate all detected text, one detection per line.
pub fn joined_text(results: &[Vec<TextDetection>]) -> String {
    results
        .iter()
        .flatten()
        .map(|d| d.detected_text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// API key pair for Tencent Cloud.
#[derive(Clone)]
pub struct Credentials {
    pub secret_id: String,
    pub secret_key: String,
}

impl Credentials {
    /// Read credentials from the environment.
    pub fn from_env() -> Result<Self> {
        let read = |var: &str| {
            std::env::var(var)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| anyhow!("OCR credentials missing: set {}", var))
        };
        Ok(Self {
            secret_id: read(SECRET_ID_VAR)?,
            secret_key: read(SECRET_KEY_VAR)?,
        })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("secret_id", &self.secret_id)
            .field("secret_key", &"***")
            .finish()
    }
}

/// Blocking client for Tencent Cloud OCR.
pub struct TencentOcr {
    client: reqwest::blocking::Client,
    settings: OcrSettings,
    credentials: Credentials,
}

impl TencentOcr {
    pub fn new(settings: &OcrSettings, credentials: Credentials) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            settings: settings.clone(),
            credentials,
        })
    }
}

impl TextRecognizer for TencentOcr {
    fn recognize(&self, image_base64: &str) -> Result<Vec<TextDetection>> {
        let payload = serde_json::json!({ "ImageBase64": image_base64 }).to_string();
        let timestamp = Utc::now().timestamp();
        let authorization = authorization(&self.settings, &self.credentials, &payload, timestamp)?;

        let response = self
            .client
            .post(format!("https://{}/", self.settings.endpoint))
            .header("Authorization", authorization)
            .header("Content-Type", CONTENT_TYPE)
            .header("X-TC-Action", &self.settings.action)
            .header("X-TC-Version", API_VERSION)
            .header("X-TC-Region", &self.settings.region)
            .header("X-TC-Timestamp", timestamp.to_string())
            .body(payload)
            .send()
            .map_err(|e| anyhow!("OCR request to {} failed: {}", self.settings.endpoint, e))?;

        let status = response.status();
        let body = response.text().context("Failed to read OCR response")?;
        if !status.is_success() {
            bail!("OCR service returned {}: {}", status, body);
        }

        parse_response(&body)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ApiEnvelope {
    response: ApiResponse,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ApiResponse {
    #[serde(default)]
    text_detections: Vec<ApiTextDetection>,
    error: Option<ApiError>,
    request_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ApiTextDetection {
    #[serde(default)]
    detected_text: String,
    confidence: Option<f64>,
    item_polygon: Option<Quad>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ApiError {
    code: String,
    message: String,
}

fn parse_response(body: &str) -> Result<Vec<TextDetection>> {
    let envelope: ApiEnvelope =
        serde_json::from_str(body).context("Unexpected OCR response format")?;
    let response = envelope.response;

    if let Some(error) = response.error {
        bail!(
            "OCR error {}: {} (request {})",
            error.code,
            error.message,
            response.request_id.as_deref().unwrap_or("unknown")
        );
    }

    Ok(response
        .text_detections
        .into_iter()
        .map(|d| TextDetection {
            detected_text: d.detected_text,
            bounding_quad: d.item_polygon,
            confidence: d.confidence,
        })
        .collect())
}

fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    let mut mac = Hmac::<Sha256>::new_from_slice(key).map_err(|_| anyhow!("Invalid HMAC key"))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

fn canonical_request(settings: &OcrSettings, payload: &str) -> String {
    format!(
        "POST\n/\n\ncontent-type:{}\nhost:{}\nx-tc-action:{}\n\ncontent-type;host;x-tc-action\n{}",
        CONTENT_TYPE,
        settings.endpoint,
        settings.action.to_lowercase(),
        sha256_hex(payload.as_bytes())
    )
}

/// Build the TC3-HMAC-SHA256 `Authorization` header value.
fn authorization(
    settings: &OcrSettings,
    credentials: &Credentials,
    payload: &str,
    timestamp: i64,
) -> Result<String> {
    let date = Utc
        .timestamp_opt(timestamp, 0)
        .single()
        .ok_or_else(|| anyhow!("Invalid timestamp {}", timestamp))?
        .format("%Y-%m-%d")
        .to_string();
    let scope = format!("{}/{}/tc3_request", date, SERVICE);

    let string_to_sign = format!(
        "{}\n{}\n{}\n{}",
        ALGORITHM,
        timestamp,
        scope,
        sha256_hex(canonical_request(settings, payload).as_bytes())
    );

    let secret_key = format!("TC3{}", credentials.secret_key);
    let secret_date = hmac_sha256(secret_key.as_bytes(), date.as_bytes())?;
    let secret_service = hmac_sha256(&secret_date, SERVICE.as_bytes())?;
    let secret_signing = hmac_sha256(&secret_service, b"tc3_request")?;
    let signature = hex::encode(hmac_sha256(&secret_signing, string_to_sign.as_bytes())?);

    Ok(format!(
        "{} Credential={}/{}, SignedHeaders=content-type;host;x-tc-action, Signature={}",
        ALGORITHM, credentials.secret_id, scope, signature
    ))
}
