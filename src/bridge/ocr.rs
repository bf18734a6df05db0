//! OCR bridge: send an image to an HTTP OCR service
//!
//! The service takes a `multipart/form-data` POST with the image in a field
//! named `file` and answers with JSON carrying the recognized text.

use std::fs;
use std::path::Path;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use super::image::mime_type_for;
use crate::error::{EditorError, Result};
use crate::util::file_validation::filename_for_display;

/// Recognized text and how long the service took
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OcrResult {
    pub full_text: String,
    pub elapsed_ms: u64,
}

#[derive(Debug, Deserialize)]
struct OcrResponse {
    #[serde(default, alias = "fullText", alias = "text")]
    full_text: Option<String>,
    #[serde(default, alias = "elapsedMs")]
    elapsed_ms: Option<f64>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OcrClient {
    endpoint: String,
    agent: ureq::Agent,
}

impl OcrClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.into(),
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Upload `path` and return the recognized text. Any non-2xx status is an
    /// error; there is no retry.
    pub fn perform_ocr(&self, path: &Path) -> Result<OcrResult> {
        let bytes = fs::read(path).map_err(|e| EditorError::io(path, e))?;
        let file_name = filename_for_display(path);
        let content_type = mime_type_for(path).unwrap_or("application/octet-stream");

        let boundary = multipart_boundary();
        let body = multipart_body(&boundary, "file", &file_name, content_type, &bytes);

        tracing::info!(endpoint = %self.endpoint, file = %file_name, bytes = bytes.len(), "sending OCR request");
        let started = Instant::now();
        let response = self
            .agent
            .post(&self.endpoint)
            .set("Content-Type", &format!("multipart/form-data; boundary={}", boundary))
            .send_bytes(&body)
            .map_err(|e| match e {
                ureq::Error::Status(code, _) => EditorError::Ocr(format!("service returned HTTP {}", code)),
                ureq::Error::Transport(t) => EditorError::Ocr(t.to_string()),
            })?;

        let text = response
            .into_string()
            .map_err(|e| EditorError::Ocr(format!("could not read response: {}", e)))?;
        let measured = started.elapsed().as_millis() as u64;

        let result = parse_response(&text, measured)?;
        tracing::debug!(chars = result.full_text.chars().count(), elapsed_ms = result.elapsed_ms, "OCR finished");
        Ok(result)
    }
}

fn parse_response(body: &str, measured_ms: u64) -> Result<OcrResult> {
    let parsed: OcrResponse =
        serde_json::from_str(body).map_err(|e| EditorError::Ocr(format!("invalid response: {}", e)))?;

    match (parsed.full_text, parsed.error) {
        (Some(full_text), _) => Ok(OcrResult {
            full_text,
            elapsed_ms: parsed.elapsed_ms.map(|ms| ms.round() as u64).unwrap_or(measured_ms),
        }),
        (None, Some(error)) => Err(EditorError::Ocr(error)),
        (None, None) => Err(EditorError::Ocr("response contained no text".to_string())),
    }
}

fn multipart_boundary() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("----marknote{:x}", nanos)
}

fn multipart_body(boundary: &str, field: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(bytes.len() + 256);
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field,
            file_name.replace('"', "")
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());
    body
}
