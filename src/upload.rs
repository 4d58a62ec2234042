//! Upload boundary for trimmed clips.
//!
//! This module does not talk to the network. It validates what the user is
//! about to submit, builds the multipart field list the backend expects
//! (including the trim window as stringified seconds), guards against double
//! submission, and interprets the backend's response envelope.
//!
//! `ztrim trim` stops after [`UploadRequest::to_json`]. A host that performs
//! the actual request wraps it in a [`SubmitGuard`] and feeds the reply body to
//! [`UploadResponse::parse`], showing failures via [`ClipError::is_transient`].

use crate::error::{ClipError, Result};
use crate::trim::TrimmedClip;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// What the backend accepts
#[derive(Debug, Clone)]
pub struct UploadLimits {
    pub allowed_extensions: Vec<String>,
    pub max_bytes: u64,
}

pub fn validate_upload(
    file: &Path,
    size_bytes: u64,
    title: &str,
    artist: &str,
    limits: &UploadLimits,
) -> Result<()> {
    let ext = file
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();
    if !limits
        .allowed_extensions
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(&ext))
    {
        return Err(ClipError::validation(format!(
            "Unsupported file type: .{ext} (allowed: {})",
            limits.allowed_extensions.join(", ")
        )));
    }

    if size_bytes > limits.max_bytes {
        return Err(ClipError::validation(format!(
            "File is too large: {:.1} MB (limit {:.1} MB)",
            size_bytes as f64 / 1_048_576.0,
            limits.max_bytes as f64 / 1_048_576.0
        )));
    }

    if title.trim().is_empty() {
        return Err(ClipError::validation("Title is required"));
    }
    if artist.trim().is_empty() {
        return Err(ClipError::validation("Artist is required"));
    }

    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    File(PathBuf),
    Text(String),
}

/// A confirmed trim plus the metadata that travels with it
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub file: PathBuf,
    pub title: String,
    pub artist: String,
    pub entity_account_id: Option<String>,
    pub author_entity_id: Option<String>,
    pub author_entity_type: Option<String>,
    pub clip: TrimmedClip,
}

impl UploadRequest {
    /// Multipart fields in submission order. Missing passthrough ids are omitted.
    pub fn form_fields(&self) -> Vec<(&'static str, FieldValue)> {
        let mut fields = vec![
            ("file", FieldValue::File(self.file.clone())),
            ("title", FieldValue::Text(self.title.trim().to_string())),
            ("artist", FieldValue::Text(self.artist.trim().to_string())),
        ];

        let passthrough = [
            ("entityAccountId", &self.entity_account_id),
            ("authorEntityId", &self.author_entity_id),
            ("authorEntityType", &self.author_entity_type),
        ];
        for (name, value) in passthrough {
            if let Some(value) = value {
                fields.push((name, FieldValue::Text(value.clone())));
            }
        }

        fields.push((
            "audioStartOffset",
            FieldValue::Text(self.clip.start_offset.to_string()),
        ));
        fields.push((
            "audioDuration",
            FieldValue::Text(self.clip.duration.to_string()),
        ));
        fields
    }

    /// Fields as a JSON object, with the file field rendered as its path
    pub fn to_json(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .form_fields()
            .into_iter()
            .map(|(name, value)| {
                let value = match value {
                    FieldValue::File(path) => path.display().to_string(),
                    FieldValue::Text(text) => text,
                };
                (name.to_string(), serde_json::Value::String(value))
            })
            .collect();
        serde_json::Value::Object(map)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Success,
    Error,
}

/// Response envelope: `{ status, data?, message?, error? }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub status: UploadStatus,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl UploadResponse {
    pub fn parse(body: &str) -> Result<Self> {
        serde_json::from_str(body)
            .map_err(|e| ClipError::Network(format!("unreadable response: {e}")))
    }

    pub fn into_result(self) -> Result<Option<serde_json::Value>> {
        match self.status {
            UploadStatus::Success => Ok(self.data),
            UploadStatus::Error => Err(ClipError::Network(
                self.error
                    .or(self.message)
                    .unwrap_or_else(|| "unknown error".to_string()),
            )),
        }
    }
}

/// Drops duplicate submissions while one is in flight
#[derive(Debug, Default)]
pub struct SubmitGuard {
    in_flight: bool,
}

impl SubmitGuard {
    /// Returns `false` (and does nothing) if a submission is already running
    pub fn try_begin(&mut self) -> bool {
        if self.in_flight {
            return false;
        }
        self.in_flight = true;
        true
    }

    pub fn finish(&mut self) {
        self.in_flight = false;
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }
}
