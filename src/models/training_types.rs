use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named container on the service holding tags, images and iterations.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
}

/// A label attached to images, one per classification class.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: String,
    pub name: String,
}

/// One training run. The service owns this record; `status` is refreshed
/// on every poll.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Iteration {
    pub id: String,
    pub name: Option<String>,
    pub status: String,
    pub created: DateTime<Utc>,
    pub last_modified: Option<DateTime<Utc>>,
    pub trained_at: Option<DateTime<Utc>>,
}

impl Iteration {
    pub fn is_training(&self) -> bool {
        self.status == "Training"
    }

    pub fn is_completed(&self) -> bool {
        self.status == "Completed"
    }

    /// Wall-clock time the service spent training, once `trained_at` is set.
    pub fn training_time(&self) -> Option<chrono::Duration> {
        self.trained_at.map(|trained_at| trained_at - self.created)
    }
}

/// One file queued for upload: its name plus base64-encoded contents,
/// which is how the batch call carries raw bytes over JSON.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageFileCreateEntry {
    pub name: String,
    pub contents: String,
}

impl ImageFileCreateEntry {
    pub fn from_bytes(name: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            name: name.into(),
            contents: base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }
}

/// A bounded group of files submitted in one remote call, all tagged with
/// the same tag ids.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageFileCreateBatch {
    pub images: Vec<ImageFileCreateEntry>,
    pub tag_ids: Vec<String>,
}

/// Ack returned by a batch submission. The call succeeds at the transport
/// level even when individual images are rejected (duplicates etc.), so
/// `is_batch_successful` has to be inspected separately.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageCreateSummary {
    pub is_batch_successful: bool,
    #[serde(default)]
    pub images: Vec<ImageCreateResult>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageCreateResult {
    pub status: String,
    pub source_url: Option<String>,
}
