//! Derived media attributes returned from uploads.

use crate::models::StoredObjectKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Coarse media classification derived from the declared content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    Image,
    Video,
    #[serde(rename = "File")]
    Generic,
}

impl MediaKind {
    pub fn from_content_type(content_type: &str) -> Self {
        let content_type = content_type.trim().to_ascii_lowercase();
        if content_type.starts_with("image/") {
            MediaKind::Image
        } else if content_type.starts_with("video/") {
            MediaKind::Video
        } else {
            MediaKind::Generic
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
}

/// Read-only description of an uploaded object.
///
/// Computed once at upload time and handed back to the caller; the gateway
/// never stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaAttributes {
    #[serde(rename = "fileType")]
    pub kind: MediaKind,
    #[serde(rename = "fileFormat")]
    pub format: String,
    #[serde(rename = "size")]
    pub size_bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo_location: Option<GeoLocation>,
    #[serde(rename = "creationTime", skip_serializing_if = "Option::is_none")]
    pub capture_time: Option<DateTime<Utc>>,
    pub upload_time: DateTime<Utc>,
}

impl MediaAttributes {
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.width.zip(self.height)
    }
}

/// Result of a successful upload: the assigned key and what was learned
/// about the payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedMedia {
    #[serde(rename = "filename")]
    pub key: StoredObjectKey,
    #[serde(flatten)]
    pub attributes: MediaAttributes,
}
