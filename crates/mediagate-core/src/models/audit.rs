//! Audit records emitted after storage mutations.

use crate::models::StoredObjectKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditAction {
    #[serde(rename = "FILE_UPLOADED")]
    Uploaded,
    #[serde(rename = "FILE_DELETED")]
    Deleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityType {
    FileStorageActivity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    MediaFile,
}

/// A single audit event. The tenant is not part of the payload; publishers
/// carry it out of band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    pub timestamp: DateTime<Utc>,
    pub user_id: String,
    pub activity_type: ActivityType,
    pub action: AuditAction,
    pub entity_type: EntityType,
    pub entity_id: Option<String>,
    pub metadata: BTreeMap<String, String>,
}

impl AuditRecord {
    /// Record an action on a stored media object by `user_id`.
    pub fn media_object(action: AuditAction, user_id: &str, key: &StoredObjectKey) -> Self {
        let mut metadata = BTreeMap::new();
        metadata.insert("filename".to_string(), key.to_string());
        metadata.insert("entityType".to_string(), "MEDIA_FILE".to_string());

        Self {
            timestamp: Utc::now(),
            user_id: user_id.to_string(),
            activity_type: ActivityType::FileStorageActivity,
            action,
            entity_type: EntityType::MediaFile,
            entity_id: None,
            metadata,
        }
    }

    pub fn object_key(&self) -> Option<&str> {
        self.metadata.get("filename").map(String::as_str)
    }
}
