//! Object keys assigned at upload time.

use crate::error::GatewayError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use uuid::Uuid;

const MAX_KEY_LEN: usize = 255;
const MAX_EXTENSION_LEN: usize = 16;

/// Unique handle of a stored object: `{uuid}` or `{uuid}.{ext}`.
///
/// Keys are generated once and never change; they are the only identifier
/// callers use for subsequent download and delete.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoredObjectKey(String);

impl StoredObjectKey {
    /// Generate a fresh key, carrying over the extension of `original_filename`.
    ///
    /// A filename without an extension yields a bare UUID. Extensions that are
    /// not short ASCII alphanumerics are dropped.
    pub fn generate(original_filename: Option<&str>) -> Self {
        let id = Uuid::new_v4();
        match original_filename.and_then(extension_of) {
            Some(ext) => StoredObjectKey(format!("{}.{}", id, ext)),
            None => StoredObjectKey(id.to_string()),
        }
    }

    /// Validate a key supplied by a caller.
    pub fn parse(raw: &str) -> Result<Self, GatewayError> {
        let valid = !raw.is_empty()
            && raw.len() <= MAX_KEY_LEN
            && !raw.starts_with('.')
            && !raw.contains("..")
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

        if valid {
            Ok(StoredObjectKey(raw.to_string()))
        } else {
            Err(GatewayError::InvalidInput(format!(
                "Invalid object key: {}",
                raw
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn extension(&self) -> Option<&str> {
        extension_of(&self.0)
    }
}

impl Display for StoredObjectKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

/// Text after the last `.` of the final path segment, if it is a usable extension.
fn extension_of(filename: &str) -> Option<&str> {
    let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let (_, ext) = name.rsplit_once('.')?;
    if ext.is_empty()
        || ext.len() > MAX_EXTENSION_LEN
        || !ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(ext)
}
