//! Stat records
//!
//! The per-path metadata the file-manager core consumes. Always synthesized from the
//! object store's answers, never stored.

use std::time::SystemTime;

use crate::store::{DEFAULT_CONTENT_TYPE, ObjectMeta};

/// Sentinel mime type marking directories
pub const DIRECTORY_MIME: &str = "directory";

#[derive(Debug, Clone, PartialEq)]
pub struct StatRecord {
    pub size: u64,
    pub modified: SystemTime,
    pub mime: String,
    pub read: bool,
    pub write: bool,
    pub locked: bool,
    pub hidden: bool,
    pub link_target: Option<String>,
}

impl StatRecord {
    /// An existing, readable, writable directory
    pub fn directory(modified: SystemTime) -> Self {
        Self {
            size: 0,
            modified,
            mime: DIRECTORY_MIME.to_string(),
            read: true,
            write: true,
            locked: false,
            hidden: false,
            link_target: None,
        }
    }

    /// Builds a record from object metadata.
    ///
    /// `marker` is set when the metadata belongs to the `key/` form of the path.
    pub fn from_object(meta: &ObjectMeta, marker: bool) -> Self {
        let mut stat = Self::directory(meta.last_modified.unwrap_or_else(SystemTime::now));
        stat.size = meta.content_length;

        if marker {
            return stat;
        }

        if let Some(content_type) = meta.content_type.as_deref().filter(|ct| !ct.is_empty()) {
            stat.mime = if content_type == DEFAULT_CONTENT_TYPE {
                DIRECTORY_MIME.to_string()
            } else {
                content_type.to_string()
            };
        }
        stat
    }

    pub fn is_directory(&self) -> bool {
        self.mime == DIRECTORY_MIME
    }
}
