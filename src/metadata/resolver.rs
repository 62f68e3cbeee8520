//! Object metadata resolution
//!
//! Decides whether a path exists and synthesizes its stat record, distinguishing a
//! real object from a directory marker.

use log::{debug, warn};
use std::time::SystemTime;

use crate::error::{StoreError, VolumeError};
use crate::metadata::stat::StatRecord;
use crate::path::PathTranslator;
use crate::store::{Bucket, ObjectMeta};

/// Outcome of a single metadata probe
#[derive(Debug)]
pub enum Probe {
    Found(ObjectMeta),
    NotFound,
    TransportError(StoreError),
}

impl From<Result<ObjectMeta, StoreError>> for Probe {
    fn from(result: Result<ObjectMeta, StoreError>) -> Self {
        match result {
            Ok(meta) => Probe::Found(meta),
            Err(StoreError::NotFound(_)) => Probe::NotFound,
            Err(e) => Probe::TransportError(e),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MetadataResolver {
    bucket: Bucket,
    translator: PathTranslator,
}

impl MetadataResolver {
    pub fn new(bucket: Bucket, translator: PathTranslator) -> Self {
        Self { bucket, translator }
    }

    /// Issues one HEAD request for `key`
    pub async fn probe(&self, key: &str) -> Probe {
        self.bucket.head(key).await.into()
    }

    /// Stat for an absolute path.
    ///
    /// Tries the exact key, then its directory-marker form. A transport failure on
    /// either probe counts as a miss for that probe only.
    pub async fn stat(&self, path: &str) -> Result<StatRecord, VolumeError> {
        if self.translator.is_root(path) {
            return Ok(StatRecord::directory(SystemTime::now()));
        }

        let key = self.translator.normalize(path);
        if let Some(meta) = self.found(key.as_str()).await {
            return Ok(StatRecord::from_object(&meta, false));
        }
        if let Some(meta) = self.found(&key.marker()).await {
            return Ok(StatRecord::from_object(&meta, true));
        }

        debug!("No object or marker for {} (key: {})", path, key);
        Err(VolumeError::NotFound(path.to_string()))
    }

    async fn found(&self, key: &str) -> Option<ObjectMeta> {
        match self.probe(key).await {
            Probe::Found(meta) => Some(meta),
            Probe::NotFound => None,
            Probe::TransportError(e) => {
                warn!("Metadata probe for {} failed, treating as missing: {}", key, e);
                None
            }
        }
    }
}
