//! Object store clients
//!
//! The flat key/value interface the volume is built on, plus the clients that
//! implement it.

pub mod memory;
pub mod results;
pub mod s3;

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;

use crate::error::StoreError;

pub use memory::MemoryObjectStore;
pub use results::{ObjectBody, ObjectListing, ObjectMeta, ObjectSummary};
pub use s3::S3ObjectStore;

/// Content type object stores assign to objects stored without one
pub const DEFAULT_CONTENT_TYPE: &str = "binary/octet-stream";

/// Whole-object operations offered by an S3-compatible store.
///
/// A missing key is reported as [`StoreError::NotFound`]; every other failure is a
/// transport or service error. Implementations never retry on behalf of the caller.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectMeta, StoreError>;

    async fn get_object(&self, bucket: &str, key: &str) -> Result<ObjectBody, StoreError>;

    /// Stores `body` as the complete content of `key`, replacing any previous object.
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: Option<&str>,
    ) -> Result<(), StoreError>;

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), StoreError>;

    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
        delimiter: Option<char>,
    ) -> Result<ObjectListing, StoreError>;
}

/// A store client bound to one bucket.
///
/// Cheap to clone; every clone shares the same client.
#[derive(Clone)]
pub struct Bucket {
    store: Arc<dyn ObjectStore>,
    name: String,
}

impl Bucket {
    pub fn new(store: Arc<dyn ObjectStore>, name: &str) -> Self {
        Self {
            store,
            name: name.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn head(&self, key: &str) -> Result<ObjectMeta, StoreError> {
        self.store.head_object(&self.name, key).await
    }

    pub async fn get(&self, key: &str) -> Result<ObjectBody, StoreError> {
        self.store.get_object(&self.name, key).await
    }

    pub async fn put(
        &self,
        key: &str,
        body: Bytes,
        content_type: Option<&str>,
    ) -> Result<(), StoreError> {
        self.store
            .put_object(&self.name, key, body, content_type)
            .await
    }

    pub async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.store.delete_object(&self.name, key).await
    }

    pub async fn list(
        &self,
        prefix: &str,
        delimiter: Option<char>,
    ) -> Result<ObjectListing, StoreError> {
        self.store.list_objects(&self.name, prefix, delimiter).await
    }
}

impl std::fmt::Debug for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bucket").field("name", &self.name).finish()
    }
}
