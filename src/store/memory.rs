//! In-memory object store
//!
//! A process-local stand-in for an S3 bucket. Mirrors the store behaviours the volume
//! depends on: default content types, delimiter roll-up into common prefixes and
//! silent deletes of missing keys.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::SystemTime;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::store::{
    DEFAULT_CONTENT_TYPE, ObjectBody, ObjectListing, ObjectMeta, ObjectStore, ObjectSummary,
};

#[derive(Debug, Clone)]
struct StoredObject {
    body: Bytes,
    content_type: String,
    last_modified: SystemTime,
}

#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: RwLock<BTreeMap<(String, String), StoredObject>>,
    failing_keys: RwLock<HashSet<String>>,
    ignore_delimiter: bool,
    requests: AtomicUsize,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that returns every key under a prefix, whatever the delimiter.
    pub fn ignoring_delimiter() -> Self {
        Self {
            ignore_delimiter: true,
            ..Self::default()
        }
    }

    /// Makes every request touching `key` fail with a transport error.
    pub async fn fail_key(&self, key: &str) {
        self.failing_keys.write().await.insert(key.to_string());
    }

    /// Keys currently stored in `bucket`, in order.
    pub async fn keys(&self, bucket: &str) -> Vec<String> {
        self.objects
            .read()
            .await
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, k)| k.clone())
            .collect()
    }

    /// Number of requests served so far.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    async fn begin(&self, key: &str) -> Result<(), StoreError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if self.failing_keys.read().await.contains(key) {
            return Err(StoreError::Transport(format!(
                "injected failure for key {}",
                key
            )));
        }
        Ok(())
    }
}

fn entry(bucket: &str, key: &str) -> (String, String) {
    (bucket.to_string(), key.to_string())
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectMeta, StoreError> {
        self.begin(key).await?;
        let objects = self.objects.read().await;
        let object = objects
            .get(&entry(bucket, key))
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;

        Ok(ObjectMeta {
            content_length: object.body.len() as u64,
            content_type: Some(object.content_type.clone()),
            last_modified: Some(object.last_modified),
        })
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<ObjectBody, StoreError> {
        self.begin(key).await?;
        let objects = self.objects.read().await;
        let object = objects
            .get(&entry(bucket, key))
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;

        Ok(ObjectBody {
            body: object.body.clone(),
            content_type: Some(object.content_type.clone()),
            content_length: object.body.len() as u64,
        })
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: Option<&str>,
    ) -> Result<(), StoreError> {
        self.begin(key).await?;
        let content_type = content_type
            .filter(|ct| !ct.is_empty())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();

        self.objects.write().await.insert(
            entry(bucket, key),
            StoredObject {
                body,
                content_type,
                last_modified: SystemTime::now(),
            },
        );
        Ok(())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), StoreError> {
        self.begin(key).await?;
        self.objects.write().await.remove(&entry(bucket, key));
        Ok(())
    }

    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
        delimiter: Option<char>,
    ) -> Result<ObjectListing, StoreError> {
        self.begin(prefix).await?;
        let objects = self.objects.read().await;
        let delimiter = delimiter.filter(|_| !self.ignore_delimiter);

        let mut listing = ObjectListing::default();
        let mut prefixes = BTreeSet::new();

        for ((b, key), object) in objects.iter() {
            if b != bucket {
                continue;
            }
            let Some(rest) = key.strip_prefix(prefix) else {
                continue;
            };

            match delimiter.and_then(|d| rest.find(d).map(|idx| idx + d.len_utf8())) {
                Some(end) => {
                    prefixes.insert(format!("{}{}", prefix, &rest[..end]));
                }
                None => listing.objects.push(ObjectSummary {
                    key: key.clone(),
                    size: object.body.len() as u64,
                    last_modified: Some(object.last_modified),
                }),
            }
        }

        listing.common_prefixes = prefixes.into_iter().collect();
        Ok(listing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_without_content_type_uses_store_default() {
        let store = MemoryObjectStore::new();
        store
            .put_object("b", "docs/", Bytes::new(), None)
            .await
            .unwrap();

        let meta = store.head_object("b", "docs/").await.unwrap();
        assert_eq!(meta.content_length, 0);
        assert_eq!(meta.content_type.as_deref(), Some(DEFAULT_CONTENT_TYPE));
    }

    #[tokio::test]
    async fn test_delimiter_rolls_up_nested_keys() {
        let store = MemoryObjectStore::new();
        for key in ["a.txt", "docs/", "docs/b.txt", "docs/sub/c.txt"] {
            store
                .put_object("b", key, Bytes::from_static(b"x"), None)
                .await
                .unwrap();
        }

        let root = store.list_objects("b", "", Some('/')).await.unwrap();
        let keys: Vec<_> = root.objects.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["a.txt"]);
        assert_eq!(root.common_prefixes, vec!["docs/".to_string()]);

        let docs = store.list_objects("b", "docs/", Some('/')).await.unwrap();
        let keys: Vec<_> = docs.objects.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["docs/", "docs/b.txt"]);
        assert_eq!(docs.common_prefixes, vec!["docs/sub/".to_string()]);
    }

    #[tokio::test]
    async fn test_ignoring_delimiter_returns_all_descendants() {
        let store = MemoryObjectStore::ignoring_delimiter();
        store
            .put_object("b", "docs/sub/c.txt", Bytes::new(), None)
            .await
            .unwrap();

        let listing = store.list_objects("b", "docs/", Some('/')).await.unwrap();
        assert_eq!(listing.objects.len(), 1);
        assert!(listing.common_prefixes.is_empty());
    }

    #[tokio::test]
    async fn test_injected_failure_and_missing_key() {
        let store = MemoryObjectStore::new();
        store.fail_key("broken").await;

        let err = store.head_object("b", "broken").await.unwrap_err();
        assert!(matches!(err, StoreError::Transport(_)));
        let err = store.head_object("b", "absent").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(store.request_count(), 2);
    }

    #[tokio::test]
    async fn test_delete_missing_key_succeeds() {
        let store = MemoryObjectStore::new();
        assert!(store.delete_object("b", "nothing").await.is_ok());
    }
}
