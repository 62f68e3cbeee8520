//! Directory enumeration
//!
//! Lists the immediate children of a key using prefix/delimiter queries.

use log::{debug, error};
use std::collections::BTreeSet;

use crate::error::VolumeError;
use crate::path::{ObjectKey, SEPARATOR};
use crate::store::Bucket;

#[derive(Debug, Clone)]
pub struct DirectoryEnumerator {
    bucket: Bucket,
}

impl DirectoryEnumerator {
    pub fn new(bucket: Bucket) -> Self {
        Self { bucket }
    }

    /// Immediate children of `dir`, sorted, without trailing separators.
    ///
    /// Directory markers and implied prefixes for the same child collapse into one
    /// entry. The marker of `dir` itself is never returned.
    pub async fn list(&self, dir: &ObjectKey) -> Result<Vec<ObjectKey>, VolumeError> {
        let prefix = dir.child_prefix();
        let listing = self
            .bucket
            .list(&prefix, Some(SEPARATOR))
            .await
            .map_err(|e| {
                error!("Failed to list prefix {:?}: {}", prefix, e);
                VolumeError::from(e)
            })?;

        let children: BTreeSet<ObjectKey> = listing
            .objects
            .iter()
            .map(|object| object.key.as_str())
            .chain(listing.common_prefixes.iter().map(String::as_str))
            .filter_map(|key| direct_child(&prefix, key))
            .collect();

        debug!("Listed {:?}: {} children", prefix, children.len());
        Ok(children.into_iter().collect())
    }

    /// Whether any key lives below `dir`, i.e. `dir` exists as an implied directory.
    pub async fn has_children(&self, dir: &ObjectKey) -> Result<bool, VolumeError> {
        if dir.is_empty() {
            return Ok(true);
        }
        let listing = self.bucket.list(&dir.child_prefix(), Some(SEPARATOR)).await?;
        Ok(!listing.objects.is_empty() || !listing.common_prefixes.is_empty())
    }
}

/// Returns the child key when `key` is exactly one segment below `prefix`.
fn direct_child(prefix: &str, key: &str) -> Option<ObjectKey> {
    let rest = key.strip_prefix(prefix)?;
    let name = rest.strip_suffix(SEPARATOR).unwrap_or(rest);

    if name.is_empty() || name.contains(SEPARATOR) {
        return None;
    }
    Some(ObjectKey::normalize(&format!("{}{}", prefix, name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryObjectStore, ObjectStore};
    use bytes::Bytes;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    async fn seeded(store: MemoryObjectStore, keys: &[&str]) -> DirectoryEnumerator {
        for key in keys {
            store
                .put_object("files", key, Bytes::new(), None)
                .await
                .unwrap();
        }
        DirectoryEnumerator::new(Bucket::new(Arc::new(store), "files"))
    }

    fn names(keys: Vec<ObjectKey>) -> Vec<String> {
        keys.into_iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_direct_child_filter() {
        assert_eq!(direct_child("docs/", "docs/a.txt").unwrap().as_str(), "docs/a.txt");
        assert_eq!(direct_child("docs/", "docs/sub/").unwrap().as_str(), "docs/sub");
        assert!(direct_child("docs/", "docs/").is_none());
        assert!(direct_child("docs/", "docs/sub/c.txt").is_none());
        assert!(direct_child("docs/", "other/a.txt").is_none());
        assert_eq!(direct_child("", "top").unwrap().as_str(), "top");
    }

    #[tokio::test]
    async fn test_lists_one_level_merging_markers() {
        let enumerator = seeded(
            MemoryObjectStore::new(),
            &["docs/", "docs/b.txt", "docs/a.txt", "docs/sub/", "docs/sub/c.txt", "docs/deep/x/y"],
        )
        .await;

        let children = enumerator.list(&ObjectKey::normalize("docs")).await.unwrap();
        assert_eq!(
            names(children),
            vec!["docs/a.txt", "docs/b.txt", "docs/deep", "docs/sub"]
        );
    }

    #[tokio::test]
    async fn test_filters_deep_keys_when_store_ignores_delimiter() {
        let enumerator = seeded(
            MemoryObjectStore::ignoring_delimiter(),
            &["docs/", "docs/a.txt", "docs/sub/", "docs/sub/c.txt"],
        )
        .await;

        let children = enumerator.list(&ObjectKey::normalize("docs")).await.unwrap();
        assert_eq!(names(children), vec!["docs/a.txt", "docs/sub"]);
    }

    #[tokio::test]
    async fn test_bucket_root_listing() {
        let enumerator = seeded(MemoryObjectStore::new(), &["docs/", "readme.md"]).await;
        let children = enumerator.list(&ObjectKey::default()).await.unwrap();
        assert_eq!(names(children), vec!["docs", "readme.md"]);
    }

    #[tokio::test]
    async fn test_has_children_detects_implied_directory() {
        let enumerator = seeded(MemoryObjectStore::new(), &["a/b/file.txt"]).await;
        assert!(enumerator.has_children(&ObjectKey::normalize("a")).await.unwrap());
        assert!(enumerator.has_children(&ObjectKey::normalize("a/b")).await.unwrap());
        assert!(!enumerator.has_children(&ObjectKey::normalize("a/b/file.txt")).await.unwrap());
    }

    #[tokio::test]
    async fn test_listing_failure_is_transport_error() {
        let store = MemoryObjectStore::new();
        store.fail_key("docs/").await;
        let enumerator = seeded(store, &[]).await;

        let err = enumerator.list(&ObjectKey::normalize("docs")).await.unwrap_err();
        assert!(matches!(err, VolumeError::Transport(_)));
    }
}
