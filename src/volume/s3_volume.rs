//! Object store volume
//!
//! Presents one bucket (optionally below a root prefix) as a directory tree.

use async_trait::async_trait;
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::SystemTime;
use tokio::io::AsyncRead;

use crate::config::VolumeConfig;
use crate::error::{TransferError, UnsupportedOperation, VolumeError};
use crate::listing::DirectoryEnumerator;
use crate::metadata::{MetadataResolver, StatRecord};
use crate::mutation;
use crate::path::{PathTranslator, from_object_key};
use crate::store::{Bucket, ObjectStore, S3ObjectStore};
use crate::transfer::{ContentHandle, ScratchSpace, fetch_to_scratch};
use crate::volume::driver::Volume;

pub const DRIVER_ID: &str = "s3s";

#[derive(Debug, Clone)]
pub struct S3Volume {
    bucket: Bucket,
    translator: PathTranslator,
    resolver: MetadataResolver,
    enumerator: DirectoryEnumerator,
    scratch: ScratchSpace,
    max_object_size: u64,
}

impl S3Volume {
    /// Builds a volume over an injected store client.
    ///
    /// Fails when credentials or bucket are missing from `config`.
    pub fn new(config: &VolumeConfig, store: Arc<dyn ObjectStore>) -> Result<Self, VolumeError> {
        config.validate()?;

        let bucket = Bucket::new(store, &config.bucket);
        let translator = PathTranslator::new(&config.root_path, &config.root_name);

        info!(
            "Mounted bucket {} at {} as {}",
            config.bucket,
            translator.root(),
            translator.root_name()
        );

        Ok(Self {
            resolver: MetadataResolver::new(bucket.clone(), translator.clone()),
            enumerator: DirectoryEnumerator::new(bucket.clone()),
            scratch: ScratchSpace::configure(config.tmp_path_buf()),
            max_object_size: config.max_object_size_bytes(),
            bucket,
            translator,
        })
    }

    /// Builds a volume backed by an S3 client created from `config`.
    pub async fn connect(config: &VolumeConfig) -> Result<Self, VolumeError> {
        config.validate()?;
        let store = S3ObjectStore::from_config(config).await;
        Self::new(config, Arc::new(store))
    }

    pub fn bucket_name(&self) -> &str {
        self.bucket.name()
    }

    fn unsupported<T>(&self, op: UnsupportedOperation, path: &str) -> Result<T, VolumeError> {
        debug!("Rejected {} on {}: not supported by object store volume", op, path);
        Err(VolumeError::Unsupported(op))
    }
}

#[async_trait]
impl Volume for S3Volume {
    fn driver_id(&self) -> &str {
        DRIVER_ID
    }

    fn root(&self) -> &str {
        self.translator.root()
    }

    fn logical_path(&self, path: &str) -> Result<String, VolumeError> {
        Ok(self.translator.logical_path(&self.translator.to_absolute(path)?))
    }

    /// A path with no object or marker still exists when keys live below it.
    async fn stat(&self, path: &str) -> Result<StatRecord, VolumeError> {
        let path = self.translator.to_absolute(path)?;
        match self.resolver.stat(&path).await {
            Err(VolumeError::NotFound(missing)) => {
                let key = self.translator.normalize(&path);
                match self.enumerator.has_children(&key).await {
                    Ok(true) => Ok(StatRecord::directory(SystemTime::now())),
                    Ok(false) => Err(VolumeError::NotFound(missing)),
                    Err(e) => {
                        warn!("Implied directory check for {} failed: {}", path, e);
                        Err(VolumeError::NotFound(missing))
                    }
                }
            }
            other => other,
        }
    }

    async fn list(&self, path: &str) -> Result<Vec<String>, VolumeError> {
        let path = self.translator.to_absolute(path)?;
        let key = self.translator.normalize(&path);
        let children = self.enumerator.list(&key).await?;
        Ok(children.iter().map(from_object_key).collect())
    }

    async fn has_subdirectories(&self, path: &str) -> Result<bool, VolumeError> {
        match self.stat(path).await {
            Ok(stat) if stat.is_directory() => {}
            Ok(_) | Err(VolumeError::NotFound(_)) => return Ok(false),
            Err(e) => return Err(e),
        }

        for child in self.list(path).await? {
            match self.stat(&child).await {
                Ok(stat) if stat.is_directory() => return Ok(true),
                Ok(_) => {}
                Err(e) => debug!("Skipping {} while checking subdirectories: {}", child, e),
            }
        }
        Ok(false)
    }

    async fn open_for_read(&self, path: &str) -> Result<ContentHandle, VolumeError> {
        let path = self.translator.to_absolute(path)?;
        let key = self.translator.normalize(&path);
        Ok(fetch_to_scratch(&self.bucket, &self.scratch, &key, &path).await?)
    }

    async fn close(&self, handle: ContentHandle, path: &str) -> Result<(), VolumeError> {
        handle
            .close()
            .await
            .map_err(|e| VolumeError::from(TransferError::ScratchCleanupFailed(e)))?;
        debug!("Closed scratch copy of {}", path);
        Ok(())
    }

    async fn create_directory(&self, parent: &str, name: &str) -> Result<String, VolumeError> {
        let parent = self.translator.to_absolute(parent)?;
        mutation::mkdir(&self.bucket, &self.translator, &parent, name).await
    }

    async fn create_file(&self, parent: &str, name: &str) -> Result<String, VolumeError> {
        let parent = self.translator.to_absolute(parent)?;
        mutation::mkfile(&self.bucket, &self.translator, &parent, name).await
    }

    async fn save(
        &self,
        stream: &mut (dyn AsyncRead + Unpin + Send),
        dir: &str,
        name: &str,
        mime: &str,
    ) -> Result<String, VolumeError> {
        let dir = self.translator.to_absolute(dir)?;
        mutation::save(
            &self.bucket,
            &self.translator,
            stream,
            &dir,
            name,
            mime,
            self.max_object_size,
        )
        .await
    }

    async fn delete(&self, path: &str) -> Result<(), VolumeError> {
        let path = self.translator.to_absolute(path)?;
        mutation::unlink(&self.bucket, &self.translator, &path).await
    }

    async fn remove_directory(&self, path: &str) -> Result<(), VolumeError> {
        let path = self.translator.to_absolute(path)?;
        mutation::rmdir(&self.bucket, &self.translator, &path).await
    }

    async fn symlink(
        &self,
        source: &str,
        _target_dir: &str,
        _name: &str,
    ) -> Result<String, VolumeError> {
        self.unsupported(UnsupportedOperation::Symlink, source)
    }

    async fn copy(
        &self,
        source: &str,
        _target_dir: &str,
        _name: &str,
    ) -> Result<String, VolumeError> {
        self.unsupported(UnsupportedOperation::Copy, source)
    }

    async fn move_entry(
        &self,
        source: &str,
        _target_dir: &str,
        _name: &str,
    ) -> Result<String, VolumeError> {
        self.unsupported(UnsupportedOperation::Move, source)
    }

    async fn get_contents(&self, path: &str) -> Result<String, VolumeError> {
        self.unsupported(UnsupportedOperation::GetContents, path)
    }

    async fn put_contents(&self, path: &str, _content: &str) -> Result<(), VolumeError> {
        self.unsupported(UnsupportedOperation::PutContents, path)
    }

    async fn extract(&self, path: &str) -> Result<Vec<String>, VolumeError> {
        self.unsupported(UnsupportedOperation::Extract, path)
    }

    async fn archive(
        &self,
        dir: &str,
        _files: &[String],
        _name: &str,
    ) -> Result<String, VolumeError> {
        self.unsupported(UnsupportedOperation::Archive, dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::store::MemoryObjectStore;

    fn volume() -> (S3Volume, Arc<MemoryObjectStore>) {
        let store = Arc::new(MemoryObjectStore::new());
        let config = VolumeConfig::new("key", "secret", "files");
        (S3Volume::new(&config, store.clone()).unwrap(), store)
    }

    #[test]
    fn test_construction_requires_credentials_and_bucket() {
        let store: Arc<dyn ObjectStore> = Arc::new(MemoryObjectStore::new());
        for config in [
            VolumeConfig::new("", "secret", "files"),
            VolumeConfig::new("key", "", "files"),
            VolumeConfig::new("key", "secret", ""),
        ] {
            let err = S3Volume::new(&config, store.clone()).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ConfigurationInvalid);
        }
    }

    #[tokio::test]
    async fn test_implied_directory_stats_as_directory() {
        let (volume, _) = volume();
        let mut content: &[u8] = b"x";
        volume
            .save(&mut content, "/a/b", "file.txt", "text/plain")
            .await
            .unwrap();

        assert!(volume.stat("/a").await.unwrap().is_directory());
        assert!(volume.stat("/a/b").await.unwrap().is_directory());
        assert!(matches!(
            volume.stat("/a/c").await,
            Err(VolumeError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_has_subdirectories_short_circuits() {
        let (volume, _) = volume();
        volume.create_directory("/", "docs").await.unwrap();
        volume.create_file("/docs", "a.txt").await.unwrap();
        assert!(!volume.has_subdirectories("/docs").await.unwrap());

        volume.create_directory("/docs", "sub").await.unwrap();
        assert!(volume.has_subdirectories("/docs").await.unwrap());
        assert!(volume.has_subdirectories("/").await.unwrap());
        assert!(!volume.has_subdirectories("/docs/a.txt").await.unwrap());
        assert!(!volume.has_subdirectories("/nowhere").await.unwrap());
    }

    #[tokio::test]
    async fn test_unsupported_operations_touch_nothing() {
        let (volume, store) = volume();
        let results = [
            volume.symlink("/a", "/", "b").await.map(|_| ()),
            volume.copy("/a", "/", "b").await.map(|_| ()),
            volume.move_entry("/a", "/", "b").await.map(|_| ()),
            volume.get_contents("/a").await.map(|_| ()),
            volume.put_contents("/a", "text").await,
            volume.extract("/a.zip").await.map(|_| ()),
            volume.archive("/", &["a".to_string()], "a.zip").await.map(|_| ()),
        ];

        for result in results {
            assert_eq!(result.unwrap_err().kind(), ErrorKind::Unsupported);
        }
        assert_eq!(store.request_count(), 0);
    }

    #[tokio::test]
    async fn test_logical_and_absolute_forms_agree() {
        let (volume, _) = volume();
        volume.create_directory("/", "docs").await.unwrap();

        assert_eq!(volume.logical_path("/docs").unwrap(), "s3/docs");
        assert_eq!(
            volume.stat("s3/docs").await.unwrap().mime,
            volume.stat("/docs").await.unwrap().mime
        );
        assert_eq!(volume.list("s3").await.unwrap(), vec!["/docs".to_string()]);
    }

    #[test]
    fn test_driver_identity() {
        let (volume, _) = volume();
        assert_eq!(volume.driver_id(), DRIVER_ID);
        assert_eq!(volume.root(), "/");
        assert!(volume.dimensions("/img.png", "image/png").is_none());
    }
}
