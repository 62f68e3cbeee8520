//! Volume capability interface
//!
//! The contract every storage backend offers the file-manager core. Paths are the
//! absolute paths a backend hands out; backends may also accept their logical form.
//! A path outside the backend's root is reported as not found.

use async_trait::async_trait;
use tokio::io::AsyncRead;

use crate::error::VolumeError;
use crate::metadata::StatRecord;
use crate::transfer::ContentHandle;

#[async_trait]
pub trait Volume: Send + Sync {
    /// Short identifier of the backend type
    fn driver_id(&self) -> &str;

    /// Absolute path of the volume root
    fn root(&self) -> &str;

    /// Displayed path for an absolute path
    fn logical_path(&self, path: &str) -> Result<String, VolumeError>;

    async fn stat(&self, path: &str) -> Result<StatRecord, VolumeError>;

    /// Absolute paths of the immediate children of `path`, sorted
    async fn list(&self, path: &str) -> Result<Vec<String>, VolumeError>;

    async fn has_subdirectories(&self, path: &str) -> Result<bool, VolumeError>;

    async fn open_for_read(&self, path: &str) -> Result<ContentHandle, VolumeError>;

    async fn close(&self, handle: ContentHandle, path: &str) -> Result<(), VolumeError>;

    async fn create_directory(&self, parent: &str, name: &str) -> Result<String, VolumeError>;

    async fn create_file(&self, parent: &str, name: &str) -> Result<String, VolumeError>;

    async fn save(
        &self,
        stream: &mut (dyn AsyncRead + Unpin + Send),
        dir: &str,
        name: &str,
        mime: &str,
    ) -> Result<String, VolumeError>;

    /// Deletes a file
    async fn delete(&self, path: &str) -> Result<(), VolumeError>;

    async fn remove_directory(&self, path: &str) -> Result<(), VolumeError>;

    async fn symlink(
        &self,
        source: &str,
        target_dir: &str,
        name: &str,
    ) -> Result<String, VolumeError>;

    async fn copy(
        &self,
        source: &str,
        target_dir: &str,
        name: &str,
    ) -> Result<String, VolumeError>;

    async fn move_entry(
        &self,
        source: &str,
        target_dir: &str,
        name: &str,
    ) -> Result<String, VolumeError>;

    async fn get_contents(&self, path: &str) -> Result<String, VolumeError>;

    async fn put_contents(&self, path: &str, content: &str) -> Result<(), VolumeError>;

    async fn extract(&self, path: &str) -> Result<Vec<String>, VolumeError>;

    async fn archive(
        &self,
        dir: &str,
        files: &[String],
        name: &str,
    ) -> Result<String, VolumeError>;

    /// Pixel dimensions of an image, when the backend can tell
    fn dimensions(&self, _path: &str, _mime: &str) -> Option<(u32, u32)> {
        None
    }
}
