//! Mutation operations
//!
//! Creates, saves and deletes objects. Every operation is one whole-object request;
//! nothing here checks for existing entries or retries.

use bytes::Bytes;
use log::{error, info};
use tokio::io::AsyncRead;

use crate::error::VolumeError;
use crate::path::{ObjectKey, PathTranslator, validate_name};
use crate::store::Bucket;
use crate::transfer::{Drained, drain_stream};

/// Content type of files created empty
pub const NEW_FILE_MIME: &str = "text/plain";

fn child_key(
    translator: &PathTranslator,
    parent: &str,
    name: &str,
) -> Result<ObjectKey, VolumeError> {
    let name = validate_name(name)?;
    Ok(translator.normalize(parent).join(name))
}

async fn put(
    bucket: &Bucket,
    key: &str,
    body: Bytes,
    content_type: Option<&str>,
    path: &str,
) -> Result<(), VolumeError> {
    let len = body.len();
    bucket.put(key, body, content_type).await.map_err(|e| {
        error!("Failed to store {} (key: {}): {}", path, key, e);
        VolumeError::from(e)
    })?;
    info!("Stored {} (key: {}, {} bytes)", path, key, len);
    Ok(())
}

/// Creates a directory marker for `parent/name` and returns the new path
pub async fn mkdir(
    bucket: &Bucket,
    translator: &PathTranslator,
    parent: &str,
    name: &str,
) -> Result<String, VolumeError> {
    let key = child_key(translator, parent, name)?;
    let path = translator.join_path(parent, name);
    put(bucket, &key.marker(), Bytes::new(), None, &path).await?;
    Ok(path)
}

/// Creates an empty `text/plain` object for `parent/name` and returns the new path
pub async fn mkfile(
    bucket: &Bucket,
    translator: &PathTranslator,
    parent: &str,
    name: &str,
) -> Result<String, VolumeError> {
    let key = child_key(translator, parent, name)?;
    let path = translator.join_path(parent, name);
    put(bucket, key.as_str(), Bytes::new(), Some(NEW_FILE_MIME), &path).await?;
    Ok(path)
}

/// Replaces `dir/name` with the full content of `stream`.
///
/// Content above `limit` bytes is rejected before any request is made.
pub async fn save<R>(
    bucket: &Bucket,
    translator: &PathTranslator,
    stream: &mut R,
    dir: &str,
    name: &str,
    mime: &str,
    limit: u64,
) -> Result<String, VolumeError>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let key = child_key(translator, dir, name)?;
    let path = translator.join_path(dir, name);

    let content = match drain_stream(stream, limit).await? {
        Drained::Complete(content) => content,
        Drained::TooLarge => {
            error!("Refusing to save {}: content exceeds {} bytes", path, limit);
            return Err(VolumeError::TooLarge { path, limit });
        }
    };

    let mime = Some(mime).filter(|m| !m.is_empty());
    put(bucket, key.as_str(), content, mime, &path).await?;
    Ok(path)
}

/// Deletes the object stored at `path`
pub async fn unlink(
    bucket: &Bucket,
    translator: &PathTranslator,
    path: &str,
) -> Result<(), VolumeError> {
    if translator.is_root(path) {
        return Err(VolumeError::InvalidName(path.to_string()));
    }
    let key = translator.normalize(path);
    delete(bucket, key.as_str(), path).await
}

/// Deletes the directory marker of `path`.
///
/// Not recursive: keys below the directory stay in place, so the directory keeps
/// appearing as an implied prefix while any remain.
pub async fn rmdir(
    bucket: &Bucket,
    translator: &PathTranslator,
    path: &str,
) -> Result<(), VolumeError> {
    if translator.is_root(path) {
        return Err(VolumeError::InvalidName(path.to_string()));
    }
    let key = translator.normalize(path);
    delete(bucket, &key.marker(), path).await
}

async fn delete(bucket: &Bucket, key: &str, path: &str) -> Result<(), VolumeError> {
    bucket.delete(key).await.map_err(|e| {
        error!("Failed to delete {} (key: {}): {}", path, key, e);
        VolumeError::from(e)
    })?;
    info!("Deleted {} (key: {})", path, key);
    Ok(())
}
