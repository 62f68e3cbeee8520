//! Transfer operations
//!
//! Whole-object reads into scratch storage and whole-stream drains for writes.

use bytes::Bytes;
use log::{error, info};
use std::io::SeekFrom;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeekExt, AsyncWriteExt};

use crate::error::TransferError;
use crate::path::ObjectKey;
use crate::store::Bucket;
use crate::transfer::scratch::{ContentHandle, ScratchSpace};

/// Fetches the complete object at `key` into fresh scratch storage.
///
/// The handle is positioned at the start of the content. Nothing is returned unless
/// the whole body was received and written; on failure the scratch file is removed.
pub async fn fetch_to_scratch(
    bucket: &Bucket,
    scratch: &ScratchSpace,
    key: &ObjectKey,
    path: &str,
) -> Result<ContentHandle, TransferError> {
    let (mut file, backing) = scratch
        .allocate(path)
        .await
        .map_err(TransferError::ScratchUnavailable)?;

    let object = bucket.get(key.as_str()).await.map_err(|e| {
        error!("Failed to fetch {} (key: {}): {}", path, key, e);
        TransferError::FetchFailed(e)
    })?;

    let written = async {
        file.write_all(&object.body).await?;
        file.flush().await?;
        file.seek(SeekFrom::Start(0)).await
    }
    .await;

    if let Err(e) = written {
        error!("Failed to write scratch copy of {}: {}", path, e);
        return Err(TransferError::ScratchWriteFailed(e));
    }

    info!(
        "Fetched {} (key: {}) into scratch storage ({} bytes)",
        path,
        key,
        object.body.len()
    );

    Ok(ContentHandle::new(
        file,
        backing,
        object.body.len() as u64,
        object.content_type,
    ))
}

/// Outcome of draining an input stream under a size cap
#[derive(Debug)]
pub enum Drained {
    Complete(Bytes),
    TooLarge,
}

/// Reads `stream` to its end, giving up once more than `limit` bytes arrive.
pub async fn drain_stream<R>(stream: &mut R, limit: u64) -> Result<Drained, TransferError>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut content = Vec::new();
    stream
        .take(limit.saturating_add(1))
        .read_to_end(&mut content)
        .await
        .map_err(TransferError::StreamReadFailed)?;

    if content.len() as u64 > limit {
        return Ok(Drained::TooLarge);
    }
    Ok(Drained::Complete(Bytes::from(content)))
}
