//! Scratch storage
//!
//! Local temp files that hold a fully fetched object while the caller reads it.

use log::{info, warn};
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::task::{Context, Poll};
use tempfile::TempPath;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncSeek, ReadBuf};
use tokio::task;

/// Where scratch files are allocated
#[derive(Debug, Clone, Default)]
pub struct ScratchSpace {
    dir: Option<PathBuf>,
}

impl ScratchSpace {
    /// Anonymous temp files only
    pub fn anonymous() -> Self {
        Self { dir: None }
    }

    /// Named scratch files under `dir`, created if missing.
    ///
    /// Falls back to anonymous temp files when the directory cannot be created.
    pub fn configure(dir: Option<PathBuf>) -> Self {
        let Some(dir) = dir else {
            return Self::anonymous();
        };

        match fs::create_dir_all(&dir) {
            Ok(()) if !is_read_only(&dir) => {
                info!("Scratch directory: {}", dir.display());
                Self { dir: Some(dir) }
            }
            Ok(()) => {
                warn!(
                    "Scratch directory {} is read-only, using anonymous temp files",
                    dir.display()
                );
                Self::anonymous()
            }
            Err(e) => {
                warn!(
                    "Failed to create scratch directory {}: {}, using anonymous temp files",
                    dir.display(),
                    e
                );
                Self::anonymous()
            }
        }
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Allocates a fresh scratch file for `path`.
    ///
    /// Named files share a prefix derived from the path and get a unique suffix per
    /// call, so concurrent reads of one path never share a file.
    pub async fn allocate(&self, path: &str) -> io::Result<(File, Scratch)> {
        let dir = self.dir.clone();
        let prefix = scratch_prefix(path);

        let (file, scratch) = task::spawn_blocking(move || -> io::Result<(fs::File, Scratch)> {
            match dir {
                Some(dir) => {
                    let named = tempfile::Builder::new().prefix(&prefix).tempfile_in(dir)?;
                    let (file, temp_path) = named.into_parts();
                    Ok((file, Scratch::Named(temp_path)))
                }
                None => Ok((tempfile::tempfile()?, Scratch::Anonymous)),
            }
        })
        .await
        .map_err(io::Error::other)??;

        Ok((File::from_std(file), scratch))
    }
}

fn is_read_only(dir: &Path) -> bool {
    fs::metadata(dir)
        .map(|m| m.permissions().readonly())
        .unwrap_or(true)
}

/// File name prefix for scratch copies of `path`
pub fn scratch_prefix(path: &str) -> String {
    let digest = Sha256::digest(path.as_bytes());
    let hex: String = digest[..8].iter().map(|b| format!("{:02x}", b)).collect();
    format!("{}-", hex)
}

/// Backing of a scratch file
#[derive(Debug)]
pub enum Scratch {
    /// Removed from disk on close or drop
    Named(TempPath),
    /// Unlinked by the OS as soon as it is created
    Anonymous,
}

/// Readable handle over a fully materialized object
#[derive(Debug)]
pub struct ContentHandle {
    file: File,
    scratch: Scratch,
    len: u64,
    content_type: Option<String>,
}

impl ContentHandle {
    pub(crate) fn new(
        file: File,
        scratch: Scratch,
        len: u64,
        content_type: Option<String>,
    ) -> Self {
        Self {
            file,
            scratch,
            len,
            content_type,
        }
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Location of the named scratch file, if any
    pub fn scratch_path(&self) -> Option<&Path> {
        match &self.scratch {
            Scratch::Named(path) => Some(&**path),
            Scratch::Anonymous => None,
        }
    }

    /// Releases the OS handle and removes any named scratch file.
    pub async fn close(self) -> io::Result<()> {
        let ContentHandle { file, scratch, .. } = self;
        drop(file);
        match scratch {
            Scratch::Named(path) => task::spawn_blocking(move || path.close())
                .await
                .map_err(io::Error::other)?,
            Scratch::Anonymous => Ok(()),
        }
    }
}

impl AsyncRead for ContentHandle {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.file).poll_read(cx, buf)
    }
}

impl AsyncSeek for ContentHandle {
    fn start_seek(mut self: Pin<&mut Self>, position: SeekFrom) -> io::Result<()> {
        Pin::new(&mut self.file).start_seek(position)
    }

    fn poll_complete(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<u64>> {
        Pin::new(&mut self.file).poll_complete(cx)
    }
}
