//! Error types
//!
//! Defines domain-specific error types for each layer of the volume driver.

use std::fmt;
use std::io;

/// Object store client errors
#[derive(Debug)]
pub enum StoreError {
    NotFound(String),
    Transport(String),
    Service(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound(key) => write!(f, "Object not found: {}", key),
            StoreError::Transport(msg) => write!(f, "Transport failure: {}", msg),
            StoreError::Service(msg) => write!(f, "Object store rejected request: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

/// Content transfer errors
#[derive(Debug)]
pub enum TransferError {
    ScratchUnavailable(io::Error),
    ScratchWriteFailed(io::Error),
    ScratchCleanupFailed(io::Error),
    FetchFailed(StoreError),
    StreamReadFailed(io::Error),
    OutputWriteFailed(io::Error),
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferError::ScratchUnavailable(e) => {
                write!(f, "Failed to allocate scratch storage: {}", e)
            }
            TransferError::ScratchWriteFailed(e) => {
                write!(f, "Failed to write scratch storage: {}", e)
            }
            TransferError::ScratchCleanupFailed(e) => {
                write!(f, "Failed to remove scratch storage: {}", e)
            }
            TransferError::FetchFailed(e) => write!(f, "Failed to fetch object: {}", e),
            TransferError::StreamReadFailed(e) => write!(f, "Failed to read input stream: {}", e),
            TransferError::OutputWriteFailed(e) => write!(f, "Failed to write output: {}", e),
        }
    }
}

impl std::error::Error for TransferError {}

/// Operations the object store backend cannot emulate safely
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsupportedOperation {
    Symlink,
    Copy,
    Move,
    GetContents,
    PutContents,
    Extract,
    Archive,
}

impl fmt::Display for UnsupportedOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UnsupportedOperation::Symlink => "symlink",
            UnsupportedOperation::Copy => "copy",
            UnsupportedOperation::Move => "move",
            UnsupportedOperation::GetContents => "get contents",
            UnsupportedOperation::PutContents => "put contents",
            UnsupportedOperation::Extract => "extract",
            UnsupportedOperation::Archive => "archive",
        };
        write!(f, "{}", name)
    }
}

/// Coarse classification surfaced to the file-manager core
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    TransportFailure,
    Unsupported,
    ConfigurationInvalid,
    InvalidInput,
}

/// General volume error that encompasses all error types
#[derive(Debug)]
pub enum VolumeError {
    NotFound(String),
    Transport(StoreError),
    Unsupported(UnsupportedOperation),
    ConfigurationInvalid(String),
    InvalidName(String),
    TooLarge { path: String, limit: u64 },
    Transfer(TransferError),
}

impl fmt::Display for VolumeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VolumeError::NotFound(p) => write!(f, "Not found: {}", p),
            VolumeError::Transport(e) => write!(f, "Object store error: {}", e),
            VolumeError::Unsupported(op) => {
                write!(f, "Unsupported operation on object store volume: {}", op)
            }
            VolumeError::ConfigurationInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            VolumeError::InvalidName(name) => write!(f, "Invalid name: {:?}", name),
            VolumeError::TooLarge { path, limit } => {
                write!(f, "Content for {} exceeds the {} byte limit", path, limit)
            }
            VolumeError::Transfer(e) => write!(f, "Transfer error: {}", e),
        }
    }
}

impl std::error::Error for VolumeError {}

impl VolumeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            VolumeError::NotFound(_) => ErrorKind::NotFound,
            VolumeError::Transport(StoreError::NotFound(_)) => ErrorKind::NotFound,
            VolumeError::Transport(_) => ErrorKind::TransportFailure,
            VolumeError::Transfer(TransferError::FetchFailed(StoreError::NotFound(_))) => {
                ErrorKind::NotFound
            }
            VolumeError::Transfer(_) => ErrorKind::TransportFailure,
            VolumeError::Unsupported(_) => ErrorKind::Unsupported,
            VolumeError::ConfigurationInvalid(_) => ErrorKind::ConfigurationInvalid,
            VolumeError::InvalidName(_) | VolumeError::TooLarge { .. } => ErrorKind::InvalidInput,
        }
    }
}

impl From<StoreError> for VolumeError {
    fn from(error: StoreError) -> Self {
        VolumeError::Transport(error)
    }
}

impl From<TransferError> for VolumeError {
    fn from(error: TransferError) -> Self {
        VolumeError::Transfer(error)
    }
}

impl From<config::ConfigError> for VolumeError {
    fn from(error: config::ConfigError) -> Self {
        VolumeError::ConfigurationInvalid(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert_eq!(VolumeError::NotFound("/a".into()).kind(), ErrorKind::NotFound);
        assert_eq!(
            VolumeError::Transport(StoreError::Transport("reset".into())).kind(),
            ErrorKind::TransportFailure
        );
        assert_eq!(
            VolumeError::Transfer(TransferError::FetchFailed(StoreError::NotFound("k".into())))
                .kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            VolumeError::Unsupported(UnsupportedOperation::Move).kind(),
            ErrorKind::Unsupported
        );
    }

    #[test]
    fn test_unsupported_display_names_operation() {
        let err = VolumeError::Unsupported(UnsupportedOperation::Archive);
        assert!(err.to_string().contains("archive"));
    }
}
