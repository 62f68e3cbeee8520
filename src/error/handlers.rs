//! Error handlers
//!
//! Provides error reporting and exit-code mapping for the command line front end.

use crate::error::types::{ErrorKind, VolumeError};
use log::error;

/// Handle a volume error
pub fn handle_error(err: &VolumeError) {
    error!("Volume error: {}", err);
}

/// Convert error to a process exit code
pub fn error_to_exit_code(err: &VolumeError) -> i32 {
    match err.kind() {
        ErrorKind::NotFound => 2,
        ErrorKind::TransportFailure => 3,
        ErrorKind::Unsupported => 4,
        ErrorKind::ConfigurationInvalid => 5,
        ErrorKind::InvalidInput => 6,
    }
}
