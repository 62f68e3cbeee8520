//! RAX S3 Volume
//!
//! Presents an S3-compatible bucket as a hierarchical volume for a file-manager core.

pub mod commands;
pub mod config;
pub mod error;
pub mod listing;
pub mod metadata;
pub mod mutation;
pub mod path;
pub mod store;
pub mod transfer;
pub mod utils;
pub mod volume;

pub use config::VolumeConfig;
pub use error::{ErrorKind, VolumeError};
pub use volume::{S3Volume, Volume};
