//! Object metadata
//!
//! Stat synthesis and existence resolution for object-store paths.

pub mod resolver;
pub mod stat;

pub use resolver::{MetadataResolver, Probe};
pub use stat::{DIRECTORY_MIME, StatRecord};
