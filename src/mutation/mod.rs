//! Mutation operations
//!
//! Directory and file creation, whole-object saves and deletion.

pub mod operations;

pub use operations::{NEW_FILE_MIME, mkdir, mkfile, rmdir, save, unlink};
