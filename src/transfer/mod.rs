//! Content transfer
//!
//! Materializes whole objects in local scratch storage for reading and drains
//! caller streams for whole-object writes.

pub mod operations;
pub mod scratch;

// Re-export key types and functions
pub use operations::{Drained, drain_stream, fetch_to_scratch};
pub use scratch::{ContentHandle, Scratch, ScratchSpace};
