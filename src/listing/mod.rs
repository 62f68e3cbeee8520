//! Directory listing
//!
//! Emulates one-level directory reads over prefix listings.

mod enumerator;

pub use enumerator::DirectoryEnumerator;
