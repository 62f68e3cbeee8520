//! Object store result types
//!
//! Defines result structures returned by object store clients.

use bytes::Bytes;
use std::time::SystemTime;

/// Metadata returned by a HEAD-style request
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectMeta {
    pub content_length: u64,
    pub content_type: Option<String>,
    pub last_modified: Option<SystemTime>,
}

/// Full object returned by a GET request
#[derive(Debug, Clone)]
pub struct ObjectBody {
    pub body: Bytes,
    pub content_type: Option<String>,
    pub content_length: u64,
}

/// One key in a listing
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectSummary {
    pub key: String,
    pub size: u64,
    pub last_modified: Option<SystemTime>,
}

/// Result of a prefix/delimiter listing
#[derive(Debug, Clone, Default)]
pub struct ObjectListing {
    pub objects: Vec<ObjectSummary>,
    /// Prefixes rolled up by the delimiter, each ending in the delimiter
    pub common_prefixes: Vec<String>,
}
