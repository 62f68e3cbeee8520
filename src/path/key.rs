//! Object keys
//!
//! Flat, `/`-delimited keys as sent to the object store.

use std::fmt;

pub const SEPARATOR: char = '/';

/// A normalized object-store key.
///
/// Never starts with the separator, never contains doubled separators and carries no
/// trailing separator. The empty key addresses the bucket root.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ObjectKey(String);

impl ObjectKey {
    /// Normalizes any `/`-delimited string into a key.
    pub fn normalize(raw: &str) -> Self {
        let mut key = String::with_capacity(raw.len());
        for segment in raw.split(SEPARATOR).filter(|s| !s.is_empty()) {
            if !key.is_empty() {
                key.push(SEPARATOR);
            }
            key.push_str(segment);
        }
        ObjectKey(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Appends `name` with exactly one separator in between.
    pub fn join(&self, name: &str) -> ObjectKey {
        if self.0.is_empty() {
            ObjectKey::normalize(name)
        } else {
            ObjectKey::normalize(&format!("{}{}{}", self.0, SEPARATOR, name))
        }
    }

    /// The directory-marker form of this key (`key/`).
    pub fn marker(&self) -> String {
        format!("{}{}", self.0, SEPARATOR)
    }

    /// The listing prefix selecting this key's children. Empty for the bucket root.
    pub fn child_prefix(&self) -> String {
        if self.0.is_empty() {
            String::new()
        } else {
            self.marker()
        }
    }

    /// Last path segment.
    pub fn name(&self) -> &str {
        self.0.rsplit(SEPARATOR).next().unwrap_or("")
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ObjectKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
