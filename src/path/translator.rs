//! Path translation
//!
//! Converts between the three path forms the volume deals with: logical paths shown by
//! the file manager (`s3/docs/a.txt`), absolute paths under the configured root
//! (`/docs/a.txt`) and object keys (`docs/a.txt`). Pure string transforms, no I/O.

use crate::error::VolumeError;
use crate::path::key::{ObjectKey, SEPARATOR};

/// Root name used for logical paths when none is configured
pub const DEFAULT_ROOT_NAME: &str = "s3";

#[derive(Debug, Clone)]
pub struct PathTranslator {
    root: String,
    root_key: ObjectKey,
    root_name: String,
}

impl PathTranslator {
    pub fn new(root_path: &str, root_name: &str) -> Self {
        let root_key = ObjectKey::normalize(root_path);
        let root = from_object_key(&root_key);
        let root_name = match root_name.trim_matches(SEPARATOR) {
            "" => DEFAULT_ROOT_NAME.to_string(),
            name => name.to_string(),
        };

        Self {
            root,
            root_key,
            root_name,
        }
    }

    /// Absolute form of the configured root (always starts with `/`)
    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn root_name(&self) -> &str {
        &self.root_name
    }

    /// Object key for an absolute path
    pub fn normalize(&self, path: &str) -> ObjectKey {
        ObjectKey::normalize(path)
    }

    pub fn is_root(&self, path: &str) -> bool {
        self.normalize(path) == self.root_key
    }

    /// Accepts an absolute, logical or root-relative path and returns the absolute form.
    ///
    /// Absolute paths outside the configured root do not exist on this volume.
    pub fn to_absolute(&self, input: &str) -> Result<String, VolumeError> {
        if !input.starts_with(SEPARATOR) {
            return Ok(match input.strip_prefix(self.root_name.as_str()) {
                Some("") => self.root.clone(),
                Some(rest) if rest.starts_with(SEPARATOR) => self.abspath(rest),
                _ => self.abspath(input),
            });
        }

        let absolute = from_object_key(&ObjectKey::normalize(input));
        if is_descendant_of(&absolute, &self.root) {
            Ok(absolute)
        } else {
            Err(VolumeError::NotFound(input.to_string()))
        }
    }

    /// Path relative to the configured root, empty for the root itself
    pub fn relpath(&self, path: &str) -> String {
        let key = self.normalize(path);
        if key == self.root_key {
            return String::new();
        }
        if self.root_key.is_empty() {
            return key.to_string();
        }

        match key.as_str().strip_prefix(self.root_key.child_prefix().as_str()) {
            Some(rest) => rest.to_string(),
            None => key.to_string(),
        }
    }

    /// Inverse of [`relpath`](Self::relpath)
    pub fn abspath(&self, relative: &str) -> String {
        from_object_key(&self.root_key.join(relative))
    }

    /// Logical path displayed by the file manager
    pub fn logical_path(&self, path: &str) -> String {
        let relative = self.relpath(path);
        if relative.is_empty() {
            self.root_name.clone()
        } else {
            format!("{}{}{}", self.root_name, SEPARATOR, relative)
        }
    }

    pub fn join_path(&self, dir: &str, name: &str) -> String {
        join_path(dir, name)
    }
}

/// Absolute path for an object key
pub fn from_object_key(key: &ObjectKey) -> String {
    format!("{}{}", SEPARATOR, key)
}

pub fn dirname(path: &str) -> String {
    let trimmed = path.strip_suffix(SEPARATOR).unwrap_or(path);
    let parent = match trimmed.rfind(SEPARATOR) {
        Some(idx) => &trimmed[..idx],
        None => "",
    };

    if parent.starts_with(SEPARATOR) {
        parent.to_string()
    } else {
        format!("{}{}", SEPARATOR, parent)
    }
}

pub fn basename(path: &str) -> &str {
    path.trim_end_matches(SEPARATOR)
        .rsplit(SEPARATOR)
        .next()
        .unwrap_or("")
}

pub fn join_path(dir: &str, name: &str) -> String {
    let dir = dir.trim_end_matches(SEPARATOR);
    let name = name.trim_start_matches(SEPARATOR);
    format!("{}{}{}", dir, SEPARATOR, name)
}

/// Whether `path` is `ancestor` or lies below it. Every absolute path lies below `/`.
pub fn is_descendant_of(path: &str, ancestor: &str) -> bool {
    let ancestor = ancestor.trim_end_matches(SEPARATOR);
    path == ancestor
        || path
            .strip_prefix(ancestor)
            .is_some_and(|rest| rest.starts_with(SEPARATOR))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_is_normalized() {
        assert_eq!(PathTranslator::new("/", "s3").root(), "/");
        assert_eq!(PathTranslator::new("base//", "s3").root(), "/base");
        assert_eq!(PathTranslator::new("/", "").root_name(), DEFAULT_ROOT_NAME);
    }

    #[test]
    fn test_normalize_round_trip_is_idempotent() {
        let translator = PathTranslator::new("/", "s3");
        for path in ["/docs//a.txt", "/docs/", "docs", "//", "/a/b/c/"] {
            let key = translator.normalize(path);
            let again = translator.normalize(&from_object_key(&key));
            assert_eq!(key, again);
        }
    }

    #[test]
    fn test_relpath_and_abspath_under_base_root() {
        let translator = PathTranslator::new("/base", "s3");
        assert_eq!(translator.relpath("/base"), "");
        assert_eq!(translator.relpath("/base/docs/a.txt"), "docs/a.txt");
        assert_eq!(translator.abspath("docs/a.txt"), "/base/docs/a.txt");
        assert_eq!(translator.abspath(""), "/base");
    }

    #[test]
    fn test_logical_path_never_contains_root_prefix() {
        let translator = PathTranslator::new("/base", "s3");
        assert_eq!(translator.logical_path("/base"), "s3");
        assert_eq!(translator.logical_path("/base/docs"), "s3/docs");
    }

    #[test]
    fn test_to_absolute_accepts_every_form() {
        let translator = PathTranslator::new("/base", "s3");
        assert_eq!(translator.to_absolute("/base/docs/").unwrap(), "/base/docs");
        assert_eq!(translator.to_absolute("/base").unwrap(), "/base");
        assert_eq!(translator.to_absolute("s3").unwrap(), "/base");
        assert_eq!(translator.to_absolute("s3/docs").unwrap(), "/base/docs");
        assert_eq!(translator.to_absolute("docs").unwrap(), "/base/docs");
        assert_eq!(translator.to_absolute("s3docs").unwrap(), "/base/s3docs");
    }

    #[test]
    fn test_to_absolute_rejects_paths_outside_root() {
        let translator = PathTranslator::new("/base", "s3");
        for path in ["/", "/secret/a.txt", "/basement", "//other"] {
            assert!(matches!(
                translator.to_absolute(path),
                Err(VolumeError::NotFound(_))
            ));
        }

        let unrooted = PathTranslator::new("/", "s3");
        assert_eq!(unrooted.to_absolute("/").unwrap(), "/");
        assert_eq!(unrooted.to_absolute("//docs").unwrap(), "/docs");
    }

    #[test]
    fn test_dirname() {
        assert_eq!(dirname("/docs/a.txt"), "/docs");
        assert_eq!(dirname("/docs/sub/"), "/docs");
        assert_eq!(dirname("/docs"), "/");
        assert_eq!(dirname("docs/a.txt"), "/docs");
        assert_eq!(dirname("docs"), "/");
    }

    #[test]
    fn test_basename_and_join() {
        assert_eq!(basename("/docs/a.txt"), "a.txt");
        assert_eq!(basename("/docs/sub/"), "sub");
        assert_eq!(join_path("/", "docs"), "/docs");
        assert_eq!(join_path("/docs/", "a.txt"), "/docs/a.txt");
    }

    #[test]
    fn test_is_descendant_of() {
        assert!(is_descendant_of("/docs", "/docs"));
        assert!(is_descendant_of("/docs/a.txt", "/docs"));
        assert!(!is_descendant_of("/docsx", "/docs"));
        assert!(!is_descendant_of("/doc", "/docs"));
        assert!(is_descendant_of("/docs", "/"));
        assert!(is_descendant_of("/", "/"));
    }
}
