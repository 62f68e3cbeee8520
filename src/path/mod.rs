//! Path translation
//!
//! Handles object keys, absolute and logical paths, and entry name validation.

pub mod key;
pub mod translator;
pub mod validation;

// Re-export commonly used path helpers
pub use key::{ObjectKey, SEPARATOR};
pub use translator::{
    DEFAULT_ROOT_NAME, PathTranslator, basename, dirname, from_object_key, is_descendant_of,
    join_path,
};
pub use validation::validate_name;
