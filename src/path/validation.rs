//! Name validation
//!
//! Handles validation of entry names supplied for new directories and files.

use crate::error::VolumeError;
use crate::path::key::SEPARATOR;

/// Validate that a single entry name is safe to append to a key
pub fn validate_name(name: &str) -> Result<&str, VolumeError> {
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(SEPARATOR)
        || name.contains('\0')
    {
        return Err(VolumeError::InvalidName(name.to_string()));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_unsafe_names() {
        for name in ["", ".", "..", "a/b", "nul\0"] {
            assert!(validate_name(name).is_err(), "{:?} should be rejected", name);
        }
    }

    #[test]
    fn test_accepts_plain_names() {
        assert_eq!(validate_name("a.txt").unwrap(), "a.txt");
        assert_eq!(validate_name("..hidden").unwrap(), "..hidden");
    }
}
