//! Input validation utilities
//!
//! Checks run on command-line parameters before any file is read, returning
//! [`FgovlError`] values that name the offending parameter.

use std::path::Path;

use log::warn;

use crate::errors::{FgovlError, Result};
use crate::grouper::MAX_GROUPS_CEILING;
use crate::selector::MAX_HITS_CEILING;

/// Validate that a file exists
///
/// # Arguments
/// * `path` - Path to the file
/// * `description` - Kind of file for error messages (e.g. "LAS")
///
/// # Errors
/// Returns an error if the file does not exist
pub fn validate_file_exists<P: AsRef<Path>>(path: P, description: &str) -> Result<()> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(FgovlError::InvalidFileFormat {
            file_type: description.to_string(),
            path: path.display().to_string(),
            reason: "File does not exist".to_string(),
        });
    }
    Ok(())
}

/// Validate the number of supporting hits emitted per A-read
///
/// Values above the ceiling are clamped to it with a warning.
///
/// # Errors
/// Returns an error if `max_hits` is zero
pub fn validate_max_hits(max_hits: usize) -> Result<usize> {
    if max_hits == 0 {
        return Err(FgovlError::InvalidParameter {
            parameter: "max-hits".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    if max_hits > MAX_HITS_CEILING {
        warn!("--max-hits {max_hits} exceeds the maximum of {MAX_HITS_CEILING}; using {MAX_HITS_CEILING}");
        return Ok(MAX_HITS_CEILING);
    }
    Ok(max_hits)
}

/// Validate the capacity of the per-A-read group table
///
/// # Errors
/// Returns an error if `max_groups` is zero or above the ceiling
pub fn validate_group_capacity(max_groups: usize) -> Result<usize> {
    if max_groups == 0 || max_groups > MAX_GROUPS_CEILING {
        return Err(FgovlError::InvalidParameter {
            parameter: "max-groups".to_string(),
            reason: format!("must be between 1 and {MAX_GROUPS_CEILING}, got {max_groups}"),
        });
    }
    Ok(max_groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::NamedTempFile;

    #[test]
    fn test_validate_file_exists_valid() {
        let file = NamedTempFile::new().unwrap();
        assert!(validate_file_exists(file.path(), "LAS").is_ok());
    }

    #[test]
    fn test_validate_file_exists_invalid() {
        let err = validate_file_exists("/nonexistent/overlaps.las", "LAS").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Invalid LAS file"), "{msg}");
        assert!(msg.contains("File does not exist"), "{msg}");
    }

    #[rstest]
    #[case(1, 1)]
    #[case(400, 400)]
    #[case(2000, 2000)]
    #[case(2001, 2000)]
    #[case(1_000_000, 2000)]
    fn test_validate_max_hits(#[case] requested: usize, #[case] expected: usize) {
        assert_eq!(validate_max_hits(requested).unwrap(), expected);
    }

    #[test]
    fn test_validate_max_hits_zero() {
        let msg = validate_max_hits(0).unwrap_err().to_string();
        assert!(msg.contains("max-hits"), "{msg}");
    }

    #[rstest]
    #[case(1, true)]
    #[case(50_000, true)]
    #[case(1_000_000, true)]
    #[case(0, false)]
    #[case(1_000_001, false)]
    fn test_validate_group_capacity(#[case] max_groups: usize, #[case] ok: bool) {
        assert_eq!(validate_group_capacity(max_groups).is_ok(), ok);
    }
}
