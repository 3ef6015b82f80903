//! Custom error types for fgovl operations.

use thiserror::Error;

/// Result type alias for fgovl operations
pub type Result<T> = std::result::Result<T, FgovlError>;

/// Error type for fgovl operations
#[derive(Error, Debug)]
pub enum FgovlError {
    /// Invalid parameter value provided
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// The parameter name
        parameter: String,
        /// Explanation of why it's invalid
        reason: String,
    },

    /// File format error
    #[error("Invalid {file_type} file '{path}': {reason}")]
    InvalidFileFormat {
        /// Type of file (e.g., "LAS", "DB index")
        file_type: String,
        /// Path to the file
        path: String,
        /// Explanation of the problem
        reason: String,
    },

    /// A read index that does not exist in the database
    #[error("Read index {index} is out of range for database '{db}' with {nreads} reads")]
    ReadIndexOutOfRange {
        /// The requested (0-based) read index
        index: usize,
        /// Number of reads in the database
        nreads: usize,
        /// Database path
        db: String,
    },

    /// Read-index ranges that are not sorted, merged and non-empty
    #[error("Invalid read ranges: {reason}")]
    InvalidRanges {
        /// Explanation of the problem
        reason: String,
    },
}
