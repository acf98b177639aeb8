#![forbid(unsafe_code)]

//! Contract violations raised by the layout model.
//!
//! Every error is raised before any state is touched: a failed call leaves
//! runs, lines and caches exactly as they were.

use yawe_style::FontError;

/// Errors raised by run, line and cache operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// A character index outside `0..=len` (or `0..len` where a character
    /// must exist at the index).
    #[error("[{operation}] index {index} not valid for length {len}")]
    Index {
        operation: &'static str,
        index: usize,
        len: usize,
    },
    /// A range end past the end of the run.
    #[error("[{operation}] end {end} too high for length {len}")]
    RangeEnd {
        operation: &'static str,
        end: usize,
        len: usize,
    },
    /// A range whose start is larger than its end.
    #[error("[{operation}] start {start} can't be larger than end {end}")]
    RangeOrder {
        operation: &'static str,
        start: usize,
        end: usize,
    },
    /// A line-global character position past the end of the line.
    #[error("[{operation}] position {position} invalid for line length {len}")]
    Position {
        operation: &'static str,
        position: usize,
        len: usize,
    },
    /// A required argument was not supplied.
    #[error("[{operation}] missing argument `{argument}`")]
    MissingArgument {
        operation: &'static str,
        argument: &'static str,
    },
    /// A font descriptor failed validation.
    #[error(transparent)]
    InvalidFont(#[from] FontError),
}

/// Convenient result alias for layout operations.
pub type Result<T> = std::result::Result<T, LayoutError>;
