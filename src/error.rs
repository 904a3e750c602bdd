use thiserror::Error;

/// Errors surfaced by the viewer core.
///
/// Per-field problems (missing columns, text where a number was expected)
/// are never errors: they collapse to the empty sentinel or to `0`.
#[derive(Debug, Error, PartialEq)]
pub enum ViewerError {
    /// The selected file could not be read as a table.
    #[error("failed to load {path}: {reason}")]
    Load { path: String, reason: String },

    /// A normalisation axis was configured with an empty range.
    #[error("invalid axis domain [{min}, {max}]: min and max must differ")]
    Domain { min: f64, max: f64 },

    /// `select` was called with an index outside the current view.
    #[error("index {index} out of range for a view of {len} students")]
    IndexOutOfRange { index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, ViewerError>;
