//! Error types for the `siege-world` crate.

/// Errors that can occur when building the grid.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// A grid dimension was zero.
    #[error("grid dimensions must be non-zero, got {width}x{height}")]
    EmptyGrid {
        /// Requested number of columns.
        width: u32,
        /// Requested number of rows.
        height: u32,
    },
}
