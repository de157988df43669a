//! Error types for the `lifegrid-world` crate.

/// Errors that can occur during grid operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WorldError {
    /// A coordinate fell outside the grid. Coordinates are never clamped.
    #[error("cell ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        /// Requested column.
        x: usize,
        /// Requested row.
        y: usize,
        /// Grid width.
        width: usize,
        /// Grid height.
        height: usize,
    },

    /// A grid was requested with a zero dimension.
    #[error("grid dimensions must be non-zero, got {width}x{height}")]
    EmptyGrid {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },

    /// Random fill density outside `[0.0, 1.0]`.
    #[error("fill density must be within [0.0, 1.0], got {0}")]
    InvalidDensity(f64),

    /// Arithmetic overflow while sizing or offsetting the grid.
    #[error("arithmetic overflow in grid calculation")]
    ArithmeticOverflow,
}
