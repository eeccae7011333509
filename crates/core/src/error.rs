//! Error types for the flowfield core.

use thiserror::Error;

/// Errors produced while configuring, generating, or exporting a flow field.
#[derive(Debug, Error)]
pub enum FlowError {
    /// Width or height was zero when creating a grid or canvas.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// A run configuration value was rejected before the pipeline started.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A zero-length vector was asked to take on a non-zero magnitude.
    ///
    /// `column`/`row` locate the vector-field cell it came from, when known.
    #[error("degenerate vector: cannot rescale a zero-length vector{}", cell_suffix(.column, .row))]
    DegenerateVector {
        column: Option<usize>,
        row: Option<usize>,
    },

    /// Two grids had incompatible dimensions.
    #[error("dimension mismatch: ({lhs_w}, {lhs_h}) vs ({rhs_w}, {rhs_h})")]
    DimensionMismatch {
        lhs_w: usize,
        lhs_h: usize,
        rhs_w: usize,
        rhs_h: usize,
    },

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A composition mode name was not recognized.
    #[error("unknown mode: {0}")]
    UnknownMode(String),

    /// Writing an output artifact failed.
    #[error("i/o error: {0}")]
    Io(String),
}

impl FlowError {
    /// Degenerate-vector error without a known grid cell.
    pub fn degenerate() -> Self {
        FlowError::DegenerateVector {
            column: None,
            row: None,
        }
    }
}

fn cell_suffix(column: &Option<usize>, row: &Option<usize>) -> String {
    match (column, row) {
        (Some(c), Some(r)) => format!(" at cell ({c}, {r})"),
        _ => String::new(),
    }
}
