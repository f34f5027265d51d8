//! # Error Types
//!
//! Every fallible operation in the crate returns [`GolResult`]. Size problems are
//! caller errors and are reported before any state is touched; shape problems
//! indicate two components disagreeing about a board's dimensions.

use thiserror::Error;

/// Root error type for board handling, example generation and training.
#[derive(Error, Debug)]
pub enum GolError {
    /// A size parameter (board side, batch size, decay period, ...) was below 1.
    #[error("invalid {what}: {value} (must be at least 1)")]
    InvalidSize { what: &'static str, value: usize },

    /// A flat cell sequence or a grid did not have the expected number of cells.
    #[error("shape mismatch: expected {expected} cells, got {actual}")]
    Shape { expected: usize, actual: usize },

    /// The predictor network only supports two or three dense layers.
    #[error("unsupported layer count {0} (expected 2 or 3)")]
    InvalidLayerCount(usize),

    /// A per-layer bias list did not have one entry per dense layer.
    #[error("bias list has {given} entries for {layers} layers")]
    InvalidLayerBias { layers: usize, given: usize },

    /// A board text file could not be turned into a square grid.
    #[error("invalid board file: {0}")]
    InvalidBoardFile(String),

    /// Tensor data could not be read back into host memory.
    #[error("tensor data error: {0}")]
    Tensor(String),

    /// Configuration could not be loaded or saved.
    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type GolResult<T> = Result<T, GolError>;

/// Rejects sizes below 1.
pub(crate) fn ensure_positive(what: &'static str, value: usize) -> GolResult<()> {
    if value == 0 {
        return Err(GolError::InvalidSize { what, value });
    }
    Ok(())
}
