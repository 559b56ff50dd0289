//! Engine error types

/// Errors surfaced by the engine to its caller
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("no legal move: the board has no free cell")]
    NoLegalMove,

    #[error("move {row},{col} is outside the {size}x{size} board")]
    OutOfBounds { row: usize, col: usize, size: usize },

    #[error("cell {row},{col} is already occupied")]
    Occupied { row: usize, col: usize },

    #[error("invalid board: {0}")]
    InvalidBoard(String),

    #[error("color must be red or blue")]
    NoPlayerColor,
}
