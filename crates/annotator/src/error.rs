//! Annotator error types

use chess_core::PgnError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnnotatorError {
    #[error("Configuration error: {0}")]
    Config(&'static str),

    #[error("Stockfish error: {0}")]
    Stockfish(String),

    #[error("Engine returned no evaluation for the current position")]
    NoEvaluation,

    #[error("Side to move does not match ply {ply} (expected white: {expected_white})")]
    ParityViolation { ply: usize, expected_white: bool },

    #[error("Game has no moves to annotate")]
    EmptyGame,

    #[error("PGN error: {0}")]
    Pgn(#[from] PgnError),

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
