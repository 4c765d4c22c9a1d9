//! Engine-backed accuracy annotation for PGN games.

pub mod accuracy;
pub mod annotate;
pub mod config;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod selfplay;
pub mod source;
pub mod stockfish;
pub mod writer;

#[cfg(test)]
mod testing;

pub use annotate::{annotate_game, AccuracySummary, Annotation};
pub use engine::{Engine, Evaluation, PlayingEngine};
pub use error::AnnotatorError;
pub use evaluator::EvaluatedMove;
