//! Engine interface used by the annotation pipeline

use serde::{Deserialize, Serialize};

use crate::error::AnnotatorError;

/// Position score reported by the engine, from White's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Evaluation {
    /// Score in hundredths of a pawn
    #[serde(rename = "cp")]
    Centipawn(i32),
    /// Forced mate in N moves (0 = the side to move is mated)
    #[serde(rename = "mate")]
    Mate(i32),
}

/// A stateful engine handle with a position cursor.
///
/// Calls mutate the handle's position, so one handle must serve one game at
/// a time and every call is awaited before the next one is issued.
#[allow(async_fn_in_trait)]
pub trait Engine {
    /// Reset to the start position followed by `moves` (UCI notation).
    async fn set_position(&mut self, moves: &[String]) -> Result<(), AnnotatorError>;

    /// Append `moves` (UCI notation) to the current position.
    async fn make_moves(&mut self, moves: &[String]) -> Result<(), AnnotatorError>;

    /// Evaluate the current position.
    async fn get_evaluation(&mut self) -> Result<Evaluation, AnnotatorError>;

    /// FEN of the current position.
    async fn get_fen_position(&mut self) -> Result<String, AnnotatorError>;
}

/// An engine that can also choose moves, for self-play.
#[allow(async_fn_in_trait)]
pub trait PlayingEngine: Engine {
    /// Best move in UCI notation, or `None` when the game is over.
    async fn best_move(&mut self) -> Result<Option<String>, AnnotatorError>;
}

/// True if the FEN's side-to-move field is White.
pub fn is_white_to_move(fen: &str) -> bool {
    fen.split(' ').nth(1) == Some("w")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_to_move_from_fen() {
        assert!(is_white_to_move(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
        ));
        assert!(!is_white_to_move(
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1"
        ));
        assert!(!is_white_to_move("garbage"));
    }

    #[test]
    fn test_evaluation_json_shape() {
        let json = serde_json::to_string(&Evaluation::Centipawn(35)).unwrap();
        assert_eq!(json, r#"{"type":"cp","value":35}"#);
        let json = serde_json::to_string(&Evaluation::Mate(-3)).unwrap();
        assert_eq!(json, r#"{"type":"mate","value":-3}"#);
    }
}
