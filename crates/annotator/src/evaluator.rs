//! Per-move engine evaluation along a game's mainline

use chess_core::GameMove;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::accuracy::{move_accuracy, win_probability};
use crate::engine::{is_white_to_move, Engine, Evaluation};
use crate::error::AnnotatorError;

/// A mainline move with the engine's verdict on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatedMove {
    pub san: String,
    pub uci: String,
    /// Comment carried over from the source game
    pub comment: Option<String>,
    /// Evaluation of the position after the move
    pub evaluation: Evaluation,
    /// In (0, 1]; 1 means the move kept the win probability unchanged
    pub accuracy: f64,
}

impl EvaluatedMove {
    pub fn centipawn(&self) -> Option<i32> {
        match self.evaluation {
            Evaluation::Centipawn(cp) => Some(cp),
            Evaluation::Mate(_) => None,
        }
    }

    pub fn mate(&self) -> Option<i32> {
        match self.evaluation {
            Evaluation::Mate(n) => Some(n),
            Evaluation::Centipawn(_) => None,
        }
    }

    pub fn is_white(ply: usize) -> bool {
        ply % 2 == 0
    }
}

/// Evaluate one move: score the position, play the move, score again and
/// turn the win-probability swing for the mover into an accuracy.
pub async fn evaluate_move<E: Engine>(
    engine: &mut E,
    ply: usize,
    mv: &GameMove,
) -> Result<EvaluatedMove, AnnotatorError> {
    let old_eval = engine.get_evaluation().await?;
    let turn = is_white_to_move(&engine.get_fen_position().await?);
    if turn != EvaluatedMove::is_white(ply) {
        return Err(AnnotatorError::ParityViolation {
            ply,
            expected_white: EvaluatedMove::is_white(ply),
        });
    }

    engine.make_moves(std::slice::from_ref(&mv.uci)).await?;
    let new_eval = engine.get_evaluation().await?;

    let old_win = win_probability(&old_eval, turn);
    let new_win = win_probability(&new_eval, turn);
    let accuracy = move_accuracy((old_win - new_win).abs());

    debug!(
        ply,
        san = %mv.san,
        ?old_eval,
        ?new_eval,
        accuracy,
        "Evaluated move"
    );

    Ok(EvaluatedMove {
        san: mv.san.clone(),
        uci: mv.uci.clone(),
        comment: mv.comment.clone().filter(|c| !c.is_empty()),
        evaluation: new_eval,
        accuracy,
    })
}

/// Evaluate every mainline move in order. The engine must be positioned at
/// the game's start; it is left at the final position.
pub async fn evaluate_game<E: Engine>(
    engine: &mut E,
    mainline: &[GameMove],
) -> Result<Vec<EvaluatedMove>, AnnotatorError> {
    let mut evaluated = Vec::with_capacity(mainline.len());
    for (ply, mv) in mainline.iter().enumerate() {
        evaluated.push(evaluate_move(engine, ply, mv).await?);
    }
    Ok(evaluated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accuracy::win;
    use crate::testing::{game_moves, ScriptedEngine};

    #[tokio::test]
    async fn test_evaluate_game_threads_position() {
        let moves = game_moves("1. e4 e5 2. Nf3 Nc6");
        let mut engine = ScriptedEngine::new(vec![
            Evaluation::Centipawn(20),
            Evaluation::Centipawn(25),
            Evaluation::Centipawn(10),
            Evaluation::Centipawn(15),
            Evaluation::Mate(3),
        ]);

        let evaluated = evaluate_game(&mut engine, &moves).await.unwrap();
        assert_eq!(evaluated.len(), 4);
        assert_eq!(engine.played(), &["e2e4", "e7e5", "g1f3", "b8c6"]);

        assert_eq!(evaluated[0].centipawn(), Some(25));
        assert_eq!(evaluated[0].mate(), None);
        assert_eq!(evaluated[3].centipawn(), None);
        assert_eq!(evaluated[3].mate(), Some(3));

        // Black's move (ply 1) is scored from Black's side
        let expected = move_accuracy((win(25.0, false) - win(10.0, false)).abs());
        assert!((evaluated[1].accuracy - expected).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_keeps_existing_comment() {
        let mut moves = game_moves("1. e4 e5");
        moves[0].comment = Some("Interesting".into());
        moves[1].comment = Some(String::new());
        let mut engine = ScriptedEngine::new(vec![Evaluation::Centipawn(0); 3]);

        let evaluated = evaluate_game(&mut engine, &moves).await.unwrap();
        assert_eq!(evaluated[0].comment.as_deref(), Some("Interesting"));
        assert_eq!(evaluated[1].comment, None);
        assert!((evaluated[0].accuracy - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn test_missing_evaluation_is_fatal() {
        let moves = game_moves("1. e4 e5");
        let mut engine = ScriptedEngine::new(vec![Evaluation::Centipawn(0); 2]);

        let result = evaluate_game(&mut engine, &moves).await;
        assert!(matches!(result, Err(AnnotatorError::NoEvaluation)));
    }

    #[tokio::test]
    async fn test_parity_violation_is_fatal() {
        let moves = game_moves("1. e4 e5");
        let mut engine = ScriptedEngine::new(vec![Evaluation::Centipawn(0); 3]).black_first();

        let result = evaluate_game(&mut engine, &moves).await;
        assert!(matches!(
            result,
            Err(AnnotatorError::ParityViolation { ply: 0, expected_white: true })
        ));
        assert!(engine.played().is_empty());
    }
}
