//! Rebuild the mainline with classification comments attached

use chess_core::{AnnotatedGame, GameMove, Headers};

use crate::evaluator::EvaluatedMove;

/// Accuracy below this is a blunder.
const THRESHOLD_BLUNDER: f64 = 0.5;
/// Accuracy below this (and not a blunder) is a mistake.
const THRESHOLD_MISTAKE: f64 = 0.7;

/// Separator between a move's original comment and its classification
const COMMENT_SEPARATOR: &str = ";    ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveLabel {
    Mistake,
    Blunder,
}

impl MoveLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mistake => "Mistake",
            Self::Blunder => "Blunder",
        }
    }
}

/// Exclusive bands: [0, 0.5) blunder, [0.5, 0.7) mistake, else unlabeled.
pub fn classify(accuracy: f64) -> Option<MoveLabel> {
    if accuracy < THRESHOLD_BLUNDER {
        Some(MoveLabel::Blunder)
    } else if accuracy < THRESHOLD_MISTAKE {
        Some(MoveLabel::Mistake)
    } else {
        None
    }
}

/// Classification comment for a move, e.g. `"Mistake; Accuracy: 63%"`.
pub fn classification_comment(accuracy: f64) -> Option<String> {
    classify(accuracy)
        .map(|label| format!("{}; Accuracy: {:.0}%", label.as_str(), accuracy * 100.0))
}

fn combine_comment(original: Option<&str>, added: Option<String>) -> Option<String> {
    match (original, added) {
        (Some(original), Some(added)) => Some(format!("{original}{COMMENT_SEPARATOR}{added}")),
        (Some(original), None) => Some(original.to_string()),
        (None, added) => added,
    }
}

/// Build the output game: the given headers plus one mainline node per
/// evaluated move, in order, with combined comments.
pub fn write_annotated(moves: &[EvaluatedMove], headers: Headers) -> AnnotatedGame {
    let mut game = AnnotatedGame::new(headers);
    for mv in moves {
        game.add_main_move(GameMove {
            san: mv.san.clone(),
            uci: mv.uci.clone(),
            comment: combine_comment(mv.comment.as_deref(), classification_comment(mv.accuracy)),
        });
    }
    game
}
