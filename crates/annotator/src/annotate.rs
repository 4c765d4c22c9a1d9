//! Whole-game annotation: evaluate, aggregate per side, write

use chess_core::{AnnotatedGame, Game};
use serde::Serialize;
use tracing::info;

use crate::accuracy::harmonic_mean;
use crate::engine::Engine;
use crate::error::AnnotatorError;
use crate::evaluator::{evaluate_game, EvaluatedMove};
use crate::writer::write_annotated;

/// Header carrying White's accuracy. The prefix sorts it after standard tags.
pub const WHITE_ACCURACY_HEADER: &str = "ZAWhiteAccuracy";
/// Header carrying Black's accuracy.
pub const BLACK_ACCURACY_HEADER: &str = "ZBBlackAccuracy";

/// Harmonic-mean accuracy per side, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AccuracySummary {
    pub white: f64,
    pub black: f64,
}

/// Result of annotating one game.
#[derive(Debug, Clone, Serialize)]
pub struct Annotation {
    pub game: AnnotatedGame,
    pub moves: Vec<EvaluatedMove>,
    pub summary: AccuracySummary,
}

/// Split by ply parity (even = White) and aggregate each side.
pub fn summarize(moves: &[EvaluatedMove]) -> AccuracySummary {
    let (white, black): (Vec<(usize, &EvaluatedMove)>, Vec<(usize, &EvaluatedMove)>) = moves
        .iter()
        .enumerate()
        .partition(|(ply, _)| EvaluatedMove::is_white(*ply));

    let side_mean = |side: Vec<(usize, &EvaluatedMove)>| {
        let accuracies: Vec<f64> = side.iter().map(|(_, m)| m.accuracy).collect();
        harmonic_mean(&accuracies)
    };

    AccuracySummary {
        white: side_mean(white),
        black: side_mean(black),
    }
}

/// `0.953` -> `"95.3%"`
pub fn format_percent(accuracy: f64) -> String {
    format!("{:.1}%", accuracy * 100.0)
}

/// Render a run's annotations as a single JSON array.
pub fn annotations_json(annotations: &[Annotation]) -> Result<String, AnnotatorError> {
    Ok(serde_json::to_string_pretty(annotations)?)
}

/// Annotate a game's mainline. The engine must be at the start position.
pub async fn annotate_game<E: Engine>(
    engine: &mut E,
    game: &Game,
) -> Result<Annotation, AnnotatorError> {
    if game.mainline().is_empty() {
        return Err(AnnotatorError::EmptyGame);
    }

    let moves = evaluate_game(engine, game.mainline()).await?;
    let summary = summarize(&moves);

    let mut annotated = write_annotated(&moves, game.headers.clone());
    annotated
        .headers
        .set(WHITE_ACCURACY_HEADER, format_percent(summary.white));
    annotated
        .headers
        .set(BLACK_ACCURACY_HEADER, format_percent(summary.black));

    info!(
        plies = moves.len(),
        white_accuracy = summary.white,
        black_accuracy = summary.black,
        "Game annotated"
    );

    Ok(Annotation {
        game: annotated,
        moves,
        summary,
    })
}
