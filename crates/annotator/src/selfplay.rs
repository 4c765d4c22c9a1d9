//! Engine self-play: generate a game for the annotator from the start position

use std::collections::HashMap;

use chess_core::{Game, Headers};
use chrono::Utc;
use shakmaty::fen::Fen;
use shakmaty::{CastlingMode, Chess, Color, Position};
use tracing::info;

use crate::engine::PlayingEngine;
use crate::error::AnnotatorError;

/// PGN date tag layout.
const PGN_DATE_FORMAT: &str = "%Y.%m.%d";

/// Occurrences of one placement that end the game.
const REPETITION_LIMIT: u32 = 3;

/// Why self-play stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    InsufficientMaterial,
    Repetition,
    /// Engine had no move: checkmate or stalemate
    NoLegalMoves,
    MoveLimit,
}

impl Termination {
    pub fn description(&self) -> &'static str {
        match self {
            Self::InsufficientMaterial => "Insufficient material",
            Self::Repetition => "Draw by repetition",
            Self::NoLegalMoves => "No legal moves",
            Self::MoveLimit => "Move limit reached",
        }
    }
}

fn parse_position(fen: &str) -> Result<Chess, AnnotatorError> {
    let setup: Fen = fen
        .parse()
        .map_err(|e| AnnotatorError::Stockfish(format!("Invalid FEN '{fen}': {e}")))?;
    setup
        .into_position(CastlingMode::Standard)
        .map_err(|e| AnnotatorError::Stockfish(format!("Invalid position '{fen}': {e}")))
}

fn result_token(termination: Termination, final_pos: &Chess) -> &'static str {
    match termination {
        Termination::InsufficientMaterial | Termination::Repetition => "1/2-1/2",
        Termination::NoLegalMoves if final_pos.is_checkmate() => match final_pos.turn() {
            Color::White => "0-1",
            Color::Black => "1-0",
        },
        Termination::NoLegalMoves => "1/2-1/2",
        Termination::MoveLimit => "*",
    }
}

/// Let the engine play itself until the game ends or `max_plies` moves were
/// made. Leaves the engine at the final position; reset it before annotating.
pub async fn play_game<E: PlayingEngine>(
    engine: &mut E,
    max_plies: usize,
    label: &str,
) -> Result<Game, AnnotatorError> {
    engine.set_position(&[]).await?;

    let mut moves: Vec<String> = Vec::new();
    let mut placements: HashMap<String, u32> = HashMap::new();

    let (termination, final_pos) = loop {
        let fen = engine.get_fen_position().await?;
        let pos = parse_position(&fen)?;

        if pos.is_insufficient_material() {
            break (Termination::InsufficientMaterial, pos);
        }

        let placement = fen.split(' ').next().unwrap_or_default().to_string();
        let seen = placements.entry(placement).or_insert(0);
        *seen += 1;
        if *seen == REPETITION_LIMIT {
            break (Termination::Repetition, pos);
        }

        if moves.len() >= max_plies {
            break (Termination::MoveLimit, pos);
        }

        match engine.best_move().await? {
            Some(mv) => {
                engine.make_moves(std::slice::from_ref(&mv)).await?;
                moves.push(mv);
            }
            None => break (Termination::NoLegalMoves, pos),
        }
    };

    info!(
        plies = moves.len(),
        termination = termination.description(),
        "Self-play finished"
    );

    let player = format!("Stockfish {label}");
    let mut headers = Headers::new();
    headers.set("Event", "Self-play");
    headers.set("Date", Utc::now().format(PGN_DATE_FORMAT).to_string());
    headers.set("White", player.clone());
    headers.set("Black", player);
    headers.set("Result", result_token(termination, &final_pos));
    headers.set("Termination", termination.description());

    Ok(Game::from_uci_moves(headers, &moves)?)
}
