//! Scripted in-memory engine for unit tests

use chess_core::{pgn, GameMove};
use shakmaty::fen::Fen;
use shakmaty::uci::UciMove;
use shakmaty::{Chess, EnPassantMode, Position};

use crate::engine::{Engine, Evaluation, PlayingEngine};
use crate::error::AnnotatorError;

/// Mainline moves of a movetext snippet.
pub fn game_moves(movetext: &str) -> Vec<GameMove> {
    pgn::parse_pgn(movetext).unwrap().moves
}

/// Replays moves on a real board so FENs are genuine; evaluations are
/// looked up by ply and best moves are popped from a script.
pub struct ScriptedEngine {
    pos: Chess,
    played: Vec<String>,
    evals: Vec<Evaluation>,
    best_moves: Vec<String>,
    black_first: bool,
}

impl ScriptedEngine {
    pub fn new(evals: Vec<Evaluation>) -> Self {
        Self {
            pos: Chess::default(),
            played: Vec::new(),
            evals,
            best_moves: Vec::new(),
            black_first: false,
        }
    }

    pub fn with_best_moves(mut self, moves: &[&str]) -> Self {
        self.best_moves = moves.iter().rev().map(|m| m.to_string()).collect();
        self
    }

    /// Report the opposite side to move in every FEN.
    pub fn black_first(mut self) -> Self {
        self.black_first = true;
        self
    }

    pub fn played(&self) -> &[String] {
        &self.played
    }

    fn play(&mut self, uci: &str) -> Result<(), AnnotatorError> {
        let mv = uci
            .parse::<UciMove>()
            .ok()
            .and_then(|u| u.to_move(&self.pos).ok())
            .ok_or_else(|| AnnotatorError::Stockfish(format!("illegal move {uci}")))?;
        self.pos.play_unchecked(mv);
        self.played.push(uci.to_string());
        Ok(())
    }
}

impl Engine for ScriptedEngine {
    async fn set_position(&mut self, moves: &[String]) -> Result<(), AnnotatorError> {
        self.pos = Chess::default();
        self.played.clear();
        for mv in moves {
            self.play(mv)?;
        }
        Ok(())
    }

    async fn make_moves(&mut self, moves: &[String]) -> Result<(), AnnotatorError> {
        for mv in moves {
            self.play(mv)?;
        }
        Ok(())
    }

    async fn get_evaluation(&mut self) -> Result<Evaluation, AnnotatorError> {
        self.evals
            .get(self.played.len())
            .copied()
            .ok_or(AnnotatorError::NoEvaluation)
    }

    async fn get_fen_position(&mut self) -> Result<String, AnnotatorError> {
        let fen = Fen::from_position(&self.pos, EnPassantMode::Legal).to_string();
        if !self.black_first {
            return Ok(fen);
        }
        let mut fields: Vec<String> = fen.split(' ').map(str::to_string).collect();
        fields[1] = if fields[1] == "w" { "b".into() } else { "w".into() };
        Ok(fields.join(" "))
    }
}

impl PlayingEngine for ScriptedEngine {
    async fn best_move(&mut self) -> Result<Option<String>, AnnotatorError> {
        Ok(self.best_moves.pop())
    }
}
