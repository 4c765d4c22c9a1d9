use annotator::{AnnotatorError, Engine, Evaluation};
use chess_core::{pgn, Game};

/// Engine stand-in: evaluations are scripted per ply and the side to move
/// follows ply parity.
pub struct FakeEngine {
    evals: Vec<Evaluation>,
    moves: Vec<String>,
    pub resets: usize,
}

impl FakeEngine {
    pub fn new(evals: Vec<Evaluation>) -> Self {
        Self {
            evals,
            moves: Vec::new(),
            resets: 0,
        }
    }

    pub fn centipawns(values: &[i32]) -> Self {
        Self::new(values.iter().map(|cp| Evaluation::Centipawn(*cp)).collect())
    }

    pub fn moves(&self) -> &[String] {
        &self.moves
    }
}

impl Engine for FakeEngine {
    async fn set_position(&mut self, moves: &[String]) -> Result<(), AnnotatorError> {
        self.moves = moves.to_vec();
        self.resets += 1;
        Ok(())
    }

    async fn make_moves(&mut self, moves: &[String]) -> Result<(), AnnotatorError> {
        self.moves.extend(moves.iter().cloned());
        Ok(())
    }

    async fn get_evaluation(&mut self) -> Result<Evaluation, AnnotatorError> {
        self.evals
            .get(self.moves.len())
            .copied()
            .ok_or(AnnotatorError::NoEvaluation)
    }

    async fn get_fen_position(&mut self) -> Result<String, AnnotatorError> {
        let side = if self.moves.len() % 2 == 0 { "w" } else { "b" };
        Ok(format!("8/8/8/8/8/8/8/8 {side} - - 0 1"))
    }
}

/// Parse a single game, panicking on bad test input.
pub fn game(text: &str) -> Game {
    pgn::parse_pgn(text).expect("invalid test PGN")
}

/// Parse a "95.3%" header value.
pub fn percent(value: &str) -> f64 {
    value
        .trim_end_matches('%')
        .parse()
        .expect("not a percentage")
}
