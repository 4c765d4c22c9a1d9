//! Stockfish engine wrapper using UCI protocol (async I/O)

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};

use tracing::debug;

use crate::config::EngineSettings;
use crate::engine::{is_white_to_move, Engine, Evaluation, PlayingEngine};
use crate::error::AnnotatorError;

/// Stockfish engine instance with a move-list position cursor
pub struct StockfishEngine {
    process: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    /// Moves from the start position, UCI notation
    moves: Vec<String>,
    depth: u32,
}

impl StockfishEngine {
    /// Spawn a new Stockfish process and initialize UCI
    pub async fn new(settings: &EngineSettings) -> Result<Self, AnnotatorError> {
        let mut process = Command::new(&settings.path)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::null())
            .spawn()
            .map_err(|e| AnnotatorError::Stockfish(format!("Failed to spawn Stockfish: {e}")))?;

        let stdin = process
            .stdin
            .take()
            .ok_or_else(|| AnnotatorError::Stockfish("Stockfish stdin unavailable".into()))?;
        let stdout = BufReader::new(
            process
                .stdout
                .take()
                .ok_or_else(|| AnnotatorError::Stockfish("Stockfish stdout unavailable".into()))?,
        );

        let mut engine = Self {
            process,
            stdin,
            stdout,
            moves: Vec::new(),
            depth: settings.depth,
        };

        // Initialize UCI
        engine.send("uci").await?;
        engine.wait_for("uciok").await?;

        // Configure for analysis
        engine
            .send(&format!("setoption name Threads value {}", settings.threads))
            .await?;
        engine
            .send(&format!("setoption name Hash value {}", settings.hash_mb))
            .await?;
        engine.send("setoption name UCI_AnalyseMode value true").await?;
        engine.send("ucinewgame").await?;
        engine.send("isready").await?;
        engine.wait_for("readyok").await?;

        Ok(engine)
    }

    /// Send a command to Stockfish
    async fn send(&mut self, cmd: &str) -> Result<(), AnnotatorError> {
        debug!(cmd, "SF <");
        self.stdin
            .write_all(format!("{cmd}\n").as_bytes())
            .await
            .map_err(|e| AnnotatorError::Stockfish(format!("Failed to write to Stockfish: {e}")))?;
        self.stdin
            .flush()
            .await
            .map_err(|e| AnnotatorError::Stockfish(format!("Failed to flush stdin: {e}")))?;
        Ok(())
    }

    /// Read one trimmed line; EOF means the process died
    async fn read_line(&mut self) -> Result<String, AnnotatorError> {
        let mut line = String::new();
        let read = self
            .stdout
            .read_line(&mut line)
            .await
            .map_err(|e| AnnotatorError::Stockfish(format!("Failed to read from Stockfish: {e}")))?;
        if read == 0 {
            return Err(AnnotatorError::Stockfish("Stockfish closed its output".into()));
        }
        let trimmed = line.trim().to_string();
        debug!(line = %trimmed, "SF >");
        Ok(trimmed)
    }

    /// Wait for a specific response line
    async fn wait_for(&mut self, expected: &str) -> Result<(), AnnotatorError> {
        loop {
            if self.read_line().await? == expected {
                return Ok(());
            }
        }
    }

    async fn send_position(&mut self) -> Result<(), AnnotatorError> {
        let cmd = position_command(&self.moves);
        self.send(&cmd).await
    }

    /// Search the current position to the configured depth. Returns the last
    /// reported score (engine's side-to-move perspective) and the best move.
    async fn search(&mut self) -> Result<(Option<Evaluation>, String), AnnotatorError> {
        self.send_position().await?;
        self.send(&format!("go depth {}", self.depth)).await?;

        let mut score = None;
        loop {
            let line = self.read_line().await?;
            if line.starts_with("info") && line.contains(" score ") {
                if let Some(cp) = parse_cp(&line) {
                    score = Some(Evaluation::Centipawn(cp));
                }
                if let Some(mate) = parse_mate(&line) {
                    score = Some(Evaluation::Mate(mate));
                }
            } else if line.starts_with("bestmove") {
                let best = line.split_whitespace().nth(1).unwrap_or("(none)").to_string();
                return Ok((score, best));
            }
        }
    }

    /// Send quit command and wait for process to exit
    pub async fn quit(&mut self) {
        let _ = self.send("quit").await;
        let _ = self.process.wait().await;
    }
}

impl Engine for StockfishEngine {
    async fn set_position(&mut self, moves: &[String]) -> Result<(), AnnotatorError> {
        self.moves = moves.to_vec();
        self.send("ucinewgame").await?;
        self.send("isready").await?;
        self.wait_for("readyok").await
    }

    async fn make_moves(&mut self, moves: &[String]) -> Result<(), AnnotatorError> {
        self.moves.extend(moves.iter().cloned());
        Ok(())
    }

    async fn get_evaluation(&mut self) -> Result<Evaluation, AnnotatorError> {
        let white = is_white_to_move(&self.get_fen_position().await?);
        let (score, _) = self.search().await?;
        let score = score.ok_or(AnnotatorError::NoEvaluation)?;
        Ok(to_white_perspective(score, white))
    }

    async fn get_fen_position(&mut self) -> Result<String, AnnotatorError> {
        self.send_position().await?;
        self.send("d").await?;

        let mut fen = None;
        loop {
            let line = self.read_line().await?;
            if let Some(rest) = line.strip_prefix("Fen: ") {
                fen = Some(rest.to_string());
            } else if line.starts_with("Checkers") {
                break;
            }
        }
        fen.ok_or_else(|| AnnotatorError::Stockfish("No FEN in board display".into()))
    }
}

impl PlayingEngine for StockfishEngine {
    async fn best_move(&mut self) -> Result<Option<String>, AnnotatorError> {
        let (_, best) = self.search().await?;
        Ok((best != "(none)").then_some(best))
    }
}

impl Drop for StockfishEngine {
    fn drop(&mut self) {
        // Best-effort synchronous kill in drop
        let _ = self.process.start_kill();
    }
}

fn position_command(moves: &[String]) -> String {
    if moves.is_empty() {
        "position startpos".to_string()
    } else {
        format!("position startpos moves {}", moves.join(" "))
    }
}

/// UCI scores are relative to the side to move; flip for Black.
fn to_white_perspective(score: Evaluation, white_to_move: bool) -> Evaluation {
    let compare = if white_to_move { 1 } else { -1 };
    match score {
        Evaluation::Centipawn(cp) => Evaluation::Centipawn(cp * compare),
        Evaluation::Mate(n) => Evaluation::Mate(n * compare),
    }
}

/// Parse centipawn score from info line
fn parse_cp(line: &str) -> Option<i32> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    for (i, part) in parts.iter().enumerate() {
        if *part == "cp" && i + 1 < parts.len() {
            return parts[i + 1].parse().ok();
        }
    }
    None
}

/// Parse mate score from info line
fn parse_mate(line: &str) -> Option<i32> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    for (i, part) in parts.iter().enumerate() {
        if *part == "mate" && i + 1 < parts.len() {
            return parts[i + 1].parse().ok();
        }
    }
    None
}
