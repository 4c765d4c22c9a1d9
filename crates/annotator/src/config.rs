//! Annotator configuration from environment variables and CLI overrides

use std::env;
use std::path::PathBuf;

use tracing::info;

use crate::error::AnnotatorError;

/// How to launch and drive the engine.
#[derive(Clone, Debug)]
pub struct EngineSettings {
    /// Path to Stockfish binary
    pub path: String,

    /// Search depth per position
    pub depth: u32,

    /// Engine search threads
    pub threads: u32,

    /// Transposition table size in MB
    pub hash_mb: u32,
}

impl EngineSettings {
    /// Read settings through `lookup` (normally `std::env::var`), falling
    /// back to defaults for anything unset or unparsable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let number = |key: &str, default: u32| {
            lookup(key)
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        };

        Self {
            path: lookup("STOCKFISH_PATH").unwrap_or_else(|| "/stockfish/stockfish".to_string()),
            depth: number("STOCKFISH_DEPTH", 15),
            threads: number("STOCKFISH_THREADS", 4),
            hash_mb: number("STOCKFISH_HASH_MB", 1536),
        }
    }
}

/// Where games come from.
#[derive(Clone, Debug, PartialEq)]
pub enum GameSource {
    File(PathBuf),
    Url(String),
    SelfPlay { max_plies: usize, label: String },
}

/// Values given on the command line; `None` keeps the environment value.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub file: Option<PathBuf>,
    pub url: Option<String>,
    pub self_play: bool,
    pub max_plies: usize,
    pub player_label: Option<String>,
    pub stockfish_path: Option<String>,
    pub depth: Option<u32>,
    pub threads: Option<u32>,
    pub hash_mb: Option<u32>,
    pub json: bool,
}

#[derive(Clone, Debug)]
pub struct AnnotatorConfig {
    pub engine: EngineSettings,
    pub source: GameSource,
    /// Print evaluated moves as JSON instead of PGN
    pub json: bool,
}

impl AnnotatorConfig {
    /// Load configuration from environment variables, then apply CLI overrides.
    pub fn load(overrides: ConfigOverrides) -> Result<Self, AnnotatorError> {
        Self::from_parts(EngineSettings::from_lookup(|k| env::var(k).ok()), overrides)
    }

    pub fn from_parts(
        mut engine: EngineSettings,
        overrides: ConfigOverrides,
    ) -> Result<Self, AnnotatorError> {
        if let Some(path) = overrides.stockfish_path {
            engine.path = path;
        }
        if let Some(depth) = overrides.depth {
            engine.depth = depth;
        }
        if let Some(threads) = overrides.threads {
            engine.threads = threads;
        }
        if let Some(hash_mb) = overrides.hash_mb {
            engine.hash_mb = hash_mb;
        }
        if engine.depth == 0 {
            return Err(AnnotatorError::Config("search depth must be at least 1"));
        }

        let source = match (overrides.file, overrides.url, overrides.self_play) {
            (Some(path), None, false) => GameSource::File(path),
            (None, Some(url), false) => GameSource::Url(url),
            (None, None, true) => GameSource::SelfPlay {
                max_plies: overrides.max_plies,
                label: overrides
                    .player_label
                    .unwrap_or_else(|| format!("depth {}", engine.depth)),
            },
            (None, None, false) => {
                return Err(AnnotatorError::Config(
                    "one of --file, --url or --self-play is required",
                ))
            }
            _ => {
                return Err(AnnotatorError::Config(
                    "--file, --url and --self-play are mutually exclusive",
                ))
            }
        };

        info!(
            stockfish_path = %engine.path,
            depth = engine.depth,
            threads = engine.threads,
            hash_mb = engine.hash_mb,
            "Annotator config loaded"
        );

        Ok(Self {
            engine,
            source,
            json: overrides.json,
        })
    }
}
