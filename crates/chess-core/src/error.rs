use thiserror::Error;

#[derive(Error, Debug)]
pub enum PgnError {
    #[error("No games found in PGN input")]
    Empty,

    #[error("Failed to read PGN: {0}")]
    Read(#[from] std::io::Error),

    #[error("Illegal move '{san}' at ply {ply}")]
    IllegalMove { san: String, ply: usize },

    #[error("Illegal UCI move '{uci}' at ply {ply}")]
    IllegalUci { uci: String, ply: usize },

    #[error("Unsupported start position: {0}")]
    UnsupportedStart(String),
}
