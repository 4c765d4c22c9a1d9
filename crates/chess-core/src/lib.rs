//! Game records and PGN reading/writing shared by the annotator.

pub mod error;
pub mod game_data;
pub mod pgn;

pub use error::PgnError;
pub use game_data::{AnnotatedGame, Game, GameMove, Headers};
