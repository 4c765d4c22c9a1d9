use serde::{Deserialize, Serialize};
use shakmaty::{san::SanPlus, uci::UciMove, CastlingMode, Chess};

use crate::error::PgnError;

/// Tags exported first, in this order, by every PGN writer.
pub const SEVEN_TAG_ROSTER: [&str; 7] = ["Event", "Site", "Date", "Round", "White", "Black", "Result"];

/// Ordered PGN tag pairs. Setting an existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Tag pairs in export order: the Seven Tag Roster first (missing
    /// roster tags get their PGN placeholder), then every other tag in the
    /// order it was inserted.
    pub fn export_order(&self) -> Vec<(&str, &str)> {
        let mut out: Vec<(&str, &str)> = SEVEN_TAG_ROSTER
            .iter()
            .map(|&key| {
                let placeholder = match key {
                    "Result" => "*",
                    "Date" => "????.??.??",
                    _ => "?",
                };
                (key, self.get(key).unwrap_or(placeholder))
            })
            .collect();

        out.extend(
            self.iter()
                .filter(|(k, _)| !SEVEN_TAG_ROSTER.contains(k)),
        );
        out
    }
}

impl FromIterator<(String, String)> for Headers {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (k, v) in iter {
            headers.set(k, v);
        }
        headers
    }
}

/// One mainline move: SAN for output, UCI for the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameMove {
    pub san: String,
    pub uci: String,
    pub comment: Option<String>,
}

/// A parsed game: tag pairs plus the mainline from the standard start position.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Game {
    pub headers: Headers,
    pub moves: Vec<GameMove>,
}

impl Game {
    pub fn mainline(&self) -> &[GameMove] {
        &self.moves
    }

    /// Build a game from engine (UCI) moves, computing SAN on the way.
    pub fn from_uci_moves(headers: Headers, uci_moves: &[String]) -> Result<Self, PgnError> {
        let mut pos = Chess::default();
        let mut moves = Vec::with_capacity(uci_moves.len());

        for (ply, uci_str) in uci_moves.iter().enumerate() {
            let illegal = || PgnError::IllegalUci {
                uci: uci_str.clone(),
                ply,
            };
            let uci: UciMove = uci_str.parse().map_err(|_| illegal())?;
            let mv = uci.to_move(&pos).map_err(|_| illegal())?;
            let san = SanPlus::from_move_and_play_unchecked(&mut pos, mv.clone()).to_string();
            moves.push(GameMove {
                san,
                uci: mv.to_uci(CastlingMode::Standard).to_string(),
                comment: None,
            });
        }

        Ok(Self { headers, moves })
    }
}

/// Output game: headers plus the mainline with comments attached.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnnotatedGame {
    pub headers: Headers,
    pub mainline: Vec<GameMove>,
}

impl AnnotatedGame {
    pub fn new(headers: Headers) -> Self {
        Self {
            headers,
            mainline: Vec::new(),
        }
    }

    /// Append the next mainline move and return it for comment edits.
    pub fn add_main_move(&mut self, mv: GameMove) -> &mut GameMove {
        self.mainline.push(mv);
        let last = self.mainline.len() - 1;
        &mut self.mainline[last]
    }

    pub fn result(&self) -> &str {
        self.headers.get("Result").unwrap_or("*")
    }
}
