//! PGN parsing and writing. Reading goes through `pgn_reader` with
//! shakmaty resolving mainline SAN to UCI.

use std::ops::ControlFlow;

use pgn_reader::{RawComment, RawTag, Reader, SanPlus, Skip, Visitor};
use shakmaty::{CastlingMode, Chess, Position};

use crate::error::PgnError;
use crate::game_data::{AnnotatedGame, Game, GameMove, Headers};

const STANDARD_START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Export line width used by `write_pgn`.
const LINE_WIDTH: usize = 80;

/// Mainline state for the game currently being read.
struct Mainline {
    headers: Headers,
    board: Chess,
    moves: Vec<GameMove>,
    error: Option<PgnError>,
}

/// Collects tags, mainline moves and comments; variations are skipped.
struct GameCollector;

impl Visitor for GameCollector {
    type Tags = Headers;
    type Movetext = Mainline;
    type Output = Result<Game, PgnError>;

    fn begin_tags(&mut self) -> ControlFlow<Self::Output, Headers> {
        ControlFlow::Continue(Headers::new())
    }

    fn tag(
        &mut self,
        tags: &mut Headers,
        name: &[u8],
        value: RawTag<'_>,
    ) -> ControlFlow<Self::Output> {
        tags.set(String::from_utf8_lossy(name), value.decode_utf8_lossy());
        ControlFlow::Continue(())
    }

    fn begin_movetext(&mut self, headers: Headers) -> ControlFlow<Self::Output, Mainline> {
        // Filter non-standard positions
        if headers.get("SetUp") == Some("1") {
            if let Some(fen) = headers.get("FEN") {
                if fen != STANDARD_START_FEN {
                    return ControlFlow::Break(Err(PgnError::UnsupportedStart(fen.to_string())));
                }
            }
        }

        ControlFlow::Continue(Mainline {
            headers,
            board: Chess::default(),
            moves: Vec::new(),
            error: None,
        })
    }

    fn san(&mut self, state: &mut Mainline, san_plus: SanPlus) -> ControlFlow<Self::Output> {
        if state.error.is_some() {
            return ControlFlow::Continue(());
        }

        let ply = state.moves.len();
        match san_plus.san.to_move(&state.board) {
            Ok(mv) => {
                state.moves.push(GameMove {
                    san: san_plus.to_string(),
                    uci: mv.to_uci(CastlingMode::Standard).to_string(),
                    comment: None,
                });
                state.board.play_unchecked(mv);
            }
            Err(_) => {
                state.error = Some(PgnError::IllegalMove {
                    san: san_plus.to_string(),
                    ply,
                });
            }
        }
        ControlFlow::Continue(())
    }

    fn comment(
        &mut self,
        state: &mut Mainline,
        comment: RawComment<'_>,
    ) -> ControlFlow<Self::Output> {
        let text = String::from_utf8_lossy(comment.as_bytes());
        let text = text.trim();
        if let (Some(last), false) = (state.moves.last_mut(), text.is_empty()) {
            last.comment = Some(match last.comment.take() {
                Some(existing) => format!("{existing} {text}"),
                None => text.to_string(),
            });
        }
        ControlFlow::Continue(())
    }

    fn begin_variation(&mut self, _: &mut Mainline) -> ControlFlow<Self::Output, Skip> {
        ControlFlow::Continue(Skip(true))
    }

    fn end_game(&mut self, state: Mainline) -> Self::Output {
        match state.error {
            Some(err) => Err(err),
            None => Ok(Game {
                headers: state.headers,
                moves: state.moves,
            }),
        }
    }
}

/// Read every game in a PGN text. Each game carries its own result so one
/// bad game does not discard the rest; only an input without any game is
/// an error for the whole text.
pub fn parse_games(pgn: &str) -> Result<Vec<Result<Game, PgnError>>, PgnError> {
    let mut reader = Reader::new(pgn.as_bytes());
    let mut collector = GameCollector;
    let mut games = Vec::new();

    while let Some(game) = reader.read_game(&mut collector)? {
        games.push(game);
    }

    if games.is_empty() {
        return Err(PgnError::Empty);
    }
    Ok(games)
}

/// Parse the first game of a PGN text: tag pairs plus the mainline with
/// comments.
pub fn parse_pgn(pgn: &str) -> Result<Game, PgnError> {
    let mut reader = Reader::new(pgn.as_bytes());
    reader
        .read_game(&mut GameCollector)?
        .unwrap_or(Err(PgnError::Empty))
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Serialize an annotated game as PGN: tag pairs in export order, then the
/// movetext wrapped at 80 columns and terminated by the result.
pub fn write_pgn(game: &AnnotatedGame) -> String {
    let mut out = String::new();
    for (key, value) in game.headers.export_order() {
        out.push_str(&format!("[{key} \"{}\"]\n", escape(value)));
    }
    out.push('\n');

    let mut tokens: Vec<String> = Vec::new();
    let mut after_comment = false;
    for (ply, mv) in game.mainline.iter().enumerate() {
        let number = ply / 2 + 1;
        if ply % 2 == 0 {
            tokens.push(format!("{number}."));
        } else if after_comment {
            tokens.push(format!("{number}..."));
        }
        tokens.push(mv.san.clone());

        after_comment = false;
        if let Some(comment) = &mv.comment {
            tokens.push(format!("{{ {} }}", comment.replace('}', "")));
            after_comment = true;
        }
    }
    tokens.push(game.result().to_string());

    let mut line = String::new();
    for token in tokens {
        if !line.is_empty() && line.len() + 1 + token.len() > LINE_WIDTH {
            out.push_str(&line);
            out.push('\n');
            line.clear();
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(&token);
    }
    out.push_str(&line);
    out.push('\n');
    out
}
