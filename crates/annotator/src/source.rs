//! Loading PGN games from a local file or a URL

use std::path::Path;

use chess_core::{pgn, Game, PgnError};
use reqwest::Client;
use tracing::{info, warn};

use crate::error::AnnotatorError;

/// Games read from one PGN document, each parsed independently.
pub type ParsedGames = Vec<Result<Game, PgnError>>;

/// Read and parse every game in a PGN file.
pub async fn read_pgn_file(path: &Path) -> Result<ParsedGames, AnnotatorError> {
    let text = tokio::fs::read_to_string(path).await?;
    let games = pgn::parse_games(&text)?;
    info!(
        path = %path.display(),
        games = games.len(),
        unparseable = count_failures(&games),
        "Loaded PGN file"
    );
    Ok(games)
}

/// Download a PGN document and parse every game in it.
pub async fn fetch_pgn(url: &str) -> Result<ParsedGames, AnnotatorError> {
    let client = Client::builder()
        .user_agent("annotate-pgn/0.1")
        .timeout(std::time::Duration::from_secs(60))
        .build()
        .map_err(|e| AnnotatorError::Fetch(format!("Client error: {e}")))?;

    let resp = client
        .get(url)
        .send()
        .await
        .map_err(|e| AnnotatorError::Fetch(format!("Request error: {e}")))?;

    if !resp.status().is_success() {
        return Err(AnnotatorError::Fetch(format!("HTTP {}", resp.status())));
    }

    let text = resp
        .text()
        .await
        .map_err(|e| AnnotatorError::Fetch(format!("Body read error: {e}")))?;

    let games = pgn::parse_games(&text)?;
    info!(url, games = games.len(), unparseable = count_failures(&games), "Fetched PGN");
    Ok(games)
}

fn count_failures(games: &ParsedGames) -> usize {
    let failures = games.iter().filter(|g| g.is_err()).count();
    if failures > 0 {
        warn!(failures, "Some games could not be parsed and will be skipped");
    }
    failures
}
