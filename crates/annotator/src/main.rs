//! PGN accuracy annotator
//!
//! Reads games from a PGN file, a URL or engine self-play, scores every
//! move with Stockfish and prints the annotated PGN (or JSON) to stdout.

use std::path::PathBuf;

use anyhow::bail;
use clap::Parser;
use tracing::{error, info};

use annotator::config::{AnnotatorConfig, ConfigOverrides, GameSource};
use annotator::engine::Engine;
use annotator::stockfish::StockfishEngine;
use annotator::{annotate, annotate_game, selfplay, source};
use chess_core::pgn::write_pgn;

#[derive(Parser, Debug)]
#[command(name = "annotate-pgn", about = "Annotate chess games with engine accuracy")]
struct Cli {
    /// PGN file with one or more games
    #[arg(long)]
    file: Option<PathBuf>,

    /// URL of a PGN document
    #[arg(long)]
    url: Option<String>,

    /// Let the engine play itself and annotate the result
    #[arg(long)]
    self_play: bool,

    /// Ply cap for self-play
    #[arg(long, default_value_t = 400)]
    max_plies: usize,

    /// Player name suffix for self-play headers
    #[arg(long)]
    player_label: Option<String>,

    /// Stockfish binary (overrides STOCKFISH_PATH)
    #[arg(long)]
    stockfish_path: Option<String>,

    /// Search depth (overrides STOCKFISH_DEPTH)
    #[arg(long)]
    depth: Option<u32>,

    /// Engine threads (overrides STOCKFISH_THREADS)
    #[arg(long)]
    threads: Option<u32>,

    /// Hash size in MB (overrides STOCKFISH_HASH_MB)
    #[arg(long)]
    hash: Option<u32>,

    /// Print evaluated moves and summary as JSON
    #[arg(long)]
    json: bool,
}

impl From<Cli> for ConfigOverrides {
    fn from(cli: Cli) -> Self {
        Self {
            file: cli.file,
            url: cli.url,
            self_play: cli.self_play,
            max_plies: cli.max_plies,
            player_label: cli.player_label,
            stockfish_path: cli.stockfish_path,
            depth: cli.depth,
            threads: cli.threads,
            hash_mb: cli.hash,
            json: cli.json,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing; stdout is reserved for PGN
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Load .env file for local dev
    let _ = dotenvy::dotenv();

    let config = AnnotatorConfig::load(Cli::parse().into())?;

    let mut engine = StockfishEngine::new(&config.engine).await?;
    info!("Stockfish engine ready");

    let games = match &config.source {
        GameSource::File(path) => source::read_pgn_file(path).await?,
        GameSource::Url(url) => source::fetch_pgn(url).await?,
        GameSource::SelfPlay { max_plies, label } => {
            vec![Ok(selfplay::play_game(&mut engine, *max_plies, label).await?)]
        }
    };

    let mut unparseable = 0usize;
    let mut failed = 0usize;
    let mut annotations = Vec::new();
    for (index, game) in games.iter().enumerate() {
        let game = match game {
            Ok(game) => game,
            Err(e) => {
                error!(game = index + 1, error = %e, "Skipping unparseable game");
                unparseable += 1;
                continue;
            }
        };

        engine.set_position(&[]).await?;

        match annotate_game(&mut engine, game).await {
            Ok(annotation) if config.json => annotations.push(annotation),
            Ok(annotation) => {
                if index > unparseable + failed {
                    println!();
                }
                print!("{}", write_pgn(&annotation.game));
            }
            Err(e) => {
                error!(game = index + 1, error = %e, "Annotation failed");
                failed += 1;
            }
        }
    }

    // One JSON document for the whole run
    if config.json {
        println!("{}", annotate::annotations_json(&annotations)?);
    }

    info!("Shutting down Stockfish engine");
    engine.quit().await;

    if unparseable + failed > 0 {
        bail!(
            "{} of {} games skipped ({unparseable} unparseable, {failed} failed annotation)",
            unparseable + failed,
            games.len()
        );
    }
    Ok(())
}
