//! One-off ghost book dump for a single player.
//!
//! Fetches a user's games for one color and writes the ghost book as JSON,
//! e.g. to ship a static book with a frontend.
//!
//! Usage: cargo run --release --bin build-book -- <username> [--color white] [--platform chesscom] [--max-games 2000] [--out ghost_book.json]

use std::env;
use std::fs::File;
use std::time::Instant;

use ghost_core::GhostBuilder;
use server::clients::{chess_com::ChessComClient, lichess::LichessClient};

const DEFAULT_MAX_GAMES: usize = 2000;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!(
            "Usage: {} <username> [--color white] [--platform chesscom] [--max-games N] [--out path]",
            args[0]
        );
        std::process::exit(1);
    }

    let username = &args[1];
    let mut color = "white".to_string();
    let mut platform = "chesscom".to_string();
    let mut max_games = DEFAULT_MAX_GAMES;
    let mut out_path = "ghost_book.json".to_string();

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--color" => {
                color = args.get(i + 1).cloned().unwrap_or(color);
                i += 2;
            }
            "--platform" => {
                platform = args.get(i + 1).cloned().unwrap_or(platform);
                i += 2;
            }
            "--max-games" => {
                max_games = args
                    .get(i + 1)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_MAX_GAMES);
                i += 2;
            }
            "--out" => {
                out_path = args.get(i + 1).cloned().unwrap_or(out_path);
                i += 2;
            }
            _ => i += 1,
        }
    }

    if color != "white" && color != "black" {
        anyhow::bail!("Color must be 'white' or 'black'");
    }

    println!("Fetching up to {} {} games for {} from {}...", max_games, color, username, platform);
    let start = Instant::now();

    let pgns = if platform == "lichess" {
        LichessClient::new()
            .fetch_games_by_color(username, &color, max_games)
            .await
    } else {
        ChessComClient::new()
            .fetch_games_by_color(username, &color, max_games)
            .await
    }
    .map_err(|e| anyhow::anyhow!("Failed to fetch games: {e}"))?;

    println!("  Fetched {} games in {:.1}s", pgns.len(), start.elapsed().as_secs_f64());

    if pgns.is_empty() {
        anyhow::bail!("No games found for {username}");
    }

    println!("Building ghost book...");
    let mut builder = GhostBuilder::new();
    for pgn in &pgns {
        builder.feed(pgn);
    }

    println!(
        "  {} games replayed ({} skipped, {} truncated)",
        builder.games_seen, builder.games_skipped, builder.games_truncated
    );

    let book = builder.finish();
    println!("  {} unique positions, {} moves", book.positions(), book.moves());

    let file = File::create(&out_path)?;
    serde_json::to_writer_pretty(file, &book)?;

    let size_kb = std::fs::metadata(&out_path)?.len() / 1024;
    println!("Saved to {} ({} KB)", out_path, size_kb);

    Ok(())
}
