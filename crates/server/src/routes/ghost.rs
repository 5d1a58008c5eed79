use axum::{extract::Query, Extension, Json};
use serde::Deserialize;

use ghost_core::{GhostBook, GhostBuilder};

use crate::clients::{chess_com::ChessComClient, lichess::LichessClient};
use crate::config::Config;
use crate::error::AppError;

fn default_platform() -> String {
    "chesscom".to_string()
}

#[derive(Deserialize)]
pub struct GhostQuery {
    pub username: String,
    pub color: String,
    #[serde(default = "default_platform")]
    pub platform: String,
}

#[derive(Deserialize)]
pub struct PgnUpload {
    pub pgn: String,
}

/// GET /ghost?username=...&color=white|black&platform=chesscom
///
/// Fetches the user's recent games for one color and returns the ghost
/// book. Provider failures degrade to an empty result, never an error.
pub async fn get_ghost_moves(
    Extension(config): Extension<Config>,
    Query(q): Query<GhostQuery>,
) -> Result<Json<GhostBook>, AppError> {
    let color = q.color.to_lowercase();
    if color != "white" && color != "black" {
        return Err(AppError::BadRequest(
            "Color must be 'white' or 'black'".into(),
        ));
    }

    let pgns = if q.platform == "lichess" {
        LichessClient::new()
            .fetch_games_by_color(&q.username, &color, config.max_games)
            .await
    } else {
        ChessComClient::new()
            .fetch_games_by_color(&q.username, &color, config.max_games)
            .await
    }
    .unwrap_or_else(|e| {
        tracing::warn!("Error fetching games for {} on {}: {}", q.username, q.platform, e);
        Vec::new()
    });

    Ok(Json(build_logged(&pgns, &q.username)))
}

/// POST /ghost/upload
///
/// Builds a ghost book from a single submitted record, which may contain
/// several games.
pub async fn upload_ghost(Json(body): Json<PgnUpload>) -> Json<GhostBook> {
    Json(build_logged(&[body.pgn], "upload"))
}

fn build_logged(pgns: &[String], who: &str) -> GhostBook {
    let mut builder = GhostBuilder::new();
    for pgn in pgns {
        builder.feed(pgn);
    }

    if builder.games_skipped > 0 || builder.games_truncated > 0 {
        tracing::info!(
            "{}: skipped {} non-standard and truncated {} corrupt games",
            who,
            builder.games_skipped,
            builder.games_truncated
        );
    }

    let book = builder.finish();
    tracing::info!(
        "{}: built ghost book with {} positions / {} moves from {} records",
        who,
        book.positions(),
        book.moves(),
        pgns.len()
    );
    book
}
