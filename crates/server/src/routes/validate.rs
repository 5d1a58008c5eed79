use axum::{extract::Query, Json};
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};

use crate::clients::{chess_com::ChessComClient, lichess::LichessClient, PlayerProfile};
use crate::error::AppError;

#[derive(Deserialize)]
pub struct ValidateQuery {
    pub username: String,
    pub platform: String,
}

/// GET /validate-user?username=...&platform=chesscom|lichess
///
/// 404 means the user does not exist on the platform, which is distinct
/// from a valid user with no games.
pub async fn validate_user(Query(q): Query<ValidateQuery>) -> Result<Json<JsonValue>, AppError> {
    let result: Option<PlayerProfile> = match q.platform.as_str() {
        "chesscom" => ChessComClient::new()
            .validate_user(&q.username)
            .await
            .map_err(AppError::Internal)?,
        "lichess" => LichessClient::new()
            .validate_user(&q.username)
            .await
            .map_err(AppError::Internal)?,
        _ => {
            return Err(AppError::BadRequest(
                "Platform must be 'chesscom' or 'lichess'".into(),
            ))
        }
    };

    let profile = result.ok_or_else(|| {
        AppError::NotFound(format!("Username not found on {}", q.platform))
    })?;

    Ok(Json(json!({
        "status": "ok",
        "username": q.username,
        "platform": q.platform,
        "avatar_url": profile.avatar_url,
    })))
}
