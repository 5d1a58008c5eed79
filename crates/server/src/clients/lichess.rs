use reqwest::Client;
use serde_json::Value;

use super::PlayerProfile;

pub struct LichessClient {
    client: Client,
}

impl LichessClient {
    pub fn new() -> Self {
        let client = Client::builder()
            .user_agent("ChessGhost/1.0")
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .unwrap();
        Self { client }
    }

    /// Check whether a username exists.
    /// Returns Ok(None) on 404 so the caller can report not-found.
    pub async fn validate_user(&self, username: &str) -> Result<Option<PlayerProfile>, String> {
        let url = format!("https://lichess.org/api/user/{}", username);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| format!("Profile request error: {e}"))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !resp.status().is_success() {
            return Err(format!("Profile HTTP {}", resp.status()));
        }

        // Lichess profiles carry no avatar
        Ok(Some(PlayerProfile { avatar_url: None }))
    }

    /// Fetch up to `max_games` PGNs where `username` played `color`,
    /// most-recent-first (the export endpoint's natural order).
    pub async fn fetch_games_by_color(
        &self,
        username: &str,
        color: &str,
        max_games: usize,
    ) -> Result<Vec<String>, String> {
        let url = format!("https://lichess.org/api/games/user/{}", username);

        let params = vec![
            ("max", max_games.to_string()),
            ("color", color.to_string()),
            ("pgnInJson", "true".to_string()),
        ];

        // Rate limit
        tokio::time::sleep(std::time::Duration::from_secs(1)).await;

        let resp = self
            .client
            .get(&url)
            .query(&params)
            .header("Accept", "application/x-ndjson")
            .send()
            .await
            .map_err(|e| format!("Request error: {e}"))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err("User not found".to_string());
        }

        if !resp.status().is_success() {
            return Err(format!("HTTP {}", resp.status()));
        }

        let text = resp
            .text()
            .await
            .map_err(|e| format!("Body read error: {e}"))?;

        Ok(pgns_from_ndjson(&text))
    }
}

impl Default for LichessClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract PGNs from the NDJSON export body; unparseable lines are skipped.
fn pgns_from_ndjson(text: &str) -> Vec<String> {
    let mut pgns = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<Value>(line) {
            Ok(game) => {
                if let Some(pgn) = game.get("pgn").and_then(|v| v.as_str()) {
                    if !pgn.is_empty() {
                        pgns.push(pgn.to_string());
                    }
                }
            }
            Err(e) => {
                tracing::warn!("Failed to parse Lichess game JSON: {e}");
            }
        }
    }

    pgns
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pgns_from_ndjson() {
        let body = concat!(
            "{\"id\":\"abc\",\"pgn\":\"1. e4 e5 *\"}\n",
            "not json at all\n",
            "{\"id\":\"def\",\"pgn\":\"1. d4 d5 *\"}\n",
            "{\"id\":\"ghi\"}\n",
        );

        let pgns = pgns_from_ndjson(body);
        assert_eq!(pgns, vec!["1. e4 e5 *", "1. d4 d5 *"]);
    }

    #[test]
    fn test_pgns_from_ndjson_empty_body() {
        assert!(pgns_from_ndjson("").is_empty());
        assert!(pgns_from_ndjson("\n\n").is_empty());
    }
}
