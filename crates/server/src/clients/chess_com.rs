use reqwest::Client;
use serde_json::Value;

use super::PlayerProfile;

pub struct ChessComClient {
    client: Client,
}

impl ChessComClient {
    pub fn new() -> Self {
        // Chess.com's public API requires a User-Agent
        let client = Client::builder()
            .user_agent("ChessGhost/1.0")
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap();
        Self { client }
    }

    /// Check whether a username exists.
    /// Returns Ok(None) on 404 so the caller can report not-found.
    pub async fn validate_user(&self, username: &str) -> Result<Option<PlayerProfile>, String> {
        let url = format!("https://api.chess.com/pub/player/{}", username);

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

        let data: Value = resp
            .json()
            .await
            .map_err(|e| format!("Profile JSON parse error: {e}"))?;

        Ok(Some(PlayerProfile {
            avatar_url: data
                .get("avatar")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string()),
        }))
    }

    /// Fetch the list of monthly archives that contain games.
    /// Returns (year, month) pairs sorted newest-first.
    pub async fn fetch_archives(&self, username: &str) -> Result<Vec<(i32, u32)>, String> {
        let url = format!(
            "https://api.chess.com/pub/player/{}/games/archives",
            username
        );

        tokio::time::sleep(std::time::Duration::from_millis(100)).await;

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| format!("Archives request error: {e}"))?;

        if !resp.status().is_success() {
            return Err(format!("Archives HTTP {}", resp.status()));
        }

        let data: Value = resp
            .json()
            .await
            .map_err(|e| format!("Archives JSON parse error: {e}"))?;

        Ok(archive_months(&data))
    }

    /// Fetch up to `max_games` PGNs where `username` played `color`,
    /// most-recent-first.
    ///
    /// Walks the monthly archives newest-first and cuts off exactly at the
    /// cap, even mid-archive, so the result is a continuous most-recent
    /// window. A failed archive fetch is logged and skipped.
    pub async fn fetch_games_by_color(
        &self,
        username: &str,
        color: &str,
        max_games: usize,
    ) -> Result<Vec<String>, String> {
        let months = self.fetch_archives(username).await?;
        let target = username.to_lowercase();

        let mut pgns = Vec::new();

        for (year, month) in months {
            let games = match self.fetch_month_games(username, year, month).await {
                Ok(games) => games,
                Err(e) => {
                    tracing::warn!("Error fetching {}/{:02} for {}: {}", year, month, username, e);
                    continue;
                }
            };

            // Games within an archive are chronological; reverse for newest-first
            for game in games.iter().rev() {
                let side = game.get(color).and_then(|v| v.get("username"));
                let matches = side
                    .and_then(|v| v.as_str())
                    .map(|name| name.to_lowercase() == target)
                    .unwrap_or(false);

                if matches {
                    if let Some(pgn) = game.get("pgn").and_then(|v| v.as_str()) {
                        pgns.push(pgn.to_string());
                        if pgns.len() >= max_games {
                            return Ok(pgns);
                        }
                    }
                }
            }
        }

        Ok(pgns)
    }

    /// Fetch one monthly archive, filtered to standard-rules games.
    async fn fetch_month_games(
        &self,
        username: &str,
        year: i32,
        month: u32,
    ) -> Result<Vec<Value>, String> {
        let url = format!(
            "https://api.chess.com/pub/player/{}/games/{}/{:02}",
            username, year, month
        );

        // Rate limit
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| format!("Request error: {e}"))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(vec![]);
        }

        if !resp.status().is_success() {
            return Err(format!("HTTP {}", resp.status()));
        }

        let data: Value = resp
            .json()
            .await
            .map_err(|e| format!("JSON parse error: {e}"))?;

        let games = data["games"]
            .as_array()
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|game| {
                let rules = game.get("rules").and_then(|v| v.as_str()).unwrap_or("chess");
                rules == "chess"
            })
            .collect();

        Ok(games)
    }
}

impl Default for ChessComClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse the archives listing into (year, month) pairs, newest-first.
fn archive_months(data: &Value) -> Vec<(i32, u32)> {
    let mut months: Vec<(i32, u32)> = data["archives"]
        .as_array()
        .cloned()
        .unwrap_or_default()
        .iter()
        .filter_map(|v| {
            // URLs look like "https://api.chess.com/pub/player/username/games/2024/03"
            let s = v.as_str()?;
            let parts: Vec<&str> = s.trim_end_matches('/').rsplit('/').collect();
            let month: u32 = parts.first()?.parse().ok()?;
            let year: i32 = parts.get(1)?.parse().ok()?;
            Some((year, month))
        })
        .collect();

    months.sort_by(|a, b| b.cmp(a));
    months
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_months_sorted_newest_first() {
        let data = serde_json::json!({
            "archives": [
                "https://api.chess.com/pub/player/someone/games/2024/03",
                "https://api.chess.com/pub/player/someone/games/2023/11",
                "https://api.chess.com/pub/player/someone/games/2024/01",
            ]
        });

        let months = archive_months(&data);
        assert_eq!(months, vec![(2024, 3), (2024, 1), (2023, 11)]);
    }

    #[test]
    fn test_archive_months_missing_field() {
        let months = archive_months(&serde_json::json!({}));
        assert!(months.is_empty());
    }
}
