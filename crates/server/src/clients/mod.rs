pub mod chess_com;
pub mod lichess;

/// Profile metadata returned by a user-existence check.
#[derive(Debug, Clone)]
pub struct PlayerProfile {
    pub avatar_url: Option<String>,
}
