//! Game replay on top of the rules engine.
//!
//! `GameReplay` owns the board simulation for a single game: it validates
//! each incoming move against the current position, renders it in canonical
//! SAN and advances the board. Everything else in the crate talks to the
//! rules engine (shakmaty) only through this seam.

use shakmaty::{fen::Fen, san::San, Chess, EnPassantMode, Position};

#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("illegal or ambiguous move '{0}'")]
    IllegalMove(String),
}

/// Board simulation for one game, starting from the standard position.
///
/// Scoped to a single game's replay; drop it once the game is processed or
/// abandoned.
pub struct GameReplay {
    board: Chess,
}

impl GameReplay {
    pub fn new() -> Self {
        Self {
            board: Chess::default(),
        }
    }

    /// Full FEN descriptor of the current position, clocks included.
    ///
    /// The en passant square is only present when a capture is actually
    /// legal, so transpositions that differ in an irrelevant double push
    /// still produce the same descriptor.
    pub fn fen(&self) -> String {
        Fen::from_position(&self.board, EnPassantMode::Legal).to_string()
    }

    /// Validate `san` against the current position, advance the board, and
    /// return the move re-rendered in canonical SAN: standard disambiguation
    /// (file/rank/square as needed) plus a `+`/`#` suffix for check/mate.
    ///
    /// On error the board is left unchanged; the caller is expected to
    /// abandon the rest of the game.
    pub fn play_san(&mut self, san: &San) -> Result<String, ReplayError> {
        let mv = san
            .to_move(&self.board)
            .map_err(|_| ReplayError::IllegalMove(san.to_string()))?;

        let rendered = San::from_move(&self.board, mv).to_string();

        let next = self
            .board
            .clone()
            .play(mv)
            .map_err(|_| ReplayError::IllegalMove(san.to_string()))?;

        let suffix = if next.is_checkmate() {
            "#"
        } else if next.is_check() {
            "+"
        } else {
            ""
        };

        self.board = next;
        Ok(format!("{rendered}{suffix}"))
    }
}

impl Default for GameReplay {
    fn default() -> Self {
        Self::new()
    }
}
