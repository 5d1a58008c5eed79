//! Position frequency aggregation for ghost books.
//!
//! A ghost book maps every position a player has reached to the moves they
//! played from it and how often. `build_ghost_book` is the entry point; the
//! replay engine behind it lives in [`replay`].

pub mod book;
pub mod replay;

pub use book::{build_ghost_book, normalize_fen, GhostBook, GhostBuilder};
pub use replay::{GameReplay, ReplayError};
