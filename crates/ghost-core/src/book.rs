//! Ghost book: per-position move frequency table.
//!
//! Folds the (position, move) pairs produced by replaying a player's games
//! into a single table keyed by normalized FEN. Aggregation is commutative,
//! so the order of games (and merging of separately built books) never
//! changes the result.

use std::collections::HashMap;
use std::ops::ControlFlow;

use pgn_reader::{RawTag, Reader, SanPlus, Visitor};
use serde::Serialize;

use crate::replay::GameReplay;

const STANDARD_START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Strips move counters from a FEN, keeping placement + side + castling + ep.
///
/// Two positions are the same for aggregation purposes iff their normalized
/// FENs are equal; transpositions reached at different move numbers collapse
/// to one key.
pub fn normalize_fen(fen: &str) -> String {
    fen.split_whitespace().take(4).collect::<Vec<_>>().join(" ")
}

/// Frequency table: normalized FEN -> (move SAN -> count).
///
/// Serializes directly as the nested JSON object consumers expect.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct GhostBook {
    positions: HashMap<String, HashMap<String, u32>>,
}

impl GhostBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `san` played from the position `key`.
    pub fn record(&mut self, key: String, san: String) {
        *self
            .positions
            .entry(key)
            .or_default()
            .entry(san)
            .or_insert(0) += 1;
    }

    /// Fold another book into this one by pairwise summing counts.
    pub fn merge(&mut self, other: GhostBook) {
        for (key, moves) in other.positions {
            let entry = self.positions.entry(key).or_default();
            for (san, count) in moves {
                *entry.entry(san).or_insert(0) += count;
            }
        }
    }

    /// Moves recorded from a position, if the position was ever reached.
    pub fn get(&self, key: &str) -> Option<&HashMap<String, u32>> {
        self.positions.get(key)
    }

    /// Number of distinct positions.
    pub fn positions(&self) -> usize {
        self.positions.len()
    }

    /// Number of distinct (position, move) entries.
    pub fn moves(&self) -> usize {
        self.positions.values().map(|m| m.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Tags collected during header parsing.
pub struct GameTags {
    standard: bool,
}

impl Default for GameTags {
    fn default() -> Self {
        Self { standard: true }
    }
}

/// State during movetext parsing.
pub struct GameState {
    replay: GameReplay,
    failed: bool,
}

/// Visitor that replays games and folds their moves into a ghost book.
///
/// A game that hits an illegal move keeps the pairs recorded up to that
/// point and skips the rest; it never poisons the batch.
pub struct GhostBuilder {
    book: GhostBook,
    /// Games encountered across all fed records.
    pub games_seen: u64,
    /// Games skipped whole (variant or non-standard start position).
    pub games_skipped: u64,
    /// Games cut short by an illegal or ambiguous move.
    pub games_truncated: u64,
}

impl GhostBuilder {
    pub fn new() -> Self {
        Self {
            book: GhostBook::new(),
            games_seen: 0,
            games_skipped: 0,
            games_truncated: 0,
        }
    }

    /// Ingest one raw game record. A record may contain several games; a
    /// malformed record contributes whatever parsed before the damage.
    pub fn feed(&mut self, pgn: &str) {
        let mut reader = Reader::new(pgn.as_bytes());
        loop {
            match reader.read_game(self) {
                Ok(Some(())) => {}
                Ok(None) => break,
                Err(_) => break,
            }
        }
    }

    pub fn finish(self) -> GhostBook {
        self.book
    }
}

impl Default for GhostBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Visitor for GhostBuilder {
    type Tags = GameTags;
    type Movetext = GameState;
    type Output = ();

    fn begin_tags(&mut self) -> ControlFlow<(), GameTags> {
        ControlFlow::Continue(GameTags::default())
    }

    fn tag(&mut self, tags: &mut GameTags, name: &[u8], value: RawTag<'_>) -> ControlFlow<()> {
        match name {
            b"Variant" => {
                if value.decode_utf8_lossy() != "Standard" {
                    tags.standard = false;
                }
            }
            b"FEN" => {
                if value.decode_utf8_lossy() != STANDARD_START_FEN {
                    tags.standard = false;
                }
            }
            _ => {}
        }
        ControlFlow::Continue(())
    }

    fn begin_movetext(&mut self, tags: GameTags) -> ControlFlow<(), GameState> {
        self.games_seen += 1;

        if !tags.standard {
            self.games_skipped += 1;
            return ControlFlow::Break(());
        }

        ControlFlow::Continue(GameState {
            replay: GameReplay::new(),
            failed: false,
        })
    }

    fn san(&mut self, state: &mut GameState, san_plus: SanPlus) -> ControlFlow<()> {
        if state.failed {
            return ControlFlow::Continue(());
        }

        // Key the position before the move is applied
        let key = normalize_fen(&state.replay.fen());

        match state.replay.play_san(&san_plus.san) {
            Ok(rendered) => self.book.record(key, rendered),
            Err(_) => {
                state.failed = true;
                self.games_truncated += 1;
            }
        }

        ControlFlow::Continue(())
    }

    fn end_game(&mut self, _state: GameState) {}
}

/// Build a ghost book from a list of raw game records.
///
/// Empty input (or input with no valid games) yields an empty book; a
/// corrupt game never discards results aggregated from the others.
pub fn build_ghost_book(pgns: &[String]) -> GhostBook {
    let mut builder = GhostBuilder::new();
    for pgn in pgns {
        builder.feed(pgn);
    }
    builder.finish()
}
