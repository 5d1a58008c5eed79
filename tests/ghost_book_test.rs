//! Ghost book public API tests: aggregation properties over whole PGN records.

use ghost_core::{build_ghost_book, normalize_fen, GhostBook};

const START_KEY: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -";

fn records(pgns: &[&str]) -> Vec<String> {
    pgns.iter().map(|s| s.to_string()).collect()
}

fn as_json(book: &GhostBook) -> serde_json::Value {
    serde_json::to_value(book).unwrap()
}

/// A realistic Chess.com-style PGN with headers, comments and clock annotations.
const ANNOTATED_GAME: &str = r#"[Event "Live Chess"]
[Site "Chess.com"]
[White "ghostplayer"]
[Black "someone"]
[Result "1-0"]
[TimeControl "600"]
[Termination "ghostplayer won by resignation"]

1. e4 {[%clk 0:09:58]} e5 {[%clk 0:09:55]} 2. Nf3 {[%clk 0:09:51]} Nc6
{[%clk 0:09:47]} 3. Bb5 {[%clk 0:09:44]} a6 {[%clk 0:09:40]} 1-0
"#;

#[test]
fn test_annotated_pgn_is_replayed() {
    let book = build_ghost_book(&records(&[ANNOTATED_GAME]));

    assert_eq!(book.positions(), 6);
    assert_eq!(book.get(START_KEY).unwrap()["e4"], 1);

    // The Ruy Lopez position before 3...a6
    let ruy = "r1bqkbnr/pppp1ppp/2n5/1B2p3/4P3/5N2/PPPP1PPP/RNBQK2R b KQkq -";
    assert_eq!(book.get(ruy).unwrap()["a6"], 1);
}

#[test]
fn test_permutations_build_identical_tables() {
    let a = ANNOTATED_GAME;
    let b = "1. d4 Nf6 2. c4 e6 *";
    let c = "1. e4 c5 2. Nf3 d6 *";

    let orders: [[&str; 3]; 3] = [[a, b, c], [c, a, b], [b, c, a]];
    let books: Vec<serde_json::Value> = orders
        .iter()
        .map(|o| as_json(&build_ghost_book(&records(o))))
        .collect();

    assert_eq!(books[0], books[1]);
    assert_eq!(books[1], books[2]);
}

#[test]
fn test_separate_submissions_merge_to_double() {
    let single = build_ghost_book(&records(&[ANNOTATED_GAME]));

    let mut merged = build_ghost_book(&records(&[ANNOTATED_GAME]));
    merged.merge(build_ghost_book(&records(&[ANNOTATED_GAME])));

    assert_eq!(merged.positions(), single.positions());
    for (key, moves) in as_json(&single).as_object().unwrap() {
        for (san, count) in moves.as_object().unwrap() {
            let doubled = as_json(&merged)[key][san].as_u64().unwrap();
            assert_eq!(doubled, 2 * count.as_u64().unwrap(), "{key} {san}");
        }
    }
}

#[test]
fn test_empty_batch_yields_empty_table() {
    assert!(build_ghost_book(&[]).is_empty());
}

#[test]
fn test_transpositions_share_a_key() {
    // Queen's pawn openings transposing: 1.d4 Nf6 2.Nf3 d5 and 1.Nf3 d5 2.d4 Nf6
    // reach the same position before white's third move
    let book = build_ghost_book(&records(&[
        "1. d4 Nf6 2. Nf3 d5 3. e3 *",
        "1. Nf3 d5 2. d4 Nf6 3. c4 *",
    ]));

    let shared = "rnbqkb1r/ppp1pppp/5n2/3p4/3P4/5N2/PPP1PPPP/RNBQKB1R w KQkq -";
    let moves = book.get(shared).unwrap();
    assert_eq!(moves["e3"], 1);
    assert_eq!(moves["c4"], 1);
}

#[test]
fn test_serialized_form_is_nested_counts() {
    let book = build_ghost_book(&records(&["1. e4 e5 *"]));
    let json = as_json(&book);

    let obj = json.as_object().unwrap();
    assert_eq!(obj.len(), 2);
    for moves in obj.values() {
        for count in moves.as_object().unwrap().values() {
            assert!(count.is_u64());
        }
    }
    assert_eq!(json[START_KEY]["e4"], 1);
}

#[test]
fn test_builder_usable_through_visitor_interface() {
    // The builder's associated visitor types must be nameable from outside
    // the crate
    fn feed_games(builder: &mut ghost_core::GhostBuilder, pgns: &[String]) {
        for pgn in pgns {
            builder.feed(pgn);
        }
    }

    let mut builder = ghost_core::GhostBuilder::new();
    feed_games(&mut builder, &records(&["1. e4 e5 *"]));
    let _tags: ghost_core::book::GameTags = Default::default();

    assert_eq!(builder.games_seen, 1);
    assert_eq!(builder.finish().get(START_KEY).unwrap()["e4"], 1);
}

#[test]
fn test_normalize_fen_roundtrip_with_book_keys() {
    let full = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
    assert_eq!(normalize_fen(full), START_KEY);
}
