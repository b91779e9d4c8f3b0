//! Board tests - grid primitives and the notifications they record

mod common;

use gem_cascade::core::{Board, Gem, GemId, Notification};
use gem_cascade::types::{GemType, Pos, SpawnKind};
use serde::Deserialize;

/// Wire shape of a spawn notification as a JSON consumer would read it
#[derive(Debug, Deserialize)]
struct WireSpawn {
    #[serde(rename = "type")]
    kind: String,
    pos: Pos,
    gem: WireGem,
    spawn: SpawnKind,
}

#[derive(Debug, Deserialize)]
struct WireGem {
    id: u32,
    kind: GemType,
    match_color: Option<GemType>,
}

#[test]
fn test_board_new_empty() {
    let board = Board::new(7, 5);
    assert_eq!(board.width(), 7);
    assert_eq!(board.height(), 5);
    assert_eq!(board.empty_count(), 35);
    assert!(board.positions().all(|pos| board.get(pos).is_none()));
    assert!(!board.is_dirty());
}

#[test]
fn test_board_contains() {
    let board = Board::new(4, 3);
    assert!(board.contains(Pos::new(0, 0)));
    assert!(board.contains(Pos::new(3, 2)));
    assert!(!board.contains(Pos::new(4, 0)));
    assert!(!board.contains(Pos::new(0, 3)));
}

#[test]
#[should_panic(expected = "outside 4x3 board")]
fn test_board_get_out_of_bounds_panics() {
    let board = Board::new(4, 3);
    let _ = board.get(Pos::new(4, 0));
}

#[test]
fn test_from_rows_puts_top_row_last() {
    let board = Board::from_rows(&["R.", "GB"], 10);
    assert_eq!(board.get_xy(0, 1).map(Gem::kind), Some(GemType::Red));
    assert!(board.get_xy(1, 1).is_none());
    assert_eq!(board.get_xy(0, 0).map(Gem::kind), Some(GemType::Green));
    assert_eq!(board.to_rows(), vec!["R.".to_string(), "GB".to_string()]);
    assert!(board.notifications().is_empty());
}

#[test]
fn test_set_records_spawn_and_destroy() {
    let mut board = Board::new(3, 3);
    let id = board.allocate_id();
    let previous = board.set(Pos::new(1, 1), Some(Gem::new(id, GemType::Yellow, 10)), SpawnKind::Appear);
    assert!(previous.is_none());
    assert!(board.is_dirty());

    let removed = board.set(Pos::new(1, 1), None, SpawnKind::Instant);
    assert_eq!(removed.map(|g| g.id()), Some(id));

    let log = board.take_notifications();
    assert_eq!(log.len(), 2);
    assert!(matches!(
        log[0],
        Notification::GemSpawned { spawn: SpawnKind::Appear, .. }
    ));
    assert!(matches!(log[1], Notification::GemDestroyed { pos, .. } if pos == Pos::new(1, 1)));
    assert!(board.notifications().is_empty());
}

#[test]
fn test_swap_is_its_own_batch() {
    let mut board = Board::from_rows(&["RG"], 10);
    let red = common::id_at(&board, 0, 0);
    let green = common::id_at(&board, 1, 0);

    board.swap(Pos::new(0, 0), Pos::new(1, 0));
    assert_eq!(board.find_position(red), Some(Pos::new(1, 0)));
    assert_eq!(board.find_position(green), Some(Pos::new(0, 0)));

    let log = board.take_notifications();
    assert_eq!(log.len(), 3);
    assert_eq!(log[0], Notification::BatchStarted);
    match &log[1] {
        Notification::GemsSwapped { gem_a, gem_b, .. } => {
            assert_eq!(gem_a.map(|g| g.id), Some(red));
            assert_eq!(gem_b.map(|g| g.id), Some(green));
        }
        other => panic!("expected a swap, got {:?}", other),
    }
    assert_eq!(log[2], Notification::BatchEnded);
}

#[test]
fn test_move_and_destroy() {
    let mut board = Board::from_rows(&["B", "."], 10);
    let blue = common::id_at(&board, 0, 1);

    board.move_gem(Pos::new(0, 1), Pos::new(0, 0));
    assert_eq!(board.find_position(blue), Some(Pos::new(0, 0)));
    assert_eq!(board.destroy(Pos::new(0, 0)).map(|g| g.id()), Some(blue));
    assert!(board.destroy(Pos::new(0, 0)).is_none());
    assert!(board.find_position(blue).is_none());

    let names: Vec<_> = board.take_notifications().iter().map(Notification::name).collect();
    assert_eq!(names, ["gemMoved", "gemDestroyed"]);
}

#[test]
#[should_panic(expected = "move target (0, 0) is occupied")]
fn test_move_onto_gem_panics() {
    let mut board = Board::from_rows(&["R", "G"], 10);
    board.move_gem(Pos::new(0, 1), Pos::new(0, 0));
}

#[test]
fn test_ids_are_unique_and_increasing() {
    let mut board = Board::from_rows(&common::LATIN_5X5, 10);
    let mut ids: Vec<GemId> = board.gems().map(|(_, g)| g.id()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 25);

    let next = board.allocate_id();
    assert!(ids.iter().all(|&id| id < next));
}

#[test]
fn test_positions_scan_columns_bottom_up() {
    let board = Board::new(2, 2);
    let order: Vec<_> = board.positions().collect();
    assert_eq!(
        order,
        [Pos::new(0, 0), Pos::new(0, 1), Pos::new(1, 0), Pos::new(1, 1)]
    );
}

#[test]
fn test_spawn_notification_json_shape() {
    let mut board = Board::new(3, 3);
    let id = board.allocate_id();
    let bomb = Gem::new(id, GemType::Bomb, 50).with_colored_bomb(GemType::Purple);
    board.set(Pos::new(2, 1), Some(bomb), SpawnKind::FallFromTop);

    let line = board.take_notifications()[0].to_json_line().unwrap();
    let wire: WireSpawn = serde_json::from_str(&line).unwrap();
    assert_eq!(wire.kind, "gemSpawned");
    assert_eq!(wire.pos, Pos::new(2, 1));
    assert_eq!(wire.spawn, SpawnKind::FallFromTop);
    assert_eq!(wire.gem.id, id.0);
    assert_eq!(wire.gem.kind, GemType::Bomb);
    assert_eq!(wire.gem.match_color, Some(GemType::Purple));
}
