//! Detector tests - runs, bomb-worthy groups and blast cells on whole boards

mod common;

use gem_cascade::core::detector::{
    bomb_cross_pattern, find_all_matches, find_matches_of_four_or_more, match_of_four_or_more,
    match_of_four_or_more_in_swap_position,
};
use gem_cascade::core::Board;
use gem_cascade::types::{GemType, Pos};

#[test]
fn test_latin_board_has_no_runs() {
    let mut board = Board::from_rows(&common::LATIN_5X5, 10);
    assert!(find_all_matches(&mut board).is_empty());
    assert!(board.gems().all(|(_, gem)| !gem.is_match));
    assert!(find_matches_of_four_or_more(&board).is_empty());
}

#[test]
fn test_vertical_run_is_flagged() {
    let mut board = Board::from_rows(&["GB", "RB", "RB", "RG"], 10);
    let matched = find_all_matches(&mut board);
    assert_eq!(matched.len(), 6);
    assert!(!board.get_xy(0, 3).unwrap().is_match);
    assert!(!board.get_xy(1, 0).unwrap().is_match);
}

#[test]
fn test_colored_bomb_completes_run_of_its_color() {
    let mut board = Board::from_rows(&["R.R", "GBY"], 10);
    common::place_armed_bomb(&mut board, Pos::new(1, 1), GemType::Red);

    let matched = find_all_matches(&mut board);
    assert_eq!(matched.len(), 3);
    assert!(board.get_xy(1, 1).unwrap().is_match);
}

#[test]
fn test_bomb_of_other_color_breaks_run() {
    let mut board = Board::from_rows(&["R.R", "GBY"], 10);
    common::place_armed_bomb(&mut board, Pos::new(1, 1), GemType::Blue);
    assert!(find_all_matches(&mut board).is_empty());
}

#[test]
fn test_bomb_is_never_part_of_a_group() {
    let mut board = Board::from_rows(&["RRRR", "GBYG"], 10);
    common::place_armed_bomb(&mut board, Pos::new(1, 1), GemType::Red);
    // Run of four split by the bomb into 1 + 2 plain reds
    assert!(find_matches_of_four_or_more(&board).is_empty());
    assert!(match_of_four_or_more(&board).is_none());
}

#[test]
fn test_board_wide_placement_uses_largest_group() {
    let board = Board::from_rows(
        &[
            "YYYYB",
            "GBRGB",
            "RRRRR",
        ],
        10,
    );
    let groups = find_matches_of_four_or_more(&board);
    assert_eq!(groups.len(), 2);

    let placement = match_of_four_or_more(&board).unwrap();
    assert_eq!(placement.color, GemType::Red);
    // Seed of the red group is the first red in scan order
    assert_eq!(placement.pos, Pos::new(0, 0));
}

#[test]
fn test_swap_position_ignores_groups_away_from_swap() {
    let board = Board::from_rows(&["RRRRG", "GBYPB"], 10);
    assert!(match_of_four_or_more_in_swap_position(&board, Pos::new(4, 0), Pos::new(4, 1)).is_none());

    let placement =
        match_of_four_or_more_in_swap_position(&board, Pos::new(3, 1), Pos::new(3, 0)).unwrap();
    assert_eq!(placement.pos, Pos::new(3, 1));
    assert_eq!(placement.color, GemType::Red);
}

#[test]
fn test_l_shape_qualifies_on_board() {
    let board = Board::from_rows(&["RGB", "RBG", "RRR"], 10);
    let groups = find_matches_of_four_or_more(&board);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].count, 5);
}

#[test]
fn test_cross_pattern_cells_are_distinct_and_on_board() {
    let board = Board::new(5, 4);
    for pos in board.positions() {
        let cells = bomb_cross_pattern(&board, pos);
        assert_eq!(cells[0], pos);
        for (i, cell) in cells.iter().enumerate() {
            assert!(board.contains(*cell));
            assert!(!cells[..i].contains(cell), "duplicate {} around {}", cell, pos);
        }
    }
}

#[test]
fn test_flags_survive_until_next_scan() {
    let mut board = Board::from_rows(&["BBB", "RGY"], 10);
    find_all_matches(&mut board);
    let flagged = board.gems().filter(|(_, g)| g.is_match).count();
    assert_eq!(flagged, 3);

    board.destroy(Pos::new(1, 1));
    find_all_matches(&mut board);
    assert!(board.gems().all(|(_, g)| !g.is_match));
}
