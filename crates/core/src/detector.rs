//! Match detection - stateless queries over a board
//!
//! - `find_all_matches`: classic runs of three, flags every member
//! - `find_matches_of_four_or_more`: flood-filled groups that earn a bomb
//! - `bomb_cross_pattern`: the cells a detonation reaches
//! - `matches_at`: generation-time "would this complete a run" probe
//!
//! Only `find_all_matches` writes to the board, and only the per-gem
//! `is_match` flags.

use std::collections::{BTreeMap, HashSet, VecDeque};

use arrayvec::ArrayVec;
use log::debug;

use crate::board::Board;
use crate::gem::{Gem, GemId};
use crate::types::{GemType, Pos, BOMB_PATTERN_CELLS};

/// A connected group of same-kind gems that qualifies for a bomb
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchGroup {
    /// Flood-fill order, starting at the seed cell
    pub positions: Vec<Pos>,
    pub count: usize,
}

impl MatchGroup {
    fn new(positions: Vec<Pos>) -> Self {
        let count = positions.len();
        Self { positions, count }
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.positions.contains(&pos)
    }
}

/// Where a bomb should appear after the current destroy, and its color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BombPlacement {
    pub pos: Pos,
    pub color: GemType,
}

/// Whether two gems count as the same for run detection.
///
/// Colored bombs compare by their bound color. A bomb carrying a color
/// matches plain gems of that color. Everything else compares by kind.
pub fn can_match(a: &Gem, b: &Gem) -> bool {
    match (a.colored_bomb(), b.colored_bomb()) {
        (Some(ca), Some(cb)) => ca.match_color == cb.match_color,
        (Some(ca), None) if a.kind() == GemType::Bomb => ca.match_color == b.kind(),
        (None, Some(cb)) if b.kind() == GemType::Bomb => cb.match_color == a.kind(),
        _ => a.kind() == b.kind(),
    }
}

/// Flag every gem that sits in a horizontal or vertical run of three.
///
/// Clears all previous flags first. Returns matched ids without duplicates,
/// in the order they were first found (column by column, bottom to top).
pub fn find_all_matches(board: &mut Board) -> Vec<GemId> {
    board.clear_match_flags();

    let mut triples: Vec<[Pos; 3]> = Vec::new();
    for pos in board.positions() {
        let Some(center) = board.get(pos) else {
            continue;
        };

        if pos.x > 0 && pos.x + 1 < board.width() {
            let left = Pos::new(pos.x - 1, pos.y);
            let right = Pos::new(pos.x + 1, pos.y);
            if run_of_three(board, center, left, right) {
                triples.push([pos, left, right]);
            }
        }

        if pos.y > 0 && pos.y + 1 < board.height() {
            let below = Pos::new(pos.x, pos.y - 1);
            let above = Pos::new(pos.x, pos.y + 1);
            if run_of_three(board, center, below, above) {
                triples.push([pos, below, above]);
            }
        }
    }

    let mut seen = HashSet::new();
    let mut matched = Vec::new();
    for pos in triples.into_iter().flatten() {
        if let Some(gem) = board.get_mut(pos) {
            gem.is_match = true;
            if seen.insert(gem.id()) {
                matched.push(gem.id());
            }
        }
    }
    matched
}

fn run_of_three(board: &Board, center: &Gem, a: Pos, b: Pos) -> bool {
    match (board.get(a), board.get(b)) {
        (Some(ga), Some(gb)) => can_match(ga, center) && can_match(gb, center),
        _ => false,
    }
}

/// Would `candidate` at `pos` complete a run with the two cells to its left
/// or the two cells below it?
///
/// Only the cells an x-major, bottom-up fill has already populated are
/// consulted.
pub fn matches_at(board: &Board, pos: Pos, candidate: &Gem) -> bool {
    let completes = |p1: Pos, p2: Pos| match (board.get(p1), board.get(p2)) {
        (Some(g1), Some(g2)) => can_match(g1, candidate) && can_match(g2, candidate),
        _ => false,
    };

    if pos.x > 1 && completes(Pos::new(pos.x - 1, pos.y), Pos::new(pos.x - 2, pos.y)) {
        return true;
    }
    pos.y > 1 && completes(Pos::new(pos.x, pos.y - 1), Pos::new(pos.x, pos.y - 2))
}

/// Breadth-first flood fill over edge neighbours of exactly `kind`.
///
/// Returns nothing for bombs, or when `start` does not hold `kind`.
pub fn find_connected_group(board: &Board, start: Pos, kind: GemType) -> Vec<Pos> {
    if kind == GemType::Bomb || board.get(start).map(Gem::kind) != Some(kind) {
        return Vec::new();
    }

    let mut group = Vec::new();
    let mut visited = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);

    while let Some(current) = queue.pop_front() {
        group.push(current);

        for (dx, dy) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
            let Some(next) = current.offset(dx, dy) else {
                continue;
            };
            if !board.contains(next) || visited.contains(&next) {
                continue;
            }
            if board.get(next).map(Gem::kind) == Some(kind) {
                visited.insert(next);
                queue.push_back(next);
            }
        }
    }

    debug!("connected {} group from {}: {} cells", kind.as_str(), start, group.len());
    group
}

/// Split the group into maximal straight runs of three or more.
///
/// `key` picks the line a cell belongs to and its coordinate along it.
fn lines_of_three(group: &[Pos], key: impl Fn(Pos) -> (u8, u8), build: impl Fn(u8, u8) -> Pos) -> Vec<Vec<Pos>> {
    let mut by_line: BTreeMap<u8, Vec<u8>> = BTreeMap::new();
    for &pos in group {
        let (line, along) = key(pos);
        by_line.entry(line).or_default().push(along);
    }

    let mut lines = Vec::new();
    for (line, mut coords) in by_line {
        coords.sort_unstable();
        let mut run = vec![coords[0]];
        for &c in &coords[1..] {
            if run.last().is_some_and(|&last| last + 1 == c) {
                run.push(c);
                continue;
            }
            if run.len() >= 3 {
                lines.push(run.iter().map(|&a| build(line, a)).collect());
            }
            run = vec![c];
        }
        if run.len() >= 3 {
            lines.push(run.iter().map(|&a| build(line, a)).collect());
        }
    }
    lines
}

/// The bomb-worthy shape test.
///
/// True for any straight run of four or more, or when a horizontal run of
/// three crosses a vertical run of three. Groups under four never qualify.
pub fn has_straight_line_of_four_or_more(group: &[Pos]) -> bool {
    if group.len() < 4 {
        return false;
    }

    let horizontal = lines_of_three(group, |p| (p.y, p.x), |y, x| Pos::new(x, y));
    if horizontal.iter().any(|line| line.len() >= 4) {
        return true;
    }

    let vertical = lines_of_three(group, |p| (p.x, p.y), |x, y| Pos::new(x, y));
    if vertical.iter().any(|line| line.len() >= 4) {
        return true;
    }

    horizontal
        .iter()
        .any(|h| vertical.iter().any(|v| h.iter().any(|p| v.contains(p))))
}

/// All bomb-worthy groups on the board, in scan order of their seeds
pub fn find_matches_of_four_or_more(board: &Board) -> Vec<MatchGroup> {
    let mut groups = Vec::new();
    let mut visited: HashSet<Pos> = HashSet::new();

    for pos in board.positions() {
        if visited.contains(&pos) {
            continue;
        }
        let Some(kind) = board.get(pos).map(Gem::kind) else {
            continue;
        };
        if kind == GemType::Bomb {
            continue;
        }

        let group = find_connected_group(board, pos, kind);
        if has_straight_line_of_four_or_more(&group) {
            visited.extend(group.iter().copied());
            groups.push(MatchGroup::new(group));
        }
    }
    groups
}

/// Bomb placement anchored on whichever swapped cell belongs to the largest
/// qualifying group. Ties keep the first group found.
pub fn match_of_four_or_more_in_swap_position(board: &Board, a: Pos, b: Pos) -> Option<BombPlacement> {
    let mut best: Option<(Pos, usize)> = None;

    for group in find_matches_of_four_or_more(board) {
        let max = best.map_or(0, |(_, count)| count);
        if group.contains(a) && group.count > max {
            best = Some((a, group.count));
        } else if group.contains(b) && group.count > max {
            best = Some((b, group.count));
        }
    }

    let (pos, _) = best?;
    let color = board.get(pos)?.kind();
    Some(BombPlacement { pos, color })
}

/// Bomb placement at the first cell of the single largest qualifying group
pub fn match_of_four_or_more(board: &Board) -> Option<BombPlacement> {
    let groups = find_matches_of_four_or_more(board);
    let mut largest = groups.first()?;
    for group in &groups {
        if group.count > largest.count {
            largest = group;
        }
    }

    let pos = *largest.positions.first()?;
    let color = board.get(pos)?.kind();
    Some(BombPlacement { pos, color })
}

/// Cells reached by a detonation at `center`: the center, its eight
/// neighbours, then two steps out along each axis. Off-board cells are
/// dropped.
///
/// ```text
///       x
///     x x x
///   x x B x x
///     x x x
///       x
/// ```
pub fn bomb_cross_pattern(board: &Board, center: Pos) -> ArrayVec<Pos, BOMB_PATTERN_CELLS> {
    let mut cells = ArrayVec::new();
    cells.push(center);

    for dx in -1..=1 {
        for dy in -1..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            if let Some(p) = center.offset(dx, dy).filter(|p| board.contains(*p)) {
                cells.push(p);
            }
        }
    }

    for (dx, dy) in [(0, -2), (0, 2), (-2, 0), (2, 0)] {
        if let Some(p) = center.offset(dx, dy).filter(|p| board.contains(*p)) {
            cells.push(p);
        }
    }
    cells
}
