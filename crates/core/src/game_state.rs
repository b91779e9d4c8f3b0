//! Game state module - session data shared by the cascade phases
//!
//! The state never touches the grid; it carries what one phase decides for
//! the next (matches, delayed gems, bomb placements) plus the score and the
//! last swap. Score changes are recorded on the board's log so they stay in
//! causal order with the destroys that caused them.

use crate::board::Board;
use crate::detector::BombPlacement;
use crate::gem::GemId;
use crate::notify::Notification;
use crate::types::Pos;

/// Mutable state of one board's cascade
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameState {
    /// Ids flagged by the latest match pass. Ordered, no duplicates.
    pub(crate) current_matches: Vec<GemId>,
    /// Ability-bearing gems waiting for the next stable pass. Ordered, no
    /// duplicates. Each one stays on the board until it runs.
    delayed_gems: Vec<GemId>,
    pub(crate) bomb_placements: Vec<BombPlacement>,
    last_swap: Option<(Pos, Pos)>,
    swap_happened: bool,
    pub(crate) has_matches: bool,
    pub(crate) need_stable: bool,
    pub(crate) is_stable: bool,
    score: u32,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Add `points` to the score, recording the change on `board`
    pub fn add_score(&mut self, board: &mut Board, points: u32) {
        let old = self.score;
        let new = old.saturating_add(points);
        if new == old {
            return;
        }
        self.score = new;
        board.emit(Notification::ScoreChanged { old, new });
    }

    pub fn current_matches(&self) -> &[GemId] {
        &self.current_matches
    }

    pub fn delayed_gems(&self) -> &[GemId] {
        &self.delayed_gems
    }

    pub fn is_delayed(&self, id: GemId) -> bool {
        self.delayed_gems.contains(&id)
    }

    /// Queue a gem for the next stable pass. Returns false if already queued.
    pub fn delay(&mut self, id: GemId) -> bool {
        if self.is_delayed(id) {
            return false;
        }
        self.delayed_gems.push(id);
        true
    }

    /// Drop a gem from the queue. Returns false if it was not queued.
    pub fn undelay(&mut self, id: GemId) -> bool {
        let before = self.delayed_gems.len();
        self.delayed_gems.retain(|&queued| queued != id);
        self.delayed_gems.len() != before
    }

    pub fn bomb_placements(&self) -> &[BombPlacement] {
        &self.bomb_placements
    }

    /// Remember the positions of a player swap
    pub fn record_swap(&mut self, a: Pos, b: Pos) {
        self.last_swap = Some((a, b));
        self.swap_happened = true;
    }

    /// Forget that the current cascade was started by a swap. The positions
    /// stay readable through [`GameState::last_swap`] until [`GameState::clear_swap`].
    pub fn consume_swap(&mut self) {
        self.swap_happened = false;
    }

    /// Drop the swap record once its cascade is over
    pub fn clear_swap(&mut self) {
        self.swap_happened = false;
        self.last_swap = None;
    }

    pub fn last_swap(&self) -> Option<(Pos, Pos)> {
        self.last_swap
    }

    pub fn swap_happened(&self) -> bool {
        self.swap_happened
    }

    pub fn has_matches(&self) -> bool {
        self.has_matches
    }

    pub fn need_stable(&self) -> bool {
        self.need_stable
    }

    pub fn is_stable(&self) -> bool {
        self.is_stable
    }

    /// Clear per-cascade data. Score and the delayed queue survive.
    pub fn reset(&mut self) {
        self.current_matches.clear();
        self.bomb_placements.clear();
        self.has_matches = false;
        self.need_stable = false;
        self.is_stable = false;
        self.swap_happened = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_change_is_recorded() {
        let mut board = Board::new(3, 3);
        let mut state = GameState::new();

        state.add_score(&mut board, 30);
        state.add_score(&mut board, 0);
        state.add_score(&mut board, 10);

        assert_eq!(state.score(), 40);
        assert_eq!(
            board.take_notifications(),
            vec![
                Notification::ScoreChanged { old: 0, new: 30 },
                Notification::ScoreChanged { old: 30, new: 40 },
            ]
        );
    }

    #[test]
    fn test_delay_queue_is_ordered_set() {
        let mut state = GameState::new();
        assert!(state.delay(GemId(2)));
        assert!(state.delay(GemId(1)));
        assert!(!state.delay(GemId(2)));
        assert_eq!(state.delayed_gems(), &[GemId(2), GemId(1)]);

        assert!(state.undelay(GemId(2)));
        assert!(!state.undelay(GemId(2)));
        assert_eq!(state.delayed_gems(), &[GemId(1)]);
    }

    #[test]
    fn test_swap_record_lives_until_cleared() {
        let mut state = GameState::new();
        state.record_swap(Pos::new(0, 0), Pos::new(1, 0));
        assert!(state.swap_happened());

        state.consume_swap();
        assert!(!state.swap_happened());
        assert_eq!(state.last_swap(), Some((Pos::new(0, 0), Pos::new(1, 0))));

        state.clear_swap();
        assert_eq!(state.last_swap(), None);
    }

    #[test]
    fn test_reset_keeps_score_and_delayed() {
        let mut board = Board::new(3, 3);
        let mut state = GameState::new();
        state.add_score(&mut board, 10);
        state.delay(GemId(5));
        state.has_matches = true;
        state.is_stable = true;

        state.reset();

        assert_eq!(state.score(), 10);
        assert_eq!(state.delayed_gems(), &[GemId(5)]);
        assert!(!state.has_matches());
        assert!(!state.is_stable());
    }
}
