//! Phase state machine - one cascade, phase by phase
//!
//! A cascade repeats `Match -> Destroy -> FillBoard` until a pass neither
//! matches nor moves anything, then runs `Stable`, which detonates the gems
//! queued so far. Detonations dirty the board, so the whole loop runs again
//! until a stable pass leaves the board untouched.
//!
//! Every phase brackets its board mutations in batches; the presentation
//! layer replays one batch at a time.

use log::{debug, info, warn};
use serde::Serialize;

use crate::ability::{create_ability, AbilityConfig, Detonation};
use crate::board::Board;
use crate::config::GemCatalog;
use crate::detector::{find_all_matches, match_of_four_or_more, match_of_four_or_more_in_swap_position};
use crate::game_state::GameState;
use crate::gem::{Gem, GemId};
use crate::generator::GemGenerator;
use crate::types::{GemType, Pos, SpawnKind, MAX_CASCADE_TICKS};

/// The four cascade phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Match,
    Destroy,
    FillBoard,
    Stable,
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Match => "Match",
            Phase::Destroy => "Destroy",
            Phase::FillBoard => "FillBoard",
            Phase::Stable => "Stable",
        }
    }
}

/// Tallies for one resolved swipe
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CascadeReport {
    /// Match/Destroy/FillBoard passes
    pub ticks: u32,
    pub stable_passes: u32,
    pub bombs_created: u32,
    pub bombs_detonated: u32,
    pub score_gained: u32,
    /// The tick limit cut the cascade off before it settled
    pub stalled: bool,
}

/// Runs phases against one board and its state
pub struct PhaseContext<'a, G: GemGenerator + ?Sized> {
    board: &'a mut Board,
    state: &'a mut GameState,
    generator: &'a mut G,
    catalog: &'a GemCatalog,
    abilities: AbilityConfig,
    current: Option<Phase>,
    report: CascadeReport,
}

impl<'a, G: GemGenerator + ?Sized> PhaseContext<'a, G> {
    pub fn new(
        board: &'a mut Board,
        state: &'a mut GameState,
        generator: &'a mut G,
        catalog: &'a GemCatalog,
        abilities: AbilityConfig,
    ) -> Self {
        Self {
            board,
            state,
            generator,
            catalog,
            abilities,
            current: None,
            report: CascadeReport::default(),
        }
    }

    /// The last phase executed
    pub fn current(&self) -> Option<Phase> {
        self.current
    }

    pub fn report(&self) -> CascadeReport {
        self.report
    }

    pub fn execute(&mut self, phase: Phase) {
        debug!(
            "enter {} (from {})",
            phase.name(),
            self.current.map_or("none", |p| p.name())
        );
        match phase {
            Phase::Match => self.run_match(),
            Phase::Destroy => self.run_destroy(),
            Phase::FillBoard => self.run_fill(),
            Phase::Stable => self.run_stable(),
        }
        debug!("exit {}", phase.name());
        self.current = Some(phase);
    }

    /// Resolve until stable. A settled board has no removable matches and
    /// no queued gems. A generator that keeps refilling runs is stopped after
    /// [`MAX_CASCADE_TICKS`] passes and the report is marked `stalled`.
    pub fn run_cascade(&mut self) -> CascadeReport {
        let start_score = self.state.score();

        'cascade: loop {
            loop {
                if self.report.ticks >= MAX_CASCADE_TICKS {
                    warn!("cascade still matching after {} ticks, giving up", self.report.ticks);
                    self.report.stalled = true;
                    break 'cascade;
                }
                self.board.set_dirty(false);
                self.execute(Phase::Match);
                self.execute(Phase::Destroy);
                self.execute(Phase::FillBoard);
                self.report.ticks += 1;
                debug!(
                    "tick {}: matches={} dirty={}",
                    self.report.ticks,
                    self.state.has_matches,
                    self.board.is_dirty()
                );
                if !(self.state.has_matches || self.board.is_dirty()) {
                    break;
                }
            }

            self.execute(Phase::Stable);
            if !self.board.is_dirty() {
                break;
            }
        }

        self.state.clear_swap();
        self.report.score_gained = self.state.score().saturating_sub(start_score);
        self.report
    }

    /// Run the ability of gem `id` in its own batch.
    ///
    /// A gem that is gone or has no ability only leaves the delayed queue.
    pub fn detonate(&mut self, id: GemId) -> Option<Detonation> {
        let ability = self
            .board
            .find_position(id)
            .and_then(|pos| self.board.get(pos))
            .and_then(|gem| gem.ability().copied());
        let Some(ability) = ability else {
            self.state.undelay(id);
            debug!("gem {} has nothing to detonate", id);
            return None;
        };

        self.board.begin_batch();
        let blast = ability.execute(id, self.board, self.state);
        self.board.end_batch();

        if blast.is_some() {
            self.report.bombs_detonated += 1;
        }
        blast
    }

    fn run_match(&mut self) {
        let matches = find_all_matches(self.board);

        let armed: Vec<GemId> = self
            .board
            .gems()
            .filter(|(_, gem)| gem.is_match && gem.has_ability())
            .map(|(_, gem)| gem.id())
            .collect();
        for id in armed {
            if self.state.delay(id) {
                debug!("gem {} matched, delayed until stable", id);
            }
        }

        // Queued gems stay on the board, so they alone cannot keep the
        // loop going
        self.state.has_matches = matches.iter().any(|&id| !self.state.is_delayed(id));
        self.state.current_matches = matches;

        if !self.state.has_matches {
            self.state.need_stable = true;
            self.state.bomb_placements.clear();
            return;
        }

        let placement = match (self.state.swap_happened(), self.state.last_swap()) {
            (true, Some((a, b))) => match_of_four_or_more_in_swap_position(self.board, a, b),
            _ => match_of_four_or_more(self.board),
        };
        self.state.bomb_placements = placement.into_iter().collect();
    }

    fn run_destroy(&mut self) {
        if !self.state.has_matches {
            return;
        }

        self.board.begin_batch();
        let matches = std::mem::take(&mut self.state.current_matches);
        for &id in &matches {
            if self.state.is_delayed(id) {
                continue;
            }
            let pos = self
                .board
                .find_position(id)
                .unwrap_or_else(|| panic!("matched gem {} is not on the board", id));
            let points = self.board.get(pos).map_or(0, Gem::score_value);
            self.state.add_score(self.board, points);
            self.board.destroy(pos);
        }
        self.state.current_matches = matches;
        self.board.end_batch();

        self.board.begin_batch();
        let placements = std::mem::take(&mut self.state.bomb_placements);
        for placement in placements {
            self.place_bomb(placement.pos, placement.color);
        }
        self.board.end_batch();

        self.state.consume_swap();
    }

    fn place_bomb(&mut self, pos: Pos, color: GemType) {
        if let Some(occupant) = self.board.get(pos) {
            warn!("bomb placement {} occupied by {}, skipping", pos, occupant);
            return;
        }

        let id = self.board.allocate_id();
        let bomb = Gem::from_template(&self.catalog.bomb_template(), id)
            .with_colored_bomb(color)
            .with_ability(create_ability(GemType::Bomb, &self.abilities));
        info!("bomb {} created at {} ({})", id, pos, color.as_str());
        self.board.set(pos, Some(bomb), SpawnKind::Instant);
        self.report.bombs_created += 1;
    }

    fn run_fill(&mut self) {
        self.board.begin_batch();

        for x in 0..self.board.width() {
            let mut holes = 0u8;
            for y in 0..self.board.height() {
                let pos = Pos::new(x, y);
                if self.board.get(pos).is_none() {
                    holes += 1;
                } else if holes > 0 {
                    self.board.move_gem(pos, Pos::new(x, y - holes));
                }
            }
        }

        let empty: Vec<Pos> = self
            .board
            .positions()
            .filter(|&pos| self.board.get(pos).is_none())
            .collect();
        for pos in empty {
            let id = self.board.allocate_id();
            let gem = self.generator.generate_gem(self.board, pos, id);
            self.board.set(pos, Some(gem), SpawnKind::FallFromTop);
        }

        self.board.end_batch();
    }

    fn run_stable(&mut self) {
        self.state.is_stable = true;
        self.state.need_stable = false;
        self.report.stable_passes += 1;

        let pending = self.state.delayed_gems().to_vec();
        if !pending.is_empty() {
            debug!("stable pass detonating {} delayed gem(s)", pending.len());
        }
        for id in pending {
            self.detonate(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::DistinctGemGenerator;

    fn context_parts(rows: &[&str]) -> (Board, GameState, DistinctGemGenerator, GemCatalog) {
        let catalog = GemCatalog::default();
        let generator = DistinctGemGenerator::new(&catalog, 9);
        (Board::from_rows(rows, 10), GameState::new(), generator, catalog)
    }

    #[test]
    fn test_fill_compacts_columns_downward() {
        let (mut board, mut state, mut generator, catalog) = context_parts(&["R", ".", "G", "."]);
        let red = board.get_xy(0, 3).unwrap().id();
        let green = board.get_xy(0, 1).unwrap().id();

        let mut ctx = PhaseContext::new(&mut board, &mut state, &mut generator, &catalog, AbilityConfig::default());
        ctx.execute(Phase::FillBoard);
        assert_eq!(ctx.current(), Some(Phase::FillBoard));

        assert_eq!(board.find_position(green), Some(Pos::new(0, 0)));
        assert_eq!(board.find_position(red), Some(Pos::new(0, 1)));
        assert_eq!(board.empty_count(), 0);

        let log = board.take_notifications();
        assert_eq!(log.first().map(|n| n.name()), Some("batchStarted"));
        assert_eq!(log.last().map(|n| n.name()), Some("batchEnded"));
        let moves = log.iter().filter(|n| n.name() == "gemMoved").count();
        let spawns = log.iter().filter(|n| n.name() == "gemSpawned").count();
        assert_eq!(moves, 2);
        assert_eq!(spawns, 2);
    }

    #[test]
    fn test_match_without_runs_requests_stable() {
        let (mut board, mut state, mut generator, catalog) = context_parts(&["RGB", "GBR", "BRG"]);
        let mut ctx = PhaseContext::new(&mut board, &mut state, &mut generator, &catalog, AbilityConfig::default());
        ctx.execute(Phase::Match);
        ctx.execute(Phase::Destroy);
        assert!(!state.has_matches());
        assert!(state.need_stable());
        assert!(board.take_notifications().is_empty());
    }

    #[test]
    fn test_destroy_scores_and_skips_delayed() {
        let (mut board, mut state, mut generator, catalog) = context_parts(&["GBG", "BGB", "RRR"]);
        let mut ctx = PhaseContext::new(&mut board, &mut state, &mut generator, &catalog, AbilityConfig::default());
        ctx.execute(Phase::Match);
        ctx.execute(Phase::Destroy);

        assert_eq!(state.score(), 30);
        assert_eq!(board.empty_count(), 3);
        let scores: Vec<_> = board
            .take_notifications()
            .into_iter()
            .filter(|n| n.name() == "scoreChanged")
            .collect();
        assert_eq!(scores.len(), 3);
    }

    #[test]
    fn test_stable_detonates_snapshot_only() {
        let (mut board, mut state, mut generator, catalog) = context_parts(&["RGBY", "GBYR", "BYRG", "YRGB"]);
        let config = AbilityConfig::default();
        for pos in [Pos::new(0, 0), Pos::new(1, 1)] {
            board.destroy(pos);
            let id = board.allocate_id();
            let bomb = Gem::new(id, GemType::Bomb, 50)
                .with_colored_bomb(GemType::Red)
                .with_ability(create_ability(GemType::Bomb, &config));
            board.set(pos, Some(bomb), SpawnKind::Instant);
        }
        let first = board.get_xy(0, 0).unwrap().id();
        let second = board.get_xy(1, 1).unwrap().id();
        state.delay(first);

        let mut ctx = PhaseContext::new(&mut board, &mut state, &mut generator, &catalog, config);
        ctx.execute(Phase::Stable);
        let report = ctx.report();

        assert_eq!(report.bombs_detonated, 1);
        assert!(state.is_stable());
        // The neighbour was queued during the pass and waits for the next one
        assert_eq!(state.delayed_gems(), &[second]);
        assert!(board.find_position(second).is_some());
        assert!(board.find_position(first).is_none());
    }
}
