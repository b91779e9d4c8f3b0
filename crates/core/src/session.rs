//! Session - one board, its state, and the swipe entry point
//!
//! A swipe is validated, applied, and either reverted (nothing would match)
//! or resolved to a stable board before `swipe` returns. The model never
//! waits on presentation: callers drain [`Session::take_notifications`]
//! after each call and replay them at their own pace.

use log::{info, warn};
use thiserror::Error;

use crate::ability::AbilityConfig;
use crate::board::Board;
use crate::config::{ConfigError, GemCatalog, SessionConfig};
use crate::detector::{can_match, find_all_matches, matches_at};
use crate::game_state::GameState;
use crate::gem::GemId;
use crate::generator::{DistinctGemGenerator, GemGenerator};
use crate::notify::Notification;
use crate::phase::{CascadeReport, PhaseContext};
use crate::snapshot::BoardSnapshot;
use crate::types::{Pos, SpawnKind, MAX_GENERATION_ATTEMPTS};

/// Why a swipe could not be applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SwipeError {
    #[error("{0} is outside the board")]
    OutOfBounds(Pos),
    #[error("{0} and {1} are not adjacent")]
    NotAdjacent(Pos, Pos),
    #[error("no gem at {0}")]
    EmptyCell(Pos),
}

impl SwipeError {
    pub fn code(self) -> &'static str {
        match self {
            SwipeError::OutOfBounds(_) => "out_of_bounds",
            SwipeError::NotAdjacent(..) => "not_adjacent",
            SwipeError::EmptyCell(_) => "empty_cell",
        }
    }
}

/// Result of a valid swipe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeOutcome {
    /// Nothing matched; the swap was undone
    Reverted,
    /// The swap stood and the board was resolved
    Resolved(CascadeReport),
}

impl SwipeOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SwipeOutcome::Resolved(_))
    }

    pub fn report(&self) -> Option<CascadeReport> {
        match self {
            SwipeOutcome::Resolved(report) => Some(*report),
            SwipeOutcome::Reverted => None,
        }
    }
}

/// One playable board
pub struct Session<G: GemGenerator = DistinctGemGenerator> {
    board: Board,
    state: GameState,
    generator: G,
    catalog: GemCatalog,
    abilities: AbilityConfig,
}

impl Session<DistinctGemGenerator> {
    /// Validate `config`, then build and fill a board
    pub fn new(config: &SessionConfig) -> Result<Self, ConfigError> {
        let generator = DistinctGemGenerator::new(&config.catalog, config.seed);
        Self::with_generator(config, generator)
    }
}

impl<G: GemGenerator> Session<G> {
    /// Like [`Session::new`] with a caller-supplied generator
    pub fn with_generator(config: &SessionConfig, generator: G) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut session = Self {
            board: Board::new(config.width, config.height),
            state: GameState::new(),
            generator,
            catalog: config.catalog.clone(),
            abilities: config.ability_config(),
        };
        session.populate();
        Ok(session)
    }

    /// Adopt an existing board as-is (no initial fill). Only the catalog
    /// and timing of `config` are used.
    pub fn from_board(board: Board, generator: G, config: &SessionConfig) -> Self {
        Self {
            board,
            state: GameState::new(),
            generator,
            catalog: config.catalog.clone(),
            abilities: config.ability_config(),
        }
    }

    /// Fill every cell, re-drawing a gem that would complete a run
    fn populate(&mut self) {
        self.board.begin_batch();
        let cells: Vec<Pos> = self.board.positions().collect();
        for pos in cells {
            let id = self.board.allocate_id();
            let mut gem = self.generator.generate_gem(&self.board, pos, id);
            let mut attempts = 0;
            while matches_at(&self.board, pos, &gem) && attempts < MAX_GENERATION_ATTEMPTS {
                gem = self.generator.generate_gem(&self.board, pos, id);
                attempts += 1;
            }
            if attempts == MAX_GENERATION_ATTEMPTS {
                warn!("no match-free gem for {} after {} attempts, accepting {}", pos, attempts, gem);
            }
            self.board.set(pos, Some(gem), SpawnKind::Instant);
        }
        self.board.end_batch();
        self.board.set_dirty(false);
    }

    pub fn width(&self) -> u8 {
        self.board.width()
    }

    pub fn height(&self) -> u8 {
        self.board.height()
    }

    pub fn score(&self) -> u32 {
        self.state.score()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot::capture(&self.board, &self.state)
    }

    /// Drain everything recorded since the last call
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.board.take_notifications()
    }

    /// Swap the gems at `a` and `b` and resolve the consequences.
    pub fn swipe(&mut self, a: Pos, b: Pos) -> Result<SwipeOutcome, SwipeError> {
        for pos in [a, b] {
            if !self.board.contains(pos) {
                return Err(SwipeError::OutOfBounds(pos));
            }
        }
        if !a.is_adjacent(b) {
            return Err(SwipeError::NotAdjacent(a, b));
        }
        for pos in [a, b] {
            if self.board.get(pos).is_none() {
                return Err(SwipeError::EmptyCell(pos));
            }
        }

        self.state.reset();
        self.state.record_swap(a, b);
        self.board.swap(a, b);
        find_all_matches(&mut self.board);

        // After the swap the gem that started at `a` sits at `b`
        let moved = [self.swapped_gem(b), self.swapped_gem(a)];
        let any_flagged = moved.iter().any(|&(_, flagged, _)| flagged);
        let any_ability = moved.iter().any(|&(_, _, armed)| armed);
        // A colored bomb swapped with a gem of its color counts as matched
        let paired = match (self.board.get(a), self.board.get(b)) {
            (Some(x), Some(y)) => can_match(x, y),
            _ => false,
        };

        if !any_flagged && !any_ability {
            self.board.swap(b, a);
            self.board.clear_match_flags();
            self.state.clear_swap();
            info!("swipe {} <-> {} reverted", a, b);
            return Ok(SwipeOutcome::Reverted);
        }

        let mut ctx = PhaseContext::new(
            &mut self.board,
            &mut self.state,
            &mut self.generator,
            &self.catalog,
            self.abilities,
        );
        for (id, flagged, armed) in moved {
            if armed && (flagged || paired || !any_flagged) {
                ctx.detonate(id);
            }
        }
        let report = ctx.run_cascade();

        info!(
            "swipe {} <-> {} resolved: {} tick(s), {} bomb(s) created, {} detonated, +{}",
            a, b, report.ticks, report.bombs_created, report.bombs_detonated, report.score_gained
        );
        Ok(SwipeOutcome::Resolved(report))
    }

    /// (id, is_match, has_ability) of the gem now at `pos`
    fn swapped_gem(&self, pos: Pos) -> (GemId, bool, bool) {
        let gem = self
            .board
            .get(pos)
            .unwrap_or_else(|| panic!("swapped cell {} is empty", pos));
        (gem.id(), gem.is_match, gem.has_ability())
    }
}
