//! Special abilities bound to gems
//!
//! The ability set is closed: adding one means adding an [`Ability`]
//! variant and handling it in [`Ability::execute`].

use log::{debug, info};

use crate::board::Board;
use crate::detector::bomb_cross_pattern;
use crate::game_state::GameState;
use crate::gem::GemId;
use crate::notify::{AffectedGem, GemRef, Notification};
use crate::types::{GemType, Pos, BOMB_DESTROY_DELAY_MS, NEIGHBOR_DESTROY_DELAY_MS};

/// Parameters the factory bakes into new abilities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbilityConfig {
    pub neighbor_delay_ms: u32,
    pub bomb_delay_ms: u32,
}

impl Default for AbilityConfig {
    fn default() -> Self {
        Self {
            neighbor_delay_ms: NEIGHBOR_DESTROY_DELAY_MS,
            bomb_delay_ms: BOMB_DESTROY_DELAY_MS,
        }
    }
}

/// Cross-shaped blast; timing fields are presentation hints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BombAbility {
    pub neighbor_delay_ms: u32,
    pub bomb_delay_ms: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ability {
    Bomb(BombAbility),
}

/// What one execution did to the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detonation {
    pub at: Pos,
    /// Removed gems, the source gem included
    pub destroyed: Vec<GemId>,
    /// Ability-bearing gems in range, queued instead of destroyed
    pub deferred: Vec<GemId>,
}

/// Bind the ability for `kind`, if it has one
pub fn create_ability(kind: GemType, config: &AbilityConfig) -> Option<Ability> {
    match kind {
        GemType::Bomb => Some(Ability::Bomb(BombAbility {
            neighbor_delay_ms: config.neighbor_delay_ms,
            bomb_delay_ms: config.bomb_delay_ms,
        })),
        _ => None,
    }
}

impl Ability {
    pub fn name(&self) -> &'static str {
        match self {
            Ability::Bomb(_) => "bomb",
        }
    }

    /// Run the ability of gem `source`.
    ///
    /// The gem leaves the delayed queue first, so a gem never runs twice.
    /// Returns `None` if it is no longer on the board.
    pub fn execute(&self, source: GemId, board: &mut Board, state: &mut GameState) -> Option<Detonation> {
        state.undelay(source);
        match self {
            Ability::Bomb(bomb) => bomb.execute(source, board, state),
        }
    }
}

impl BombAbility {
    fn execute(&self, source: GemId, board: &mut Board, state: &mut GameState) -> Option<Detonation> {
        let Some(at) = board.find_position(source) else {
            debug!("bomb {} already gone, nothing to detonate", source);
            return None;
        };

        let mut victims = Vec::new();
        let mut deferred = Vec::new();
        for pos in bomb_cross_pattern(board, at) {
            let Some(gem) = board.get(pos) else {
                continue;
            };
            if gem.id() != source && gem.has_ability() {
                deferred.push(gem.id());
            } else {
                victims.push((pos, GemRef::from(gem)));
            }
        }

        for &id in &deferred {
            state.delay(id);
        }

        let bomb = victims
            .iter()
            .find(|(_, r)| r.id == source)
            .map(|&(_, r)| r)?;
        board.emit(Notification::BombExploded {
            bomb,
            at,
            affected: victims
                .iter()
                .map(|&(pos, gem)| AffectedGem { pos, gem })
                .collect(),
            neighbor_delay_ms: self.neighbor_delay_ms,
            bomb_delay_ms: self.bomb_delay_ms,
        });

        let mut destroyed = Vec::with_capacity(victims.len());
        for (pos, r) in victims {
            if board.destroy(pos).is_some() {
                destroyed.push(r.id);
            }
        }

        info!(
            "bomb {} detonated at {}: {} destroyed, {} deferred",
            source,
            at,
            destroyed.len(),
            deferred.len()
        );
        Some(Detonation { at, destroyed, deferred })
    }
}
