//! Shared helpers for the integration tests

#![allow(dead_code)]

use std::collections::VecDeque;

use gem_cascade::core::{
    create_ability, AbilityConfig, Board, DistinctGemGenerator, Gem, GemCatalog, GemGenerator, GemId,
    SessionConfig,
};
use gem_cascade::types::{GemType, Pos, SpawnKind};

/// Hands out queued kinds first, then defers to a seeded generator
pub struct ScriptedGenerator {
    queue: VecDeque<GemType>,
    fallback: DistinctGemGenerator,
}

impl ScriptedGenerator {
    pub fn new(kinds: &[GemType]) -> Self {
        Self {
            queue: kinds.iter().copied().collect(),
            fallback: DistinctGemGenerator::new(&GemCatalog::default(), 3),
        }
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl GemGenerator for ScriptedGenerator {
    fn generate_gem(&mut self, board: &Board, pos: Pos, id: GemId) -> Gem {
        match self.queue.pop_front() {
            Some(kind) => Gem::new(id, kind, 10),
            None => self.fallback.generate_gem(board, pos, id),
        }
    }
}

/// Replace whatever sits at `pos` with an armed colored bomb
pub fn place_armed_bomb(board: &mut Board, pos: Pos, color: GemType) -> GemId {
    board.destroy(pos);
    let id = board.allocate_id();
    let bomb = Gem::new(id, GemType::Bomb, 50)
        .with_colored_bomb(color)
        .with_ability(create_ability(GemType::Bomb, &AbilityConfig::default()));
    board.set(pos, Some(bomb), SpawnKind::Instant);
    id
}

/// 5x5 layout without any run of three
pub const LATIN_5X5: [&str; 5] = ["RGBYP", "GBYPR", "BYPRG", "YPRGB", "PRGBY"];

pub fn config() -> SessionConfig {
    SessionConfig {
        width: 5,
        height: 5,
        ..SessionConfig::default()
    }
}

pub fn id_at(board: &Board, x: u8, y: u8) -> GemId {
    board
        .get_xy(x, y)
        .unwrap_or_else(|| panic!("no gem at ({}, {})", x, y))
        .id()
}
