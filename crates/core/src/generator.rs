//! Gem generation for the initial fill and refills

use log::warn;

use crate::board::Board;
use crate::config::{GemCatalog, GemSpec};
use crate::detector::can_match;
use crate::gem::{Gem, GemId};
use crate::rng::SimpleRng;
use crate::types::{GemType, Pos};

/// Source of new gems
pub trait GemGenerator {
    /// Produce a gem for the empty cell `pos`. Never a bomb.
    fn generate_gem(&mut self, board: &Board, pos: Pos, id: GemId) -> Gem;
}

/// Draws uniformly among the catalog kinds that would not complete a run
/// of three through `pos`; falls back to the whole catalog when every kind
/// would.
#[derive(Debug, Clone)]
pub struct DistinctGemGenerator {
    specs: Vec<GemSpec>,
    rng: SimpleRng,
}

/// The three windows along one axis that contain the probed cell, as the
/// offsets of the other two cells
const WINDOWS: [[i8; 2]; 3] = [[-2, -1], [-1, 1], [1, 2]];

impl DistinctGemGenerator {
    pub fn new(catalog: &GemCatalog, seed: u32) -> Self {
        let mut specs: Vec<GemSpec> = catalog
            .gems
            .iter()
            .copied()
            .filter(|spec| spec.kind != GemType::Bomb)
            .collect();
        if specs.is_empty() {
            warn!("catalog has no color gems; generating from the default catalog");
            specs = GemCatalog::default().gems;
        }
        Self {
            specs,
            rng: SimpleRng::new(seed),
        }
    }

    /// True if `probe` at `pos` would complete any run of three
    fn completes_run(board: &Board, pos: Pos, probe: &Gem) -> bool {
        let pair_matches = |offsets: [(i8, i8); 2]| {
            offsets.iter().all(|&(dx, dy)| {
                pos.offset(dx, dy)
                    .filter(|p| board.contains(*p))
                    .and_then(|p| board.get(p))
                    .is_some_and(|other| can_match(other, probe))
            })
        };

        WINDOWS.iter().any(|&[a, b]| {
            pair_matches([(a, 0), (b, 0)]) || pair_matches([(0, a), (0, b)])
        })
    }
}

impl GemGenerator for DistinctGemGenerator {
    fn generate_gem(&mut self, board: &Board, pos: Pos, id: GemId) -> Gem {
        let safe: Vec<GemSpec> = self
            .specs
            .iter()
            .copied()
            .filter(|spec| !Self::completes_run(board, pos, &Gem::new(id, spec.kind, spec.score)))
            .collect();

        let pool = if safe.is_empty() { &self.specs } else { &safe };
        let spec = match self.rng.pick(pool) {
            Some(spec) => *spec,
            None => GemSpec {
                kind: GemType::Blue,
                score: 0,
            },
        };
        Gem::new(id, spec.kind, spec.score)
    }
}
