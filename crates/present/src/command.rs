//! Board commands - the presentation-side view of a notification

use gem_cascade_core::{AffectedGem, GemRef};

use crate::types::Pos;

/// One thing a view has to show
#[derive(Debug, Clone, PartialEq)]
pub enum BoardCommand {
    Spawn {
        gem: GemRef,
        at: Pos,
    },
    Move {
        gem: GemRef,
        from: Pos,
        to: Pos,
    },
    Swap {
        a: Pos,
        b: Pos,
        gem_a: Option<GemRef>,
        gem_b: Option<GemRef>,
    },
    Destroy {
        gem: GemRef,
        at: Pos,
    },
    /// Neighbours vanish together after `neighbor_delay_ms`, the bomb
    /// `bomb_delay_ms` later
    BombExplosion {
        bomb: GemRef,
        at: Pos,
        neighbors: Vec<AffectedGem>,
        neighbor_delay_ms: u32,
        bomb_delay_ms: u32,
    },
    ScoreUpdate {
        old: u32,
        new: u32,
    },
}

impl BoardCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BoardCommand::Spawn { .. } => "Spawn",
            BoardCommand::Move { .. } => "Move",
            BoardCommand::Swap { .. } => "Swap",
            BoardCommand::Destroy { .. } => "Destroy",
            BoardCommand::BombExplosion { .. } => "BombExplosion",
            BoardCommand::ScoreUpdate { .. } => "ScoreUpdate",
        }
    }

    /// Human-readable one-liner for logs
    pub fn details(&self) -> String {
        let kind = |gem: &GemRef| gem.kind.as_str();
        match self {
            BoardCommand::Spawn { gem, at } => format!("{} {} at {}", kind(gem), gem.id, at),
            BoardCommand::Move { gem, from, to } => {
                format!("{} {} {} -> {}", kind(gem), gem.id, from, to)
            }
            BoardCommand::Swap { a, b, .. } => format!("{} <-> {}", a, b),
            BoardCommand::Destroy { gem, at } => format!("{} {} at {}", kind(gem), gem.id, at),
            BoardCommand::BombExplosion { bomb, at, neighbors, .. } => {
                format!("bomb {} at {}, {} neighbor(s)", bomb.id, at, neighbors.len())
            }
            BoardCommand::ScoreUpdate { old, new } => format!("{} -> {}", old, new),
        }
    }

    /// Global commands run one after another before any column command
    pub fn is_global(&self) -> bool {
        !matches!(self, BoardCommand::Spawn { .. } | BoardCommand::Move { .. })
    }
}
