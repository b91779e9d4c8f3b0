//! Notification module - the ordered mutation log
//!
//! Every board mutation appends one [`Notification`]. The log is drained by
//! the caller after each model call and handed to the presentation boundary,
//! so nothing outside the model runs while the model is mutating.

use serde::Serialize;

use crate::gem::{Gem, GemId};
use crate::types::{GemType, Pos, SpawnKind};

/// What the presentation layer needs to know about a gem without touching
/// the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GemRef {
    pub id: GemId,
    pub kind: GemType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_color: Option<GemType>,
}

impl From<&Gem> for GemRef {
    fn from(gem: &Gem) -> Self {
        Self {
            id: gem.id(),
            kind: gem.kind(),
            match_color: gem.colored_bomb().map(|tag| tag.match_color),
        }
    }
}

/// A gem caught in a blast, with the cell it occupied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AffectedGem {
    pub pos: Pos,
    pub gem: GemRef,
}

/// One entry of the mutation log, in causal order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Notification {
    BatchStarted,
    BatchEnded,
    GemMoved {
        from: Pos,
        to: Pos,
        gem: GemRef,
    },
    GemDestroyed {
        pos: Pos,
        gem: GemRef,
    },
    GemSpawned {
        pos: Pos,
        gem: GemRef,
        spawn: SpawnKind,
    },
    /// Occupants are captured before the swap is applied
    #[serde(rename_all = "camelCase")]
    GemsSwapped {
        a: Pos,
        b: Pos,
        gem_a: Option<GemRef>,
        gem_b: Option<GemRef>,
    },
    /// Emitted before the affected gems are destroyed. `affected` includes
    /// the bomb itself.
    #[serde(rename_all = "camelCase")]
    BombExploded {
        bomb: GemRef,
        at: Pos,
        affected: Vec<AffectedGem>,
        neighbor_delay_ms: u32,
        bomb_delay_ms: u32,
    },
    ScoreChanged {
        old: u32,
        new: u32,
    },
}

impl Notification {
    pub fn name(&self) -> &'static str {
        match self {
            Notification::BatchStarted => "batchStarted",
            Notification::BatchEnded => "batchEnded",
            Notification::GemMoved { .. } => "gemMoved",
            Notification::GemDestroyed { .. } => "gemDestroyed",
            Notification::GemSpawned { .. } => "gemSpawned",
            Notification::GemsSwapped { .. } => "gemsSwapped",
            Notification::BombExploded { .. } => "bombExploded",
            Notification::ScoreChanged { .. } => "scoreChanged",
        }
    }

    /// Serialize as one JSON line (for wire logs and the demo's `--json` mode)
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
