//! Snapshot module - serializable view of a board for observers
//!
//! Captures glyph rows, bomb details and the score so the demo can print or
//! stream a board without holding a reference into the session.

use serde::Serialize;

use crate::board::Board;
use crate::game_state::GameState;
use crate::gem::GemId;
use crate::types::{GemType, Pos};

/// A bomb on the board at capture time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BombSnapshot {
    pub id: GemId,
    pub pos: Pos,
    pub color: Option<GemType>,
    pub armed: bool,
    pub delayed: bool,
}

/// Read-only copy of a board and the state around it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardSnapshot {
    pub width: u8,
    pub height: u8,
    pub score: u32,
    /// Glyph rows, top row first, `.` for empty
    pub rows: Vec<String>,
    pub bombs: Vec<BombSnapshot>,
}

impl BoardSnapshot {
    pub fn capture(board: &Board, state: &GameState) -> Self {
        let bombs = board
            .gems()
            .filter(|(_, gem)| gem.kind() == GemType::Bomb)
            .map(|(pos, gem)| BombSnapshot {
                id: gem.id(),
                pos,
                color: gem.colored_bomb().map(|tag| tag.match_color),
                armed: gem.has_ability(),
                delayed: state.is_delayed(gem.id()),
            })
            .collect();

        Self {
            width: board.width(),
            height: board.height(),
            score: state.score(),
            rows: board.to_rows(),
            bombs,
        }
    }

    /// Multi-line text rendering with a score footer
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity(self.rows.len() * (self.width as usize + 1) + 16);
        for row in &self.rows {
            out.push_str(row);
            out.push('\n');
        }
        out.push_str(&format!("score: {}", self.score));
        out
    }

    pub fn empty_cells(&self) -> usize {
        self.rows.iter().flat_map(|r| r.chars()).filter(|&c| c == '.').count()
    }
}

impl std::fmt::Display for BoardSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_ascii())
    }
}
