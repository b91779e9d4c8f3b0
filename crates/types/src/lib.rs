//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! Everything here is plain data, usable from the model, the presentation
//! boundary, and the demo binary alike.
//!
//! # Coordinates
//!
//! Cells are addressed by [`Pos`] `(x, y)`, 0-indexed:
//!
//! - **x**: column, left to right
//! - **y**: row, bottom to top (row 0 is the bottom, gravity pulls toward it)
//!
//! # Board Dimensions
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_BOARD_WIDTH` | 7 | Columns on a default board |
//! | `DEFAULT_BOARD_HEIGHT` | 7 | Rows on a default board |
//! | `MIN_BOARD_SIDE` | 3 | Smallest side that can hold a run of 3 |
//! | `MAX_BOARD_SIDE` | 16 | Largest supported side |
//!
//! # Presentation Timing
//!
//! Timing values are in milliseconds and are hints for the presentation
//! layer only; the model never waits on them:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `NEIGHBOR_DESTROY_DELAY_MS` | 300 | Pause before a bomb's neighbours vanish |
//! | `BOMB_DESTROY_DELAY_MS` | 200 | Pause before the bomb itself vanishes |
//! | `COLUMN_START_DELAY_MS` | 50 | Per-column offset inside a round |
//! | `COLUMN_STAGGER_MS` | 100 | Offset between commands in one column |
//!
//! # Examples
//!
//! ```
//! use gem_cascade_types::{GemType, Pos, SpawnKind};
//!
//! let kind = GemType::from_str("Red").unwrap();
//! assert_eq!(kind, GemType::Red);
//! assert!(kind.is_color());
//! assert!(!GemType::Bomb.is_color());
//!
//! let a = Pos::new(2, 3);
//! assert!(a.is_adjacent(Pos::new(2, 4)));
//! assert!(!a.is_adjacent(Pos::new(3, 4)));
//!
//! assert_eq!(SpawnKind::from_str("fallFromTop"), Some(SpawnKind::FallFromTop));
//! ```

use serde::{Deserialize, Serialize};

/// Default board width in cells
pub const DEFAULT_BOARD_WIDTH: u8 = 7;

/// Default board height in cells
pub const DEFAULT_BOARD_HEIGHT: u8 = 7;

/// Smallest accepted board side
pub const MIN_BOARD_SIDE: u8 = 3;

/// Largest accepted board side
pub const MAX_BOARD_SIDE: u8 = 16;

/// Bounded retries when the initial fill draws a gem that would match
pub const MAX_GENERATION_ATTEMPTS: u32 = 100;

/// Match/Destroy/FillBoard passes one cascade may run before it is cut off
pub const MAX_CASCADE_TICKS: u32 = 256;

/// Default score for every color gem in the default catalog
pub const DEFAULT_GEM_SCORE: u32 = 10;

/// Default score for a bomb
pub const DEFAULT_BOMB_SCORE: u32 = 50;

/// Delay before a bomb's neighbours are destroyed on screen
pub const NEIGHBOR_DESTROY_DELAY_MS: u32 = 300;

/// Delay before the bomb itself is destroyed on screen
pub const BOMB_DESTROY_DELAY_MS: u32 = 200;

/// Start offset applied per column index inside a batch round
pub const COLUMN_START_DELAY_MS: u32 = 50;

/// Start offset between consecutive commands of one column
pub const COLUMN_STAGGER_MS: u32 = 100;

/// Number of cells a bomb blast can cover (3x3 plus 4 two-step arms)
pub const BOMB_PATTERN_CELLS: usize = 13;


/// Gem kinds
///
/// Five plain colors plus the distinguished `Bomb`. Ordinary generation only
/// ever produces colors; bombs are created by the cascade itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GemType {
    Blue,
    Green,
    Red,
    Yellow,
    Purple,
    Bomb,
}

impl GemType {
    /// Every non-bomb kind, in catalog order
    pub const COLORS: [GemType; 5] = [
        GemType::Blue,
        GemType::Green,
        GemType::Red,
        GemType::Yellow,
        GemType::Purple,
    ];

    /// Parse gem type from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use gem_cascade_types::GemType;
    ///
    /// assert_eq!(GemType::from_str("blue"), Some(GemType::Blue));
    /// assert_eq!(GemType::from_str("BOMB"), Some(GemType::Bomb));
    /// assert_eq!(GemType::from_str("orange"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "blue" => Some(GemType::Blue),
            "green" => Some(GemType::Green),
            "red" => Some(GemType::Red),
            "yellow" => Some(GemType::Yellow),
            "purple" => Some(GemType::Purple),
            "bomb" => Some(GemType::Bomb),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            GemType::Blue => "blue",
            GemType::Green => "green",
            GemType::Red => "red",
            GemType::Yellow => "yellow",
            GemType::Purple => "purple",
            GemType::Bomb => "bomb",
        }
    }

    /// Single-character glyph used by board layouts and ASCII snapshots
    ///
    /// # Examples
    ///
    /// ```
    /// use gem_cascade_types::GemType;
    ///
    /// assert_eq!(GemType::Red.glyph(), 'R');
    /// assert_eq!(GemType::from_glyph('*'), Some(GemType::Bomb));
    /// ```
    pub fn glyph(&self) -> char {
        match self {
            GemType::Blue => 'B',
            GemType::Green => 'G',
            GemType::Red => 'R',
            GemType::Yellow => 'Y',
            GemType::Purple => 'P',
            GemType::Bomb => '*',
        }
    }

    /// Inverse of [`GemType::glyph`] (case-insensitive for colors)
    pub fn from_glyph(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'B' => Some(GemType::Blue),
            'G' => Some(GemType::Green),
            'R' => Some(GemType::Red),
            'Y' => Some(GemType::Yellow),
            'P' => Some(GemType::Purple),
            '*' => Some(GemType::Bomb),
            _ => None,
        }
    }

    /// True for every kind except `Bomb`
    pub fn is_color(&self) -> bool {
        !matches!(self, GemType::Bomb)
    }
}

/// How a newly placed gem should appear
///
/// Purely a presentation hint; the model treats all three identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SpawnKind {
    /// Pops into place with no motion (initial fill, bomb creation)
    Instant,
    /// Enters above the column and drops into its cell (refill)
    FallFromTop,
    /// Fades in where it stands
    Appear,
}

impl SpawnKind {
    /// Parse spawn kind from its camelCase name (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "instant" => Some(SpawnKind::Instant),
            "fallfromtop" => Some(SpawnKind::FallFromTop),
            "appear" => Some(SpawnKind::Appear),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            SpawnKind::Instant => "instant",
            SpawnKind::FallFromTop => "fallFromTop",
            SpawnKind::Appear => "appear",
        }
    }
}

/// A cell coordinate on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Pos {
    pub x: u8,
    pub y: u8,
}

impl Pos {
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Offset by (dx, dy); `None` if either coordinate would go negative
    /// or overflow. Upper bounds are the board's concern.
    pub fn offset(self, dx: i8, dy: i8) -> Option<Pos> {
        let x = i16::from(self.x) + i16::from(dx);
        let y = i16::from(self.y) + i16::from(dy);
        if !(0..=i16::from(u8::MAX)).contains(&x) || !(0..=i16::from(u8::MAX)).contains(&y) {
            return None;
        }
        Some(Pos::new(x as u8, y as u8))
    }

    /// True when `other` shares an edge with `self`
    pub fn is_adjacent(self, other: Pos) -> bool {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        dx + dy == 1
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
