//! Core game logic module - pure, deterministic, and testable
//!
//! This crate holds the whole match-3 model: the grid, match detection, the
//! cascade phases, and special abilities. It has no I/O and no async code;
//! every call runs to completion and leaves an ordered notification log
//! behind for the presentation layer.
//!
//! # Module Structure
//!
//! - [`board`]: the grid and its mutation primitives, which record every change
//! - [`detector`]: runs of three, bomb-worthy groups, blast patterns
//! - [`phase`]: Match / Destroy / FillBoard / Stable and the cascade driver
//! - [`ability`]: the closed set of special abilities (currently the bomb)
//! - [`session`]: swipe validation and gating, initial fill
//! - [`generator`]: seeded gem generation that avoids ready-made runs
//! - [`config`]: serde configuration with env and JSON sources
//!
//! # Rules
//!
//! - **Runs of three**: horizontal or vertical, colored bombs match their color
//! - **Bombs**: a straight run of four, or crossing runs of three, leaves a
//!   bomb where the swap landed (or at the group's first cell)
//! - **Delayed detonation**: a matched bomb waits until the board settles
//! - **Gravity**: gems fall toward row 0; refills drop in from above
//!
//! # Example
//!
//! ```
//! use gem_cascade_core::{Session, SessionConfig, SwipeOutcome};
//! use gem_cascade_core::types::Pos;
//!
//! let mut session = Session::new(&SessionConfig::default()).unwrap();
//! let opening = session.take_notifications();
//! assert!(!opening.is_empty());
//!
//! match session.swipe(Pos::new(0, 0), Pos::new(1, 0)).unwrap() {
//!     SwipeOutcome::Resolved(report) => assert!(report.ticks >= 1),
//!     SwipeOutcome::Reverted => assert_eq!(session.score(), 0),
//! }
//! ```

pub mod ability;
pub mod board;
pub mod config;
pub mod detector;
pub mod game_state;
pub mod gem;
pub mod generator;
pub mod notify;
pub mod phase;
pub mod rng;
pub mod session;
pub mod snapshot;

pub use gem_cascade_types as types;

// Re-export commonly used types for convenience
pub use ability::{create_ability, Ability, AbilityConfig, BombAbility, Detonation};
pub use board::Board;
pub use config::{ConfigError, GemCatalog, GemSpec, SessionConfig};
pub use detector::{BombPlacement, MatchGroup};
pub use game_state::GameState;
pub use gem::{ColoredBomb, Components, Gem, GemId};
pub use generator::{DistinctGemGenerator, GemGenerator};
pub use notify::{AffectedGem, GemRef, Notification};
pub use phase::{CascadeReport, Phase, PhaseContext};
pub use rng::SimpleRng;
pub use session::{Session, SwipeError, SwipeOutcome};
pub use snapshot::{BoardSnapshot, BombSnapshot};
