//! Presentation boundary - from notifications to timed playback
//!
//! The model records notifications synchronously; this crate turns them
//! into [`BatchRound`]s and replays them through a [`CommandPlayer`] on a
//! tokio task, one round at a time:
//!
//! - [`rounds`]: notification -> round translation
//! - [`executor`]: timed playback of one round
//! - [`runtime`]: the queue and task that drive playback
//!
//! Nothing here feeds back into the model.

pub mod command;
pub mod executor;
pub mod rounds;
pub mod runtime;

pub use gem_cascade_types as types;

pub use command::BoardCommand;
pub use executor::{play_round, CommandPlayer, PresenterTiming};
pub use rounds::{BatchRound, RoundBuilder};
pub use runtime::{LogPlayer, Presenter};
