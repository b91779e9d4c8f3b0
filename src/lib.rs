//! Gem Cascade (workspace facade crate).
//!
//! Re-exports the workspace crates under one name so tests, benches and the
//! demo binary can import `gem_cascade::{core,present,types}`.

pub mod demo;

pub use gem_cascade_core as core;
pub use gem_cascade_present as present;
pub use gem_cascade_types as types;
