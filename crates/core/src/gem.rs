//! Gem module - one token on the board
//!
//! A gem is identified by a [`GemId`] allocated by the board that owns it.
//! Identity is always compared by id, never by value: two red gems with the
//! same score are still different gems.

use serde::{Deserialize, Serialize};

use crate::ability::Ability;
use crate::types::GemType;

/// Stable identity of a gem, unique per board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GemId(pub u32);

impl std::fmt::Display for GemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Tag that makes a bomb match gems of one color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColoredBomb {
    pub match_color: GemType,
}

/// Optional orthogonal tags carried by a gem, at most one of each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Components {
    pub colored_bomb: Option<ColoredBomb>,
}

/// A single gem
#[derive(Debug, Clone, PartialEq)]
pub struct Gem {
    id: GemId,
    kind: GemType,
    score_value: u32,
    /// Set by the latest detection pass only
    pub is_match: bool,
    ability: Option<Ability>,
    components: Components,
}

impl Gem {
    /// Create a plain gem with no ability and no components
    pub fn new(id: GemId, kind: GemType, score_value: u32) -> Self {
        Self {
            id,
            kind,
            score_value,
            is_match: false,
            ability: None,
            components: Components::default(),
        }
    }

    /// Copy kind and score from a template under a new identity.
    ///
    /// Abilities and components are not carried over; callers bind them
    /// explicitly.
    pub fn from_template(template: &Gem, id: GemId) -> Self {
        Self::new(id, template.kind, template.score_value)
    }

    pub fn id(&self) -> GemId {
        self.id
    }

    pub fn kind(&self) -> GemType {
        self.kind
    }

    pub fn score_value(&self) -> u32 {
        self.score_value
    }

    pub fn ability(&self) -> Option<&Ability> {
        self.ability.as_ref()
    }

    pub fn has_ability(&self) -> bool {
        self.ability.is_some()
    }

    pub fn set_ability(&mut self, ability: Option<Ability>) {
        self.ability = ability;
    }

    pub fn components(&self) -> &Components {
        &self.components
    }

    pub fn colored_bomb(&self) -> Option<ColoredBomb> {
        self.components.colored_bomb
    }

    pub fn set_colored_bomb(&mut self, tag: ColoredBomb) {
        self.components.colored_bomb = Some(tag);
    }

    /// Builder form of [`Gem::set_colored_bomb`]
    pub fn with_colored_bomb(mut self, match_color: GemType) -> Self {
        self.set_colored_bomb(ColoredBomb { match_color });
        self
    }

    /// Builder form of [`Gem::set_ability`]
    pub fn with_ability(mut self, ability: Option<Ability>) -> Self {
        self.ability = ability;
        self
    }
}

impl std::fmt::Display for Gem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.components.colored_bomb {
            Some(tag) => write!(f, "{}{}({})", self.kind.as_str(), self.id, tag.match_color.as_str()),
            None => write!(f, "{}{}", self.kind.as_str(), self.id),
        }
    }
}
