//! Table limits with validation.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{DEFAULT_SPY_COUNT, MAX_PLAYERS, MAX_ROLES, MIN_PLAYERS};

/// Errors raised when rule invariants are violated.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RulesError {
    #[error("minimum players must be at least 1")]
    ZeroMinimum,
    #[error("minimum players {min} exceeds maximum {max}")]
    MinExceedsMax { min: usize, max: usize },
    #[error("locations must allow at least one role slot")]
    NoRoleSlots,
    #[error("role slots {slots} exceed the catalog width {max}")]
    TooManyRoleSlots { slots: usize, max: usize },
    #[error("default spy count {spies} leaves no room below minimum players {min}")]
    SpiesFillTable { spies: usize, min: usize },
}

/// Bounds applied by the player controls and the start-game gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRules {
    #[serde(default = "GameRules::default_min_players")]
    pub min_players: usize,
    #[serde(default = "GameRules::default_max_players")]
    pub max_players: usize,
    #[serde(default = "GameRules::default_max_roles")]
    pub max_roles: usize,
    #[serde(default = "GameRules::default_spy_count")]
    pub default_spy_count: usize,
}

impl GameRules {
    const fn default_min_players() -> usize {
        MIN_PLAYERS
    }

    const fn default_max_players() -> usize {
        MAX_PLAYERS
    }

    const fn default_max_roles() -> usize {
        MAX_ROLES
    }

    const fn default_spy_count() -> usize {
        DEFAULT_SPY_COUNT
    }

    /// Parse rules from JSON, filling omitted fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Check the rule invariants.
    ///
    /// # Errors
    ///
    /// Returns the first [`RulesError`] found.
    pub fn validate(&self) -> Result<(), RulesError> {
        if self.min_players == 0 {
            return Err(RulesError::ZeroMinimum);
        }
        if self.min_players > self.max_players {
            return Err(RulesError::MinExceedsMax {
                min: self.min_players,
                max: self.max_players,
            });
        }
        if self.max_roles == 0 {
            return Err(RulesError::NoRoleSlots);
        }
        if self.max_roles > MAX_ROLES {
            return Err(RulesError::TooManyRoleSlots {
                slots: self.max_roles,
                max: MAX_ROLES,
            });
        }
        if self.default_spy_count >= self.min_players {
            return Err(RulesError::SpiesFillTable {
                spies: self.default_spy_count,
                min: self.min_players,
            });
        }
        Ok(())
    }

    /// Whether `total` players may start a round.
    #[must_use]
    pub const fn allows_start(&self, total: usize) -> bool {
        total >= self.min_players && total <= self.max_players
    }
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            min_players: MIN_PLAYERS,
            max_players: MAX_PLAYERS,
            max_roles: MAX_ROLES,
            default_spy_count: DEFAULT_SPY_COUNT,
        }
    }
}
