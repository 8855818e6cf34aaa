//! Lobby configuration, round state, and the updates that move between them.
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::constants::{DEFAULT_SPY_COUNT, LOCAL_PLAYER_PREFIX};
use crate::location::{CustomLocation, LocationCatalog, LocationId};
use crate::player::PlayerId;
use crate::role::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    #[default]
    Stopped,
    Started,
}

/// Host-side lobby settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Local seats, in the order they were added.
    #[serde(default)]
    pub players: Vec<PlayerId>,
    #[serde(default = "GameConfig::default_spy_count")]
    pub spy_count: usize,
    #[serde(default)]
    pub custom_locations: BTreeMap<LocationId, CustomLocation>,
    /// Built-in locations enabled for play. `None` enables all of them and
    /// an empty set plays custom locations only.
    #[serde(default)]
    pub selected_locations: Option<BTreeSet<LocationId>>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            players: Vec::new(),
            spy_count: DEFAULT_SPY_COUNT,
            custom_locations: BTreeMap::new(),
            selected_locations: None,
        }
    }
}

impl GameConfig {
    const fn default_spy_count() -> usize {
        DEFAULT_SPY_COUNT
    }

    /// Config with `count` local seats named `player1`..`playerN`.
    #[must_use]
    pub fn with_local_players(count: usize) -> Self {
        let mut config = Self::default();
        for _ in 0..count {
            config.push_local_player();
        }
        config
    }

    /// Load config from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into a config.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Append a local seat with the lowest free `playerN` id and return it.
    pub(crate) fn push_local_player(&mut self) -> PlayerId {
        let next = (1..)
            .map(|n| PlayerId::new(format!("{LOCAL_PLAYER_PREFIX}{n}")))
            .find(|candidate| !self.players.contains(candidate))
            .unwrap_or_else(|| PlayerId::new(LOCAL_PLAYER_PREFIX));
        self.players.push(next.clone());
        next
    }

    /// Drop the most recently added local seat.
    pub(crate) fn pop_local_player(&mut self) -> Option<PlayerId> {
        self.players.pop()
    }

    /// Catalog of playable locations for this config.
    #[must_use]
    pub fn location_catalog(&self, builtin: &LocationCatalog) -> LocationCatalog {
        builtin
            .clone()
            .with_enabled(self.selected_locations.clone())
            .with_custom(self.custom_locations.clone())
    }
}

/// State of the current (or last) round.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    #[serde(default)]
    pub location: Option<LocationId>,
    #[serde(default)]
    pub prev_location: Option<LocationId>,
    #[serde(default)]
    pub spies: BTreeSet<PlayerId>,
    #[serde(default)]
    pub player_roles: BTreeMap<PlayerId, Role>,
    #[serde(default)]
    pub timer_running: bool,
}

impl GameState {
    #[must_use]
    pub const fn is_started(&self) -> bool {
        matches!(self.phase, GamePhase::Started)
    }

    /// Fold a persisted update into the state.
    pub fn apply(&mut self, update: &GameUpdate) {
        match update {
            GameUpdate::Started {
                player_roles,
                location,
                prev_location,
                spies,
            } => {
                self.phase = GamePhase::Started;
                self.player_roles.clone_from(player_roles);
                self.location = Some(location.clone());
                self.prev_location.clone_from(prev_location);
                self.spies.clone_from(spies);
            }
            GameUpdate::Stopped { timer_running } => {
                self.phase = GamePhase::Stopped;
                self.timer_running = *timer_running;
            }
        }
    }
}

/// A request to persist a change to the round state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GameUpdate {
    Started {
        player_roles: BTreeMap<PlayerId, Role>,
        location: LocationId,
        prev_location: Option<LocationId>,
        spies: BTreeSet<PlayerId>,
    },
    Stopped {
        timer_running: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::RoleSlot;

    #[test]
    fn local_players_get_sequential_ids() {
        let config = GameConfig::with_local_players(3);
        let ids: Vec<_> = config.players.iter().map(PlayerId::as_str).collect();
        assert_eq!(ids, vec!["player1", "player2", "player3"]);
    }

    #[test]
    fn empty_selection_leaves_only_custom_locations() {
        let mut config = GameConfig::with_local_players(3);
        config
            .custom_locations
            .insert(LocationId::from("garage"), CustomLocation::new("Garage"));
        let builtin = LocationCatalog::builtin().unwrap();

        let everything = config.location_catalog(&builtin);
        assert_eq!(
            everything.playable_ids().len(),
            builtin.playable_ids().len() + 1
        );

        config.selected_locations = Some(BTreeSet::new());
        let custom_only = config.location_catalog(&builtin);
        assert_eq!(custom_only.playable_ids(), vec![LocationId::from("garage")]);
    }

    #[test]
    fn freed_ids_are_reused() {
        let mut config = GameConfig::with_local_players(2);
        assert_eq!(config.pop_local_player(), Some(PlayerId::from("player2")));
        assert_eq!(config.push_local_player(), PlayerId::from("player2"));
        assert_eq!(config.players.len(), 2);
    }

    #[test]
    fn config_json_uses_defaults() {
        let config = GameConfig::from_json(
            r#"{
                "players": ["player1", "player2"],
                "custom_locations": {
                    "garage": { "name": "Garage", "role1": "Mechanic" }
                }
            }"#,
        )
        .unwrap();
        assert_eq!(config.players.len(), 2);
        assert_eq!(config.spy_count, DEFAULT_SPY_COUNT);
        assert!(config.custom_locations.contains_key(&LocationId::from("garage")));
        assert!(config.selected_locations.is_none());
    }

    #[test]
    fn apply_started_then_stopped() {
        let mut state = GameState {
            timer_running: true,
            ..GameState::default()
        };
        let spy = PlayerId::from("player1");
        let crew = PlayerId::from("player2");
        let mut roles = BTreeMap::new();
        roles.insert(spy.clone(), Role::Spy);
        roles.insert(crew, Role::Slot(RoleSlot::new(1).unwrap()));
        let update = GameUpdate::Started {
            player_roles: roles.clone(),
            location: LocationId::from("bank"),
            prev_location: Some(LocationId::from("beach")),
            spies: [spy.clone()].into_iter().collect(),
        };

        state.apply(&update);
        assert!(state.is_started());
        assert_eq!(state.player_roles, roles);
        assert_eq!(state.location, Some(LocationId::from("bank")));
        assert_eq!(state.prev_location, Some(LocationId::from("beach")));
        assert!(state.spies.contains(&spy));

        state.apply(&GameUpdate::Stopped {
            timer_running: false,
        });
        assert_eq!(state.phase, GamePhase::Stopped);
        assert!(!state.timer_running);
        assert_eq!(state.location, Some(LocationId::from("bank")));
    }

    #[test]
    fn updates_are_tagged_by_state() {
        let json = serde_json::to_value(GameUpdate::Stopped {
            timer_running: false,
        })
        .unwrap();
        assert_eq!(json["state"], "stopped");
        assert_eq!(json["timer_running"], false);
    }
}
