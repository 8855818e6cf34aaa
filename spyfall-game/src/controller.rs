//! Player-count controls and the start-game gate.
use log::debug;

use crate::player::{PlayerId, Room, total_players};
use crate::rules::GameRules;
use crate::state::GameConfig;

/// Bounds-checked add/remove controls over the lobby's player count.
///
/// Disabled controls are no-ops; there is no error path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerCountController {
    local_players: usize,
    total_players: usize,
    max_players: usize,
}

impl PlayerCountController {
    #[must_use]
    pub fn new(config: &GameConfig, room: Option<&Room>, rules: &GameRules) -> Self {
        Self {
            local_players: config.players.len(),
            total_players: total_players(config.players.len(), room),
            max_players: rules.max_players,
        }
    }

    #[must_use]
    pub const fn total_players(&self) -> usize {
        self.total_players
    }

    #[must_use]
    pub const fn can_add(&self) -> bool {
        self.total_players < self.max_players
    }

    #[must_use]
    pub const fn can_remove(&self) -> bool {
        self.total_players > 0 && self.local_players > 0
    }

    /// Add a local seat when allowed, returning its id.
    pub fn add_player(&mut self, config: &mut GameConfig) -> Option<PlayerId> {
        if !self.can_add() {
            return None;
        }
        let player = config.push_local_player();
        self.local_players += 1;
        self.total_players += 1;
        debug!("added local player {player} ({} total)", self.total_players);
        Some(player)
    }

    /// Remove the newest local seat when allowed, returning its id.
    pub fn remove_player(&mut self, config: &mut GameConfig) -> Option<PlayerId> {
        if !self.can_remove() {
            return None;
        }
        let player = config.pop_local_player()?;
        self.local_players -= 1;
        self.total_players -= 1;
        debug!("removed local player {player} ({} total)", self.total_players);
        Some(player)
    }
}

/// Whether the start-game action is available for this lobby.
#[must_use]
pub fn can_start_game(config: &GameConfig, room: Option<&Room>, rules: &GameRules) -> bool {
    rules.allows_start(total_players(config.players.len(), room))
}
