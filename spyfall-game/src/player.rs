//! Player identifiers and the room roster merged into each round.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Opaque key for a participant: a local seat id or a remote connection id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for PlayerId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A player joined to the room from another device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RemotePlayer {
    #[serde(default)]
    pub name: String,
}

/// Remote side of the lobby as reported by the hosting application.
///
/// Remote players only take part in a round while the room is connected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Room {
    pub id: String,
    #[serde(default)]
    pub connected: bool,
    #[serde(default)]
    pub remote_players: BTreeMap<PlayerId, RemotePlayer>,
}

impl Room {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Remote players counted towards the round.
    pub fn active_players(&self) -> impl Iterator<Item = &PlayerId> {
        self.connected
            .then(|| self.remote_players.keys())
            .into_iter()
            .flatten()
    }

    #[must_use]
    pub fn active_count(&self) -> usize {
        if self.connected {
            self.remote_players.len()
        } else {
            0
        }
    }

    #[must_use]
    pub fn is_remote(&self, player: &PlayerId) -> bool {
        self.remote_players.contains_key(player)
    }
}

/// Local players followed by connected remote players, in seat order.
#[must_use]
pub fn round_players(local: &[PlayerId], room: Option<&Room>) -> Vec<PlayerId> {
    let mut players = local.to_vec();
    if let Some(room) = room {
        players.extend(room.active_players().cloned());
    }
    players
}

/// Local plus connected remote player count.
#[must_use]
pub fn total_players(local: usize, room: Option<&Room>) -> usize {
    local + room.map_or(0, Room::active_count)
}
