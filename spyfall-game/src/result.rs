//! End-of-round results roster
use serde::{Deserialize, Serialize};

use crate::location::{LocationCatalog, LocationId, RoleCatalog};
use crate::player::{PlayerId, Room};
use crate::role::Role;
use crate::state::GameState;

/// One row of the results view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultEntry {
    pub player: PlayerId,
    /// Remote player's display name, the id for local seats.
    pub display_name: String,
    pub role: Role,
    /// Role name at the round's location, if the slot is defined there.
    pub role_name: Option<String>,
    pub is_spy: bool,
    pub is_remote: bool,
}

/// Everything the results view shows once a round ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RoundResults {
    pub location: Option<LocationId>,
    pub location_name: Option<String>,
    pub entries: Vec<ResultEntry>,
}

impl RoundResults {
    /// Build the roster from the round state, resolving names through the
    /// catalog and the room's remote roster.
    #[must_use]
    pub fn collect(state: &GameState, catalog: &LocationCatalog, room: Option<&Room>) -> Self {
        let location = state.location.as_ref().and_then(|id| catalog.get(id));
        let entries = state
            .player_roles
            .iter()
            .map(|(player, role)| {
                let remote = room.and_then(|room| room.remote_players.get(player));
                let role_name = role
                    .slot()
                    .and_then(|slot| {
                        location
                            .as_ref()
                            .and_then(|loc| loc.role_name(slot))
                            .map(str::to_owned)
                    });
                ResultEntry {
                    player: player.clone(),
                    display_name: remote
                        .map(|r| r.name.trim())
                        .filter(|name| !name.is_empty())
                        .map_or_else(|| player.to_string(), str::to_owned),
                    role: *role,
                    role_name,
                    is_spy: state.spies.contains(player),
                    is_remote: remote.is_some(),
                }
            })
            .collect();

        Self {
            location: state.location.clone(),
            location_name: location.map(|loc| loc.name().to_owned()),
            entries,
        }
    }

    /// Rows for players holding the spy role.
    pub fn spies(&self) -> impl Iterator<Item = &ResultEntry> {
        self.entries.iter().filter(|entry| entry.is_spy)
    }

    /// Rows for remote players only.
    pub fn remote_entries(&self) -> impl Iterator<Item = &ResultEntry> {
        self.entries.iter().filter(|entry| entry.is_remote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::RemotePlayer;
    use crate::role::RoleSlot;
    use crate::state::GamePhase;

    #[test]
    fn roster_resolves_names_and_flags() {
        let catalog = LocationCatalog::builtin().unwrap();
        let spy = PlayerId::from("player1");
        let remote = PlayerId::from("conn-42");
        let mut state = GameState {
            phase: GamePhase::Stopped,
            location: Some(LocationId::from("airplane")),
            ..GameState::default()
        };
        state.player_roles.insert(spy.clone(), Role::Spy);
        state
            .player_roles
            .insert(remote.clone(), Role::Slot(RoleSlot::new(7).unwrap()));
        state.spies.insert(spy.clone());

        let mut room = Room::new("room");
        room.connected = true;
        room.remote_players.insert(
            remote.clone(),
            RemotePlayer {
                name: "Ana".to_string(),
            },
        );

        let results = RoundResults::collect(&state, &catalog, Some(&room));
        assert_eq!(results.location_name.as_deref(), Some("Airplane"));
        assert_eq!(results.entries.len(), 2);

        let spies: Vec<_> = results.spies().collect();
        assert_eq!(spies.len(), 1);
        assert_eq!(spies[0].player, spy);
        assert_eq!(spies[0].display_name, "player1");
        assert!(spies[0].role_name.is_none());

        let remotes: Vec<_> = results.remote_entries().collect();
        assert_eq!(remotes.len(), 1);
        assert_eq!(remotes[0].display_name, "Ana");
        assert_eq!(remotes[0].role_name.as_deref(), Some("Captain"));
    }

    #[test]
    fn empty_state_yields_empty_roster() {
        let catalog = LocationCatalog::empty();
        let results = RoundResults::collect(&GameState::default(), &catalog, None);
        assert!(results.entries.is_empty());
        assert!(results.location.is_none());
        assert!(results.location_name.is_none());
    }
}
