//! Role Assignment Engine: deal a shuffled pool to the round's players.
use log::{debug, warn};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

use crate::player::PlayerId;
use crate::role::Role;

/// Errors raised when the engine's preconditions are violated.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssignError {
    #[error("role pool holds {roles} roles for {players} players")]
    CountMismatch { players: usize, roles: usize },
    #[error("player `{0}` is seated twice")]
    DuplicatePlayer(PlayerId),
}

/// One role per player for a round, plus the derived spy set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoundAssignment {
    pub roles: BTreeMap<PlayerId, Role>,
    pub spies: BTreeSet<PlayerId>,
    /// Whether the first deal repeated the previous spies and was redrawn.
    #[serde(default)]
    pub rerolled: bool,
}

impl RoundAssignment {
    #[must_use]
    pub fn role_of(&self, player: &PlayerId) -> Option<Role> {
        self.roles.get(player).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

fn check_preconditions(players: &[PlayerId], roles: &[Role]) -> Result<(), AssignError> {
    if players.len() != roles.len() {
        return Err(AssignError::CountMismatch {
            players: players.len(),
            roles: roles.len(),
        });
    }
    let mut seen = BTreeSet::new();
    for player in players {
        if !seen.insert(player) {
            return Err(AssignError::DuplicatePlayer(player.clone()));
        }
    }
    Ok(())
}

fn deal<R>(rng: &mut R, players: &[PlayerId], roles: &[Role]) -> RoundAssignment
where
    R: Rng + ?Sized,
{
    let mut shuffled = roles.to_vec();
    shuffled.shuffle(rng);

    let roles: BTreeMap<PlayerId, Role> = players.iter().cloned().zip(shuffled).collect();
    let spies = roles
        .iter()
        .filter(|(_, role)| role.is_spy())
        .map(|(player, _)| player.clone())
        .collect();

    RoundAssignment {
        roles,
        spies,
        rerolled: false,
    }
}

/// Shuffle `available_roles` uniformly and zip them against `players` by
/// position.
///
/// # Errors
///
/// Returns [`AssignError`] when the pool size differs from the player count
/// or a player id repeats.
pub fn assign_roles<R>(
    rng: &mut R,
    players: &[PlayerId],
    available_roles: &[Role],
) -> Result<RoundAssignment, AssignError>
where
    R: Rng + ?Sized,
{
    check_preconditions(players, available_roles)?;
    Ok(deal(rng, players, available_roles))
}

/// Assign roles, redrawing once if the spies match `previous_spies`.
///
/// The second draw is kept even if it collides again, so at most two
/// shuffles are made.
///
/// # Errors
///
/// Returns [`AssignError`] under the same conditions as [`assign_roles`].
pub fn assign_with_retry<R>(
    rng: &mut R,
    players: &[PlayerId],
    available_roles: &[Role],
    previous_spies: &BTreeSet<PlayerId>,
) -> Result<RoundAssignment, AssignError>
where
    R: Rng + ?Sized,
{
    let first = assign_roles(rng, players, available_roles)?;
    if &first.spies != previous_spies {
        return Ok(first);
    }

    debug!("spies repeated previous round, redrawing once");
    let mut second = deal(rng, players, available_roles);
    second.rerolled = true;
    if &second.spies == previous_spies {
        warn!("redraw kept the previous round's spies");
    }
    Ok(second)
}
