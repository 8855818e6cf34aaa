//! Roles pool construction: the multiset of roles dealt in a round.
use log::debug;
use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;

use crate::role::{Role, RoleSlot};

/// Errors raised when a pool cannot be built for the requested table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PoolError {
    #[error("spy count {spies} must be lower than player count {players}")]
    TooManySpies { spies: usize, players: usize },
}

/// Build the roles dealt to `player_count` seats with `spy_count` spies.
///
/// Non-spy seats take distinct location roles first (sampled without
/// replacement); seats beyond the location's distinct roles are padded with
/// roles drawn with replacement, or [`Role::Blank`] when the location
/// defines none.
///
/// # Errors
///
/// Returns [`PoolError::TooManySpies`] unless `spy_count < player_count`.
pub fn build_role_pool<R>(
    rng: &mut R,
    location_roles: &[RoleSlot],
    player_count: usize,
    spy_count: usize,
) -> Result<Vec<Role>, PoolError>
where
    R: Rng + ?Sized,
{
    if spy_count >= player_count {
        return Err(PoolError::TooManySpies {
            spies: spy_count,
            players: player_count,
        });
    }

    let seats = player_count - spy_count;
    let mut pool = Vec::with_capacity(player_count);
    pool.extend(std::iter::repeat_n(Role::Spy, spy_count));
    pool.extend(
        location_roles
            .choose_multiple(rng, seats)
            .copied()
            .map(Role::Slot),
    );

    let padding = seats.saturating_sub(location_roles.len());
    for _ in 0..padding {
        let filler = location_roles
            .choose(rng)
            .copied()
            .map_or(Role::Blank, Role::Slot);
        pool.push(filler);
    }

    debug!(
        "built role pool: {player_count} seats, {spy_count} spies, {} distinct roles, {padding} filler",
        location_roles.len()
    );
    Ok(pool)
}
