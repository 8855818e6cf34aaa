//! Centralized bounds for Spyfall game logic.
//!
//! These values gate the player-count controls and the start-game action.
//! Keeping them together ensures the lobby limits can only be adjusted via
//! code changes reviewed in version control.

/// Fewest players (local plus remote) a round can start with.
pub const MIN_PLAYERS: usize = 3;
/// Most players (local plus remote) a round can hold.
pub const MAX_PLAYERS: usize = 12;
/// Number of role slots (`role1`..`role7`) a location can define.
pub const MAX_ROLES: usize = 7;
/// Spies dealt per round unless configured otherwise.
pub const DEFAULT_SPY_COUNT: usize = 1;

/// Key prefix used for role slots in location catalogs.
pub(crate) const ROLE_KEY_PREFIX: &str = "role";
/// Prefix used when allocating ids for local seats.
pub(crate) const LOCAL_PLAYER_PREFIX: &str = "player";

// RNG stream domain tags ---------------------------------------------------
pub(crate) const STREAM_LOCATION: &[u8] = b"location";
pub(crate) const STREAM_POOL: &[u8] = b"pool";
pub(crate) const STREAM_SHUFFLE: &[u8] = b"shuffle";
pub(crate) const STREAM_ROUND: &[u8] = b"round";
