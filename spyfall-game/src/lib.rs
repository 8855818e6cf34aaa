//! Spyfall Game Engine
//!
//! Platform-agnostic round logic for the Spyfall party game: location
//! selection, role dealing with spies, lobby bounds and the start/end
//! lifecycle. Rendering, localization, presence and persistence belong to
//! the hosting application.

pub mod assign;
pub mod constants;
pub mod controller;
pub mod engine;
pub mod location;
pub mod player;
pub mod pool;
pub mod result;
pub mod rng;
pub mod role;
pub mod rules;
pub mod state;

// Re-export commonly used types
pub use assign::{AssignError, RoundAssignment, assign_roles, assign_with_retry};
pub use constants::{DEFAULT_SPY_COUNT, MAX_PLAYERS, MAX_ROLES, MIN_PLAYERS};
pub use controller::{PlayerCountController, can_start_game};
pub use engine::{
    GameContext, GameStore, MemoryStore, RoundPlan, SpyfallEngine, StartGameError,
};
pub use location::{
    BuiltinLocation, CustomLocation, Location, LocationCatalog, LocationError, LocationId,
    RoleCatalog,
};
pub use player::{PlayerId, RemotePlayer, Room, round_players, total_players};
pub use pool::{PoolError, build_role_pool};
pub use result::{ResultEntry, RoundResults};
pub use rng::RoundRng;
pub use role::{Role, RoleSlot};
pub use rules::{GameRules, RulesError};
pub use state::{GameConfig, GamePhase, GameState, GameUpdate};
