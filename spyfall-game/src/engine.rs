//! Game lifecycle: starting and ending rounds against a persisted store.
use log::info;
use std::cell::RefCell;
use std::convert::Infallible;
use thiserror::Error;

use crate::assign::{AssignError, RoundAssignment, assign_with_retry};
use crate::location::{LocationCatalog, LocationError, LocationId, RoleCatalog};
use crate::player::{Room, round_players};
use crate::pool::{PoolError, build_role_pool};
use crate::result::RoundResults;
use crate::rng::RoundRng;
use crate::role::RoleSlot;
use crate::rules::{GameRules, RulesError};
use crate::state::{GameConfig, GameState, GameUpdate};

/// Persistence seam for round updates.
/// The hosting application provides the real implementation.
pub trait GameStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Persist a change to the round state
    ///
    /// # Errors
    ///
    /// Returns an error if the update cannot be stored.
    fn update_game(&self, update: &GameUpdate) -> Result<(), Self::Error>;
}

/// Store that keeps state and update history in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RefCell<GameState>,
    history: RefCell<Vec<GameUpdate>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new(state: GameState) -> Self {
        Self {
            state: RefCell::new(state),
            history: RefCell::new(Vec::new()),
        }
    }

    /// Copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> GameState {
        self.state.borrow().clone()
    }

    /// Updates persisted so far, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<GameUpdate> {
        self.history.borrow().clone()
    }
}

impl GameStore for MemoryStore {
    type Error = Infallible;

    fn update_game(&self, update: &GameUpdate) -> Result<(), Self::Error> {
        self.state.borrow_mut().apply(update);
        self.history.borrow_mut().push(update.clone());
        Ok(())
    }
}

/// Errors that keep a round from starting.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StartGameError {
    #[error("{total} players cannot start a round (allowed {min}..={max})")]
    PlayerCount { total: usize, min: usize, max: usize },
    #[error(transparent)]
    Location(#[from] LocationError),
    #[error(transparent)]
    Pool(#[from] PoolError),
    #[error(transparent)]
    Assign(#[from] AssignError),
}

/// Snapshot of the lobby read when a lifecycle action fires.
#[derive(Debug, Clone, Copy)]
pub struct GameContext<'a> {
    pub state: &'a GameState,
    pub config: &'a GameConfig,
    pub room: Option<&'a Room>,
}

impl<'a> GameContext<'a> {
    #[must_use]
    pub const fn new(state: &'a GameState, config: &'a GameConfig, room: Option<&'a Room>) -> Self {
        Self {
            state,
            config,
            room,
        }
    }
}

/// A freshly dealt round, ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundPlan {
    pub location: LocationId,
    pub prev_location: Option<LocationId>,
    pub assignment: RoundAssignment,
}

impl RoundPlan {
    #[must_use]
    pub fn to_update(&self) -> GameUpdate {
        GameUpdate::Started {
            player_roles: self.assignment.roles.clone(),
            location: self.location.clone(),
            prev_location: self.prev_location.clone(),
            spies: self.assignment.spies.clone(),
        }
    }
}

/// Drives round lifecycle for a lobby.
pub struct SpyfallEngine<S>
where
    S: GameStore,
{
    catalog: LocationCatalog,
    rules: GameRules,
    store: S,
}

impl<S> SpyfallEngine<S>
where
    S: GameStore,
{
    /// Create an engine over the given built-in catalog with default rules.
    pub fn new(catalog: LocationCatalog, store: S) -> Self {
        Self {
            catalog,
            rules: GameRules::default(),
            store,
        }
    }

    /// Replace the rules after validating them.
    ///
    /// # Errors
    ///
    /// Returns an error if the rules violate their invariants.
    pub fn with_rules(mut self, rules: GameRules) -> Result<Self, RulesError> {
        rules.validate()?;
        self.rules = rules;
        Ok(self)
    }

    #[must_use]
    pub const fn rules(&self) -> &GameRules {
        &self.rules
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Deal a new round without persisting it.
    ///
    /// # Errors
    ///
    /// Returns an error if the lobby size is outside the rules, no location
    /// is playable, or the configured spies fill the table.
    pub fn prepare_round(
        &self,
        ctx: &GameContext<'_>,
        rng: &mut RoundRng,
    ) -> Result<RoundPlan, StartGameError> {
        let players = round_players(&ctx.config.players, ctx.room);
        if !self.rules.allows_start(players.len()) {
            return Err(StartGameError::PlayerCount {
                total: players.len(),
                min: self.rules.min_players,
                max: self.rules.max_players,
            });
        }

        let catalog = ctx.config.location_catalog(&self.catalog);
        let previous = ctx.state.location.as_ref();
        let location_id = catalog.pick_next(rng.location(), previous)?;
        let location = catalog.resolve(&location_id)?;
        let roles: Vec<RoleSlot> = location
            .defined_roles()
            .into_iter()
            .filter(|slot| slot.index() <= self.rules.max_roles)
            .collect();

        let pool = build_role_pool(rng.pool(), &roles, players.len(), ctx.config.spy_count)?;
        let assignment = assign_with_retry(rng.shuffle(), &players, &pool, &ctx.state.spies)?;

        info!(
            "round dealt at {location_id} for {} players ({} spies, seed {})",
            players.len(),
            assignment.spies.len(),
            rng.seed()
        );
        Ok(RoundPlan {
            location: location_id,
            prev_location: ctx.state.location.clone(),
            assignment,
        })
    }

    /// Deal a new round and persist it as started.
    ///
    /// # Errors
    ///
    /// Returns an error if the round cannot be dealt or the store rejects
    /// the update.
    pub fn start_game(
        &self,
        ctx: &GameContext<'_>,
        rng: &mut RoundRng,
    ) -> Result<RoundPlan, anyhow::Error>
    where
        S::Error: Into<anyhow::Error>,
    {
        let plan = self.prepare_round(ctx, rng)?;
        self.store.update_game(&plan.to_update()).map_err(Into::into)?;
        Ok(plan)
    }

    /// Persist the round as stopped with the timer halted, and collect the
    /// results roster.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the update.
    pub fn end_game(&self, ctx: &GameContext<'_>) -> Result<RoundResults, S::Error> {
        self.store.update_game(&GameUpdate::Stopped {
            timer_running: false,
        })?;
        let catalog = ctx.config.location_catalog(&self.catalog);
        info!(
            "round ended at {}",
            ctx.state
                .location
                .as_ref()
                .map_or("<none>", LocationId::as_str)
        );
        Ok(RoundResults::collect(ctx.state, &catalog, ctx.room))
    }
}
