use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use spyfall_game::{
    CustomLocation, GameConfig, GameContext, GameRules, LocationCatalog, LocationId, MemoryStore,
    PlayerId, RemotePlayer, Role, RoleSlot, Room, RoundRng, SpyfallEngine,
};

/// Location setup a plan plays with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationSetup {
    /// Every bundled location.
    Builtin,
    /// A single custom location defining only the given number of roles.
    CustomOnly { roles: usize },
}

/// Table layout and round count for one simulated session.
#[derive(Debug, Clone)]
pub struct SimulationPlan {
    pub local_players: usize,
    pub remote_players: usize,
    pub spies: usize,
    pub rounds: usize,
    pub locations: LocationSetup,
    pub expectations: Vec<Expectation>,
}

pub type Expectation = fn(&SimulationSummary) -> Result<(), String>;

impl SimulationPlan {
    #[must_use]
    pub fn table(local_players: usize, remote_players: usize, spies: usize, rounds: usize) -> Self {
        Self {
            local_players,
            remote_players,
            spies,
            rounds,
            locations: LocationSetup::Builtin,
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub const fn with_locations(mut self, locations: LocationSetup) -> Self {
        self.locations = locations;
        self
    }

    #[must_use]
    pub fn expect(mut self, expectation: Expectation) -> Self {
        self.expectations.push(expectation);
        self
    }

    #[must_use]
    pub const fn total_players(&self) -> usize {
        self.local_players + self.remote_players
    }
}

/// One dealt round as seen by the simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub location: LocationId,
    pub roles: BTreeMap<PlayerId, Role>,
    pub spies: Vec<PlayerId>,
    pub rerolled: bool,
    pub repeated_spies: bool,
}

/// Outcome of running a plan for one seed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub seed: u64,
    pub players: Vec<PlayerId>,
    pub spies_per_round: usize,
    pub rounds: Vec<RoundRecord>,
    pub spy_tally: BTreeMap<PlayerId, usize>,
    pub defined_roles: usize,
}

impl SimulationSummary {
    #[must_use]
    pub fn reroll_count(&self) -> usize {
        self.rounds.iter().filter(|r| r.rerolled).count()
    }

    #[must_use]
    pub fn repeat_count(&self) -> usize {
        self.rounds.iter().filter(|r| r.repeated_spies).count()
    }

    #[must_use]
    pub fn location_repeats(&self) -> usize {
        self.rounds
            .windows(2)
            .filter(|pair| pair[0].location == pair[1].location)
            .count()
    }

    /// Share of rounds each player spent as a spy.
    #[must_use]
    pub fn spy_shares(&self) -> Vec<(PlayerId, f64)> {
        let rounds = count_to_f64(self.rounds.len()).max(1.0);
        self.players
            .iter()
            .map(|player| {
                let count = self.spy_tally.get(player).copied().unwrap_or_default();
                (player.clone(), count_to_f64(count) / rounds)
            })
            .collect()
    }
}

pub(crate) fn count_to_f64(count: usize) -> f64 {
    f64::from(u32::try_from(count).unwrap_or(u32::MAX))
}

#[derive(Debug, Clone)]
pub struct GameTester {
    catalog: LocationCatalog,
    verbose: bool,
}

impl GameTester {
    /// Build a tester over the bundled location catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled catalog fails to parse.
    pub fn try_new(verbose: bool) -> Result<Self> {
        let catalog = LocationCatalog::builtin().context("loading bundled locations")?;
        Ok(Self { catalog, verbose })
    }

    #[must_use]
    pub const fn verbose(&self) -> bool {
        self.verbose
    }

    fn build_lobby(plan: &SimulationPlan) -> (GameConfig, Room) {
        let mut config = GameConfig::with_local_players(plan.local_players);
        config.spy_count = plan.spies;

        if let LocationSetup::CustomOnly { roles } = plan.locations {
            let location = RoleSlot::all()
                .take(roles)
                .fold(CustomLocation::new("Test Site"), |loc, slot| {
                    let name = format!("Role {}", slot.index());
                    loc.with_role(slot, name)
                });
            config
                .custom_locations
                .insert(LocationId::from("test_site"), location);
            config.selected_locations = Some(BTreeSet::new());
        }

        let mut room = Room::new("simulation");
        room.connected = true;
        for i in 1..=plan.remote_players {
            room.remote_players.insert(
                PlayerId::new(format!("remote{i}")),
                RemotePlayer {
                    name: format!("Remote {i}"),
                },
            );
        }
        (config, room)
    }

    /// Play `plan.rounds` consecutive rounds for one seed.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine refuses to start a round.
    pub fn run_plan(&self, plan: &SimulationPlan, seed: u64) -> Result<SimulationSummary> {
        let engine = SpyfallEngine::new(self.catalog.clone(), MemoryStore::default())
            .with_rules(GameRules::default())
            .context("configuring simulation rules")?;
        let (config, room) = Self::build_lobby(plan);

        let mut summary = SimulationSummary {
            seed,
            players: spyfall_game::round_players(&config.players, Some(&room)),
            spies_per_round: plan.spies,
            defined_roles: match plan.locations {
                LocationSetup::Builtin => spyfall_game::MAX_ROLES,
                LocationSetup::CustomOnly { roles } => roles,
            },
            ..SimulationSummary::default()
        };

        for round in 0..plan.rounds {
            let state = engine.store().snapshot();
            let ctx = GameContext::new(&state, &config, Some(&room));
            let mut rng = RoundRng::for_round(seed, u64::try_from(round).unwrap_or(u64::MAX));
            let round_seed = rng.seed();
            let plan_result = engine
                .start_game(&ctx, &mut rng)
                .with_context(|| format!("round {} (seed {round_seed})", round + 1))?;

            let repeated =
                !state.player_roles.is_empty() && plan_result.assignment.spies == state.spies;
            for spy in &plan_result.assignment.spies {
                *summary.spy_tally.entry(spy.clone()).or_default() += 1;
            }
            debug!(
                "round {} at {}: spies {:?} rerolled {}",
                round + 1,
                plan_result.location,
                plan_result.assignment.spies,
                plan_result.assignment.rerolled
            );
            summary.rounds.push(RoundRecord {
                location: plan_result.location.clone(),
                roles: plan_result.assignment.roles.clone(),
                spies: plan_result.assignment.spies.iter().cloned().collect(),
                rerolled: plan_result.assignment.rerolled,
                repeated_spies: repeated,
            });

            let started = engine.store().snapshot();
            let results = engine
                .end_game(&GameContext::new(&started, &config, Some(&room)))
                .context("ending round")?;
            debug!("results roster has {} entries", results.entries.len());
        }

        Ok(summary)
    }
}
