use std::collections::BTreeSet;

use spyfall_game::{MAX_PLAYERS, MIN_PLAYERS, Role};

use super::simulation::{LocationSetup, SimulationPlan, SimulationSummary, count_to_f64};

/// Absolute slack allowed between observed and expected spy shares.
const SHARE_TOLERANCE: f64 = 0.08;

#[derive(Debug, Clone)]
pub struct TestScenario {
    pub name: String,
    pub plan: SimulationPlan,
}

/// Table shape requested on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableShape {
    pub local_players: usize,
    pub remote_players: usize,
    pub spies: usize,
    pub rounds: usize,
}

const CATALOG: &[(&str, &str)] = &[
    ("smoke", "Single round; every seat dealt exactly once"),
    ("spy-fairness", "Spy shares stay close to spies/players over many rounds"),
    ("spy-rotation", "Redraw keeps repeated spy sets rare"),
    ("location-rotation", "Consecutive rounds never share a location"),
    ("small-location", "Two-role custom location pads filler roles"),
    ("full-table", "Maximum lobby with remote players"),
];

#[must_use]
pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    CATALOG.to_vec()
}

/// Every scenario key, in catalog order.
#[must_use]
pub fn all_scenario_keys() -> Vec<String> {
    CATALOG.iter().map(|(key, _)| (*key).to_string()).collect()
}

#[must_use]
pub fn get_scenario(key: &str, shape: TableShape) -> Option<TestScenario> {
    let TableShape {
        local_players,
        remote_players,
        spies,
        rounds,
    } = shape;
    let plan = match key {
        "smoke" => SimulationPlan::table(local_players, remote_players, spies, 1)
            .expect(expect_every_seat_dealt)
            .expect(expect_spy_count),
        "spy-fairness" => SimulationPlan::table(local_players, remote_players, spies, rounds)
            .expect(expect_spy_count)
            .expect(expect_fair_spy_shares),
        "spy-rotation" => SimulationPlan::table(local_players, remote_players, spies, rounds)
            .expect(expect_reroll_on_repeat)
            .expect(expect_rare_repeats),
        "location-rotation" => SimulationPlan::table(local_players, remote_players, spies, rounds)
            .expect(expect_location_rotation),
        "small-location" => SimulationPlan::table(local_players.max(6), 0, spies, rounds)
            .with_locations(LocationSetup::CustomOnly { roles: 2 })
            .expect(expect_every_seat_dealt)
            .expect(expect_filler_exhausts_roles),
        "full-table" => SimulationPlan::table(
            MAX_PLAYERS.saturating_sub(remote_players).max(MIN_PLAYERS),
            remote_players.min(MAX_PLAYERS - MIN_PLAYERS),
            spies,
            rounds,
        )
        .expect(expect_every_seat_dealt)
        .expect(expect_spy_count),
        _ => return None,
    };

    let name = CATALOG
        .iter()
        .find(|(k, _)| *k == key)
        .map_or_else(|| key.to_string(), |(_, desc)| format!("{key}: {desc}"));
    Some(TestScenario { name, plan })
}

fn expect_every_seat_dealt(summary: &SimulationSummary) -> Result<(), String> {
    let seats: BTreeSet<_> = summary.players.iter().collect();
    for (index, round) in summary.rounds.iter().enumerate() {
        let dealt: BTreeSet<_> = round.roles.keys().collect();
        if dealt != seats {
            return Err(format!(
                "round {} dealt {} seats for {} players",
                index + 1,
                dealt.len(),
                seats.len()
            ));
        }
    }
    Ok(())
}

fn expect_spy_count(summary: &SimulationSummary) -> Result<(), String> {
    for (index, round) in summary.rounds.iter().enumerate() {
        let spies = round.roles.values().filter(|role| role.is_spy()).count();
        if spies != summary.spies_per_round || round.spies.len() != spies {
            return Err(format!(
                "round {} dealt {spies} spies, expected {}",
                index + 1,
                summary.spies_per_round
            ));
        }
    }
    Ok(())
}

fn expect_fair_spy_shares(summary: &SimulationSummary) -> Result<(), String> {
    if summary.players.is_empty() {
        return Err("no players seated".to_string());
    }
    let expected = count_to_f64(summary.spies_per_round) / count_to_f64(summary.players.len());
    for (player, share) in summary.spy_shares() {
        if (share - expected).abs() > SHARE_TOLERANCE {
            return Err(format!(
                "{player} was spy in {:.1}% of rounds, expected {:.1}%",
                share * 100.0,
                expected * 100.0
            ));
        }
    }
    Ok(())
}

fn expect_reroll_on_repeat(summary: &SimulationSummary) -> Result<(), String> {
    // A repeated spy set can only survive as the second draw.
    match summary
        .rounds
        .iter()
        .position(|round| round.repeated_spies && !round.rerolled)
    {
        Some(index) => Err(format!(
            "round {} repeated the previous spies without a redraw",
            index + 1
        )),
        None => Ok(()),
    }
}

fn expect_rare_repeats(summary: &SimulationSummary) -> Result<(), String> {
    let rounds = summary.rounds.len().saturating_sub(1);
    if rounds == 0 || summary.spies_per_round == 0 {
        return Ok(());
    }
    let players = count_to_f64(summary.players.len());
    let spies = count_to_f64(summary.spies_per_round);
    // Upper bound on one collision for a single spy; two draws square it.
    let single = (spies / players).min(1.0);
    let bound = single * single + SHARE_TOLERANCE;
    let observed = count_to_f64(summary.repeat_count()) / count_to_f64(rounds);
    if observed > bound {
        return Err(format!(
            "spies repeated in {:.1}% of rounds, bound {:.1}%",
            observed * 100.0,
            bound * 100.0
        ));
    }
    Ok(())
}

fn expect_location_rotation(summary: &SimulationSummary) -> Result<(), String> {
    match summary.location_repeats() {
        0 => Ok(()),
        repeats => Err(format!("{repeats} consecutive rounds shared a location")),
    }
}

fn expect_filler_exhausts_roles(summary: &SimulationSummary) -> Result<(), String> {
    for (index, round) in summary.rounds.iter().enumerate() {
        let seats = round.roles.values().filter(|role| !role.is_spy()).count();
        let distinct: BTreeSet<_> = round.roles.values().filter_map(|role| role.slot()).collect();
        let blanks = round.roles.values().filter(|role| **role == Role::Blank).count();
        let want = seats.min(summary.defined_roles);
        if distinct.len() != want || blanks > 0 {
            return Err(format!(
                "round {} used {} distinct roles for {seats} seats (expected {want})",
                index + 1,
                distinct.len()
            ));
        }
    }
    Ok(())
}
