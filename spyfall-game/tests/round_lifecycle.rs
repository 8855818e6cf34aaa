use spyfall_game::{
    CustomLocation, GameConfig, GameContext, GamePhase, GameRules, GameUpdate, LocationCatalog,
    LocationId, MAX_PLAYERS, MIN_PLAYERS, MemoryStore, PlayerCountController, PlayerId,
    RemotePlayer, Role, RoleSlot, Room, RoundRng, SpyfallEngine, can_start_game,
};
use std::collections::{BTreeMap, BTreeSet};

fn engine() -> SpyfallEngine<MemoryStore> {
    SpyfallEngine::new(LocationCatalog::builtin().unwrap(), MemoryStore::default())
}

fn play_round(
    engine: &SpyfallEngine<MemoryStore>,
    config: &GameConfig,
    room: Option<&Room>,
    seed: u64,
) {
    let state = engine.store().snapshot();
    let mut rng = RoundRng::from_user_seed(seed);
    engine
        .start_game(&GameContext::new(&state, config, room), &mut rng)
        .unwrap();
    let started = engine.store().snapshot();
    engine
        .end_game(&GameContext::new(&started, config, room))
        .unwrap();
}

#[test]
fn consecutive_rounds_rotate_locations() {
    let engine = engine();
    let config = GameConfig::with_local_players(6);

    for seed in 0..40 {
        let before = engine.store().snapshot();
        play_round(&engine, &config, None, seed);
        let after = engine.store().snapshot();
        assert_eq!(after.phase, GamePhase::Stopped);
        assert_eq!(after.prev_location, before.location);
        assert_ne!(after.location, before.location);
        assert_eq!(after.player_roles.len(), 6);
        assert_eq!(after.spies.len(), 1);
    }

    let history = engine.store().history();
    assert_eq!(history.len(), 80);
    assert!(matches!(history[0], GameUpdate::Started { .. }));
    assert!(matches!(
        history[1],
        GameUpdate::Stopped {
            timer_running: false
        }
    ));
}

#[test]
fn same_seed_deals_the_same_round() {
    let config = GameConfig::with_local_players(7);
    let first = engine();
    let second = engine();
    play_round(&first, &config, None, 0xFACE);
    play_round(&second, &config, None, 0xFACE);
    assert_eq!(first.store().snapshot(), second.store().snapshot());
}

#[test]
fn custom_location_with_two_roles_fills_six_seats() {
    let mut config = GameConfig::with_local_players(6);
    let role_a = RoleSlot::new(1).unwrap();
    let role_b = RoleSlot::new(4).unwrap();
    let mut custom = BTreeMap::new();
    custom.insert(
        LocationId::from("garage"),
        CustomLocation::new("Garage")
            .with_role(role_a, "Mechanic")
            .with_role(role_b, "Customer"),
    );
    config.custom_locations = custom;
    config.selected_locations = Some(BTreeSet::new());

    let engine = engine();
    play_round(&engine, &config, None, 12);
    let state = engine.store().snapshot();
    assert_eq!(state.location, Some(LocationId::from("garage")));

    let non_spy: Vec<Role> = state
        .player_roles
        .values()
        .copied()
        .filter(|role| !role.is_spy())
        .collect();
    assert_eq!(non_spy.len(), 5);
    assert!(non_spy.contains(&Role::Slot(role_a)));
    assert!(non_spy.contains(&Role::Slot(role_b)));
    assert!(
        non_spy
            .iter()
            .all(|role| matches!(role, Role::Slot(s) if *s == role_a || *s == role_b))
    );
}

#[test]
fn custom_location_without_roles_deals_blanks() {
    let mut config = GameConfig::with_local_players(4);
    let mut custom = BTreeMap::new();
    custom.insert(LocationId::from("void"), CustomLocation::new("Void"));
    config.custom_locations = custom;
    config.selected_locations = Some(BTreeSet::new());

    let engine = engine();
    play_round(&engine, &config, None, 3);
    let state = engine.store().snapshot();
    let blanks = state
        .player_roles
        .values()
        .filter(|role| **role == Role::Blank)
        .count();
    assert_eq!(blanks, 3);
}

#[test]
fn lobby_controls_gate_the_start_button() {
    let rules = GameRules::default();
    let mut config = GameConfig::default();
    let mut room = Room::new("room");
    room.connected = true;

    for _ in 0..MIN_PLAYERS - 1 {
        let mut controller = PlayerCountController::new(&config, Some(&room), &rules);
        controller.add_player(&mut config).unwrap();
    }
    assert!(!can_start_game(&config, Some(&room), &rules));

    room.remote_players
        .insert(PlayerId::from("remote-1"), RemotePlayer::default());
    assert!(can_start_game(&config, Some(&room), &rules));

    let mut controller = PlayerCountController::new(&config, Some(&room), &rules);
    while controller.add_player(&mut config).is_some() {}
    assert_eq!(controller.total_players(), MAX_PLAYERS);
    assert!(can_start_game(&config, Some(&room), &rules));
    assert_eq!(config.players.len(), MAX_PLAYERS - 1);
}
