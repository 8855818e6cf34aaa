//! Built-in and custom locations behind a single role-slot capability.
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use thiserror::Error;

use crate::constants::MAX_ROLES;
use crate::role::RoleSlot;

const BUILTIN_LOCATIONS_JSON: &str = include_str!("../assets/locations.json");

/// Key of a location, built-in (`airplane`) or user-defined.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct LocationId(String);

impl LocationId {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LocationId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Errors raised while resolving locations for a round.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocationError {
    #[error("no playable locations are enabled")]
    Empty,
    #[error("unknown location `{0}`")]
    Unknown(LocationId),
}

/// Sparse role-slot lookup shared by every kind of location.
pub trait RoleCatalog {
    /// Display name of the location.
    fn name(&self) -> &str;

    /// Every slot with its role name, or `None` where the slot is absent.
    fn role_slots(&self) -> Vec<(RoleSlot, Option<&str>)>;

    /// Slots that carry a non-empty role name.
    fn defined_roles(&self) -> Vec<RoleSlot> {
        self.role_slots()
            .into_iter()
            .filter_map(|(slot, name)| {
                name.filter(|n| !n.trim().is_empty()).map(|_| slot)
            })
            .collect()
    }

    /// Role name for a slot, if defined.
    fn role_name(&self, slot: RoleSlot) -> Option<&str> {
        self.role_slots()
            .into_iter()
            .find(|(candidate, _)| *candidate == slot)
            .and_then(|(_, name)| name)
            .filter(|n| !n.trim().is_empty())
    }
}

/// A location shipped with the game. Roles are positional; `null` marks an
/// absent slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuiltinLocation {
    #[serde(skip)]
    pub id: LocationId,
    pub name: String,
    #[serde(default)]
    pub roles: Vec<Option<String>>,
}

impl RoleCatalog for BuiltinLocation {
    fn name(&self) -> &str {
        &self.name
    }

    fn role_slots(&self) -> Vec<(RoleSlot, Option<&str>)> {
        RoleSlot::all()
            .map(|slot| {
                let name = self
                    .roles
                    .get(slot.index() - 1)
                    .and_then(Option::as_deref);
                (slot, name)
            })
            .collect()
    }
}

/// A user-defined location; roles are stored under explicit `roleN` keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CustomLocation {
    pub name: String,
    #[serde(flatten)]
    pub slots: BTreeMap<String, String>,
}

impl CustomLocation {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slots: BTreeMap::new(),
        }
    }

    /// Set a role name for a slot, builder style.
    #[must_use]
    pub fn with_role(mut self, slot: RoleSlot, name: impl Into<String>) -> Self {
        self.slots.insert(slot.key(), name.into());
        self
    }
}

impl RoleCatalog for CustomLocation {
    fn name(&self) -> &str {
        &self.name
    }

    fn role_slots(&self) -> Vec<(RoleSlot, Option<&str>)> {
        RoleSlot::all()
            .map(|slot| (slot, self.slots.get(&slot.key()).map(String::as_str)))
            .collect()
    }
}

/// Borrowed view over either location kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location<'a> {
    Builtin(&'a BuiltinLocation),
    Custom(&'a CustomLocation),
}

impl Location<'_> {
    #[must_use]
    pub const fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }
}

impl RoleCatalog for Location<'_> {
    fn name(&self) -> &str {
        match self {
            Self::Builtin(location) => location.name(),
            Self::Custom(location) => location.name(),
        }
    }

    fn role_slots(&self) -> Vec<(RoleSlot, Option<&str>)> {
        match self {
            Self::Builtin(location) => location.role_slots(),
            Self::Custom(location) => location.role_slots(),
        }
    }
}

/// Every location a round may be played at.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LocationCatalog {
    builtin: Vec<BuiltinLocation>,
    custom: BTreeMap<LocationId, CustomLocation>,
    enabled: Option<BTreeSet<LocationId>>,
}

impl LocationCatalog {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load the built-in locations bundled with the crate.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled asset cannot be parsed.
    pub fn builtin() -> Result<Self, serde_json::Error> {
        Self::from_json(BUILTIN_LOCATIONS_JSON)
    }

    /// Load built-in locations from a JSON object keyed by location id.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into location data.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let map: BTreeMap<String, BuiltinLocation> = serde_json::from_str(json)?;
        let builtin = map
            .into_iter()
            .map(|(id, mut location)| {
                location.id = LocationId::new(id);
                location.roles.truncate(MAX_ROLES);
                location
            })
            .collect();
        Ok(Self {
            builtin,
            ..Self::default()
        })
    }

    /// Replace the custom locations.
    #[must_use]
    pub fn with_custom(mut self, custom: BTreeMap<LocationId, CustomLocation>) -> Self {
        self.custom = custom;
        self
    }

    /// Restrict built-in locations to the given ids. `None` enables every
    /// built-in; an empty set plays custom locations only.
    #[must_use]
    pub fn with_enabled(mut self, enabled: Option<BTreeSet<LocationId>>) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn builtin_locations(&self) -> impl Iterator<Item = &BuiltinLocation> {
        self.builtin.iter()
    }

    fn builtin_enabled(&self, id: &LocationId) -> bool {
        self.enabled
            .as_ref()
            .is_none_or(|enabled| enabled.contains(id))
    }

    fn is_builtin(&self, id: &LocationId) -> bool {
        self.builtin.iter().any(|location| &location.id == id)
    }

    /// Enabled built-in ids followed by custom ids. A custom location that
    /// reuses a built-in id is shadowed and never listed.
    #[must_use]
    pub fn playable_ids(&self) -> Vec<LocationId> {
        let custom = self.custom.keys().filter(|id| !self.is_builtin(id));
        self.builtin
            .iter()
            .map(|location| &location.id)
            .filter(|id| self.builtin_enabled(id))
            .chain(custom)
            .cloned()
            .collect()
    }

    /// Look up a location of either kind. Built-in ids take precedence.
    #[must_use]
    pub fn get(&self, id: &LocationId) -> Option<Location<'_>> {
        self.builtin
            .iter()
            .find(|location| &location.id == id)
            .map(Location::Builtin)
            .or_else(|| self.custom.get(id).map(Location::Custom))
    }

    /// Resolve a location or report it as unknown.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError::Unknown`] when no location has this id.
    pub fn resolve(&self, id: &LocationId) -> Result<Location<'_>, LocationError> {
        self.get(id).ok_or_else(|| LocationError::Unknown(id.clone()))
    }

    /// Pick the next round's location uniformly, skipping `previous` whenever
    /// another location is playable.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError::Empty`] when no location is playable.
    pub fn pick_next<R>(
        &self,
        rng: &mut R,
        previous: Option<&LocationId>,
    ) -> Result<LocationId, LocationError>
    where
        R: Rng + ?Sized,
    {
        let mut candidates = self.playable_ids();
        if candidates.len() > 1
            && let Some(previous) = previous
        {
            candidates.retain(|id| id != previous);
        }
        candidates.choose(rng).cloned().ok_or(LocationError::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use rand_chacha::ChaCha8Rng;

    fn slot(index: usize) -> RoleSlot {
        RoleSlot::new(index).unwrap()
    }

    #[test]
    fn bundled_catalog_parses() {
        let catalog = LocationCatalog::builtin().unwrap();
        let ids = catalog.playable_ids();
        assert!(ids.len() > 5);
        let airplane = catalog.resolve(&LocationId::from("airplane")).unwrap();
        assert_eq!(airplane.name(), "Airplane");
        assert_eq!(airplane.defined_roles().len(), MAX_ROLES);
        assert_eq!(airplane.role_name(slot(7)), Some("Captain"));
    }

    #[test]
    fn builtin_null_slots_are_absent() {
        let catalog = LocationCatalog::builtin().unwrap();
        let station = catalog.resolve(&LocationId::from("police_station")).unwrap();
        let defined = station.defined_roles();
        assert_eq!(defined.len(), MAX_ROLES - 1);
        assert!(!defined.contains(&slot(7)));
        assert!(station.role_name(slot(7)).is_none());
    }

    #[test]
    fn custom_location_reads_explicit_keys() {
        let json = r#"{ "name": "Treehouse", "role1": "Lookout", "role3": "", "role5": "Cook", "notes": "ignored" }"#;
        let custom: CustomLocation = serde_json::from_str(json).unwrap();
        assert_eq!(custom.name(), "Treehouse");
        assert_eq!(custom.defined_roles(), vec![slot(1), slot(5)]);
        assert_eq!(custom.role_name(slot(5)), Some("Cook"));
        assert!(custom.role_name(slot(3)).is_none());
    }

    #[test]
    fn location_view_delegates_to_both_kinds() {
        let custom = CustomLocation::new("Garage").with_role(slot(2), "Mechanic");
        let mut map = BTreeMap::new();
        map.insert(LocationId::from("garage"), custom);
        let catalog = LocationCatalog::builtin().unwrap().with_custom(map);

        let garage = catalog.resolve(&LocationId::from("garage")).unwrap();
        assert!(garage.is_custom());
        assert_eq!(garage.defined_roles(), vec![slot(2)]);

        let bank = catalog.resolve(&LocationId::from("bank")).unwrap();
        assert!(!bank.is_custom());
        assert_eq!(
            catalog.resolve(&LocationId::from("moon")),
            Err(LocationError::Unknown(LocationId::from("moon")))
        );
    }

    #[test]
    fn enabled_set_filters_builtins_but_keeps_custom() {
        let mut custom = BTreeMap::new();
        custom.insert(LocationId::from("garage"), CustomLocation::new("Garage"));
        let enabled = [LocationId::from("bank")].into_iter().collect();
        let catalog = LocationCatalog::builtin()
            .unwrap()
            .with_enabled(Some(enabled))
            .with_custom(custom);
        let ids = catalog.playable_ids();
        assert_eq!(ids, vec![LocationId::from("bank"), LocationId::from("garage")]);
    }

    #[test]
    fn pick_next_never_repeats_previous_when_alternatives_exist() {
        let catalog = LocationCatalog::builtin().unwrap();
        let mut rng = SmallRng::seed_from_u64(7);
        let mut previous = catalog.pick_next(&mut rng, None).unwrap();
        for _ in 0..200 {
            let next = catalog.pick_next(&mut rng, Some(&previous)).unwrap();
            assert_ne!(next, previous);
            previous = next;
        }
    }

    #[test]
    fn pick_next_repeats_single_location_and_rejects_empty() {
        let enabled = [LocationId::from("casino")].into_iter().collect();
        let catalog = LocationCatalog::builtin()
            .unwrap()
            .with_enabled(Some(enabled));
        let mut rng = SmallRng::seed_from_u64(1);
        let casino = LocationId::from("casino");
        assert_eq!(catalog.pick_next(&mut rng, Some(&casino)), Ok(casino.clone()));

        let empty = LocationCatalog::empty();
        assert_eq!(empty.pick_next(&mut rng, None), Err(LocationError::Empty));
    }

    #[test]
    fn pick_next_visits_every_playable_location() {
        let catalog = LocationCatalog::builtin().unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        let mut seen = BTreeSet::new();
        let mut previous = None;
        for _ in 0..500 {
            let next = catalog.pick_next(&mut rng, previous.as_ref()).unwrap();
            seen.insert(next.clone());
            previous = Some(next);
        }
        assert_eq!(seen.len(), catalog.playable_ids().len());
    }

    #[test]
    fn custom_location_reusing_builtin_id_is_listed_once() {
        let mut custom = BTreeMap::new();
        custom.insert(LocationId::from("bank"), CustomLocation::new("My Bank"));
        custom.insert(LocationId::from("garage"), CustomLocation::new("Garage"));
        let builtin = LocationCatalog::builtin().unwrap();
        let builtin_count = builtin.playable_ids().len();
        let catalog = builtin.with_custom(custom);

        let ids = catalog.playable_ids();
        let banks = ids.iter().filter(|id| id.as_str() == "bank").count();
        assert_eq!(banks, 1);
        assert_eq!(ids.len(), builtin_count + 1);
        let unique: BTreeSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
        assert!(matches!(
            catalog.get(&LocationId::from("bank")),
            Some(Location::Builtin(_))
        ));

        let mut rng = SmallRng::seed_from_u64(99);
        let draws = 12_000;
        let bank_draws = (0..draws)
            .filter(|_| catalog.pick_next(&mut rng, None).unwrap().as_str() == "bank")
            .count();
        let expected = draws / ids.len();
        assert!(bank_draws.abs_diff(expected) < expected / 5, "bank drawn {bank_draws} times");
    }

    #[test]
    fn empty_enabled_set_plays_custom_locations_only() {
        let mut custom = BTreeMap::new();
        custom.insert(LocationId::from("garage"), CustomLocation::new("Garage"));
        let catalog = LocationCatalog::builtin()
            .unwrap()
            .with_enabled(Some(BTreeSet::new()))
            .with_custom(custom);
        assert_eq!(catalog.playable_ids(), vec![LocationId::from("garage")]);

        let all = LocationCatalog::builtin().unwrap().with_enabled(None);
        assert_eq!(all.playable_ids().len(), all.builtin_locations().count());
    }
}
