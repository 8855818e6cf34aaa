//! Role values dealt to players for a round.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{MAX_ROLES, ROLE_KEY_PREFIX};

/// One-based role slot key within a location (`role1`..`role7`).
///
/// Roles are carried as slot keys rather than display names so the hosting
/// application can localize them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleSlot(u8);

impl RoleSlot {
    /// Build a slot from its one-based index, rejecting out-of-range values.
    #[must_use]
    pub fn new(index: usize) -> Option<Self> {
        if (1..=MAX_ROLES).contains(&index) {
            u8::try_from(index).ok().map(Self)
        } else {
            None
        }
    }

    /// Parse a catalog key such as `role3`.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        let digits = key.strip_prefix(ROLE_KEY_PREFIX)?;
        digits.parse::<usize>().ok().and_then(Self::new)
    }

    /// Every slot a location may define, in order.
    pub fn all() -> impl Iterator<Item = Self> {
        (1..=MAX_ROLES).filter_map(Self::new)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Catalog key for this slot (`role{n}`).
    #[must_use]
    pub fn key(self) -> String {
        format!("{ROLE_KEY_PREFIX}{}", self.0)
    }
}

impl fmt::Display for RoleSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

/// A role held by exactly one player for the duration of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The player does not know the round's location.
    Spy,
    /// A location role.
    Slot(RoleSlot),
    /// Placeholder for locations that define no roles at all.
    Blank,
}

impl Role {
    #[must_use]
    pub const fn is_spy(self) -> bool {
        matches!(self, Self::Spy)
    }

    /// Slot key for location roles, `None` for spies and blanks.
    #[must_use]
    pub const fn slot(self) -> Option<RoleSlot> {
        match self {
            Self::Slot(slot) => Some(slot),
            Self::Spy | Self::Blank => None,
        }
    }
}

impl From<RoleSlot> for Role {
    fn from(slot: RoleSlot) -> Self {
        Self::Slot(slot)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spy => write!(f, "spy"),
            Self::Slot(slot) => write!(f, "{slot}"),
            Self::Blank => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_keys_parse_within_bounds() {
        assert_eq!(RoleSlot::from_key("role1"), RoleSlot::new(1));
        assert_eq!(RoleSlot::from_key("role7").map(RoleSlot::index), Some(7));
        assert!(RoleSlot::from_key("role0").is_none());
        assert!(RoleSlot::from_key("role8").is_none());
        assert!(RoleSlot::from_key("name").is_none());
        assert!(RoleSlot::from_key("roleX").is_none());
    }

    #[test]
    fn all_slots_cover_catalog_width() {
        let keys: Vec<_> = RoleSlot::all().map(RoleSlot::key).collect();
        assert_eq!(keys.len(), MAX_ROLES);
        assert_eq!(keys.first().map(String::as_str), Some("role1"));
        assert_eq!(keys.last().map(String::as_str), Some("role7"));
    }

    #[test]
    fn roles_serialize_as_snake_case() {
        let slot = RoleSlot::new(2).unwrap();
        assert_eq!(serde_json::to_string(&Role::Spy).unwrap(), "\"spy\"");
        assert_eq!(serde_json::to_string(&Role::Blank).unwrap(), "\"blank\"");
        assert_eq!(
            serde_json::to_string(&Role::Slot(slot)).unwrap(),
            r#"{"slot":2}"#
        );
        let parsed: Role = serde_json::from_str(r#"{"slot":2}"#).unwrap();
        assert_eq!(parsed.slot(), Some(slot));
    }

    #[test]
    fn display_matches_catalog_keys() {
        assert_eq!(Role::Spy.to_string(), "spy");
        assert_eq!(Role::Blank.to_string(), "");
        assert_eq!(Role::from(RoleSlot::new(4).unwrap()).to_string(), "role4");
        assert!(Role::Spy.is_spy());
        assert!(!Role::Blank.is_spy());
    }
}
