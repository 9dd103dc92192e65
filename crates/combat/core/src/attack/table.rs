use std::collections::BTreeMap;

use super::definition::{AttackDefinition, AttackId, WeaponId};
use crate::env::AttackCatalog;

/// In-memory attack catalog keyed by weapon.
///
/// Table order inside a weapon is significant: the combo selector takes the
/// first matching entry.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackTable {
    weapons: BTreeMap<WeaponId, Vec<AttackDefinition>>,
}

impl AttackTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces a weapon's attack list.
    pub fn insert_weapon(&mut self, weapon: WeaponId, attacks: Vec<AttackDefinition>) {
        self.weapons.insert(weapon, attacks);
    }

    #[must_use]
    pub fn with_weapon(mut self, weapon: WeaponId, attacks: Vec<AttackDefinition>) -> Self {
        self.insert_weapon(weapon, attacks);
        self
    }

    pub fn weapons(&self) -> impl Iterator<Item = WeaponId> + '_ {
        self.weapons.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.weapons.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AttackCatalog for AttackTable {
    fn attack(&self, id: AttackId) -> Option<&AttackDefinition> {
        self.weapons
            .values()
            .flat_map(|attacks| attacks.iter())
            .find(|attack| attack.id == id)
    }

    fn weapon_attacks(&self, weapon: WeaponId) -> &[AttackDefinition] {
        self.weapons.get(&weapon).map_or(&[], Vec::as_slice)
    }
}
