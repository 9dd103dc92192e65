use crate::attack::{AttackDefinition, AttackId, WeaponId};

/// Read-only source of attack definitions.
pub trait AttackCatalog: Send + Sync {
    fn attack(&self, id: AttackId) -> Option<&AttackDefinition>;

    /// A weapon's attack table in selection order. Empty for unknown weapons.
    fn weapon_attacks(&self, weapon: WeaponId) -> &[AttackDefinition];
}
