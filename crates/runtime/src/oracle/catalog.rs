//! Attack catalog oracle implementation for runtime.

use std::path::Path;

use combat_content::{AttackCatalogLoader, ContentFactory};
use combat_core::{AttackCatalog, AttackDefinition, AttackId, AttackTable, WeaponId};

use crate::api::{Result, RuntimeError};

/// Runtime implementation of AttackCatalog that wraps a loaded AttackTable
pub struct AttackCatalogImpl {
    table: AttackTable,
}

impl AttackCatalogImpl {
    pub fn new(table: AttackTable) -> Self {
        Self { table }
    }

    /// Weapon tables compiled into `combat-content`.
    pub fn embedded() -> Result<Self> {
        AttackCatalogLoader::embedded()
            .map(Self::new)
            .map_err(RuntimeError::Content)
    }

    /// `attacks.ron` from a content directory, or the embedded tables.
    pub fn from_content_dir(data_dir: &Path) -> Result<Self> {
        ContentFactory::new(data_dir)
            .load_attacks()
            .map(Self::new)
            .map_err(RuntimeError::Content)
    }

    pub fn table(&self) -> &AttackTable {
        &self.table
    }
}

impl AttackCatalog for AttackCatalogImpl {
    fn attack(&self, id: AttackId) -> Option<&AttackDefinition> {
        self.table.attack(id)
    }

    fn weapon_attacks(&self, weapon: WeaponId) -> &[AttackDefinition] {
        self.table.weapon_attacks(weapon)
    }
}
