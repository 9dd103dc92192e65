//! Weapon attack table loader.

use std::collections::BTreeSet;
use std::path::Path;

use combat_core::{AttackDefinition, AttackTable, WeaponId};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

const EMBEDDED_ATTACKS: &str = include_str!("../../data/attacks.ron");

/// One weapon's attack list, in selection order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponTable {
    pub weapon: WeaponId,
    #[serde(default)]
    pub name: String,
    pub attacks: Vec<AttackDefinition>,
}

/// Attack catalog structure for RON files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttackCatalogData {
    pub weapons: Vec<WeaponTable>,
}

impl AttackCatalogData {
    /// Checks the catalog-wide invariants the combat rules rely on.
    ///
    /// Attack ids are looked up across every weapon, so they must be unique
    /// catalog-wide, not just within a weapon.
    pub fn validate(&self) -> LoadResult<()> {
        let mut weapons = BTreeSet::new();
        let mut attacks = BTreeSet::new();

        for table in &self.weapons {
            anyhow::ensure!(
                weapons.insert(table.weapon),
                "weapon {} is defined twice",
                table.weapon
            );
            for attack in &table.attacks {
                anyhow::ensure!(
                    attacks.insert(attack.id),
                    "attack {} ({}) is defined twice",
                    attack.id,
                    attack.name
                );
                anyhow::ensure!(
                    !attack.inputs.is_empty(),
                    "attack {} ({}) has no input sequence",
                    attack.id,
                    attack.name
                );
                anyhow::ensure!(
                    attack.damage.is_finite() && attack.damage >= 0.0,
                    "attack {} ({}) has invalid damage {}",
                    attack.id,
                    attack.name,
                    attack.damage
                );
                let phases = attack.phases;
                anyhow::ensure!(
                    0.0 <= phases.attack_start
                        && phases.attack_start <= phases.recovery_start
                        && phases.recovery_start <= phases.recovery_end
                        && phases.recovery_end <= 1.0,
                    "attack {} ({}) has unordered phase thresholds",
                    attack.id,
                    attack.name
                );
            }
        }
        Ok(())
    }

    pub fn into_table(self) -> AttackTable {
        let mut table = AttackTable::new();
        for weapon in self.weapons {
            table.insert_weapon(weapon.weapon, weapon.attacks);
        }
        table
    }
}

/// Loader for attack tables from RON files.
pub struct AttackCatalogLoader;

impl AttackCatalogLoader {
    /// Load attack catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<AttackTable> {
        let content = read_file(path)?;
        let data = Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))?;
        tracing::info!(path = %path.display(), weapons = data.weapons.len(), "attack catalog loaded");
        Ok(data.into_table())
    }

    /// Parses and validates catalog RON.
    pub fn parse(content: &str) -> LoadResult<AttackCatalogData> {
        let data: AttackCatalogData = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse attack catalog RON: {}", e))?;
        data.validate()?;
        Ok(data)
    }

    /// The catalog compiled into the crate.
    pub fn embedded() -> LoadResult<AttackTable> {
        Ok(Self::parse(EMBEDDED_ATTACKS)?.into_table())
    }
}
