//! Content factory for building combat content from data files.

use std::path::PathBuf;

use combat_core::{AttackTable, CombatConfig};

use crate::loaders::{AttackCatalogLoader, ConfigLoader, LoadResult};

/// Content factory that loads all combat content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// └── attacks.ron
/// ```
///
/// Missing files fall back to the embedded defaults.
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load combat tuning from `config.toml`.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(CombatConfig::new());
        }
        ConfigLoader::load(&path)
    }

    /// Load weapon attack tables from `attacks.ron`.
    pub fn load_attacks(&self) -> LoadResult<AttackTable> {
        let path = self.data_dir.join("attacks.ron");
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no attack catalog, using embedded tables");
            return AttackCatalogLoader::embedded();
        }
        AttackCatalogLoader::load(&path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_directory_uses_embedded_content() {
        let dir = tempfile::tempdir().unwrap();
        let factory = ContentFactory::new(dir.path());

        assert_eq!(factory.load_config().unwrap(), CombatConfig::new());
        assert_eq!(
            factory.load_attacks().unwrap(),
            AttackCatalogLoader::embedded().unwrap()
        );
    }

    #[test]
    fn files_override_embedded_content() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.toml"), "hit_stop_millis = 40\n").unwrap();
        std::fs::write(
            dir.path().join("attacks.ron"),
            "(weapons: [(weapon: WeaponId(3), attacks: [])])",
        )
        .unwrap();

        let factory = ContentFactory::new(dir.path());
        assert_eq!(factory.load_config().unwrap().hit_stop_millis, 40);
        assert!(factory.load_attacks().unwrap().is_empty());
    }
}
