//! Combat configuration loader.

use std::path::Path;

use combat_core::CombatConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for combat tuning from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Keys missing from the file keep their [`CombatConfig::new`] values.
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        let config = Self::parse(&content)?;
        tracing::info!(path = %path.display(), step_millis = config.step_millis, "combat config loaded");
        Ok(config)
    }

    pub fn parse(content: &str) -> LoadResult<CombatConfig> {
        let config: CombatConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        anyhow::ensure!(config.step_millis > 0, "step_millis must be positive");
        anyhow::ensure!(
            config.juggle_hit_ceiling > 0,
            "juggle_hit_ceiling must be positive"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&config.full_defense_fraction),
            "full_defense_fraction must lie in [0, 1]"
        );
        anyhow::ensure!(
            config.max_charge_scalar >= 1.0 && config.rage_damage_scalar >= 1.0,
            "damage scalars must not shrink damage"
        );

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn bundled_config_matches_defaults() {
        let config = ConfigLoader::parse(include_str!("../../data/config.toml")).unwrap();
        assert_eq!(config, CombatConfig::new());
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "step_millis = 50\nstun_millis = 1000").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.step_millis, 50);
        assert_eq!(config.ticks(config.stun_millis), 20);
        assert_eq!(config.knockdown_millis, CombatConfig::new().knockdown_millis);
    }

    #[test]
    fn zero_step_is_rejected() {
        assert!(ConfigLoader::parse("step_millis = 0").is_err());
    }

    #[test]
    fn malformed_toml_is_rejected() {
        let error = ConfigLoader::parse("stun_millis = \"long\"").unwrap_err();
        assert!(error.to_string().contains("Failed to parse config TOML"));
    }
}
