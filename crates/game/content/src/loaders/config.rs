//! Combat configuration loader.

use std::path::Path;

use combat_core::CombatConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for combat tuning from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load a [`CombatConfig`] from a TOML file.
    ///
    /// Missing keys keep their defaults, so an empty file is valid.
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse a [`CombatConfig`] from TOML text.
    pub fn parse(content: &str) -> LoadResult<CombatConfig> {
        let config: CombatConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse combat config TOML: {}", e))?;

        anyhow::ensure!(
            config.combo_window >= 0.0,
            "combo_window must not be negative (got {})",
            config.combo_window
        );
        anyhow::ensure!(
            config.turn_duration >= 0.0,
            "turn_duration must not be negative (got {})",
            config.turn_duration
        );
        anyhow::ensure!(
            config.priority_step > 0.0,
            "priority_step must be positive (got {})",
            config.priority_step
        );

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn missing_keys_use_defaults() {
        let config = ConfigLoader::parse("combo_window = 2.5\n").expect("valid toml");
        assert_eq!(config.combo_window, 2.5);
        assert_eq!(config.turn_duration, CombatConfig::DEFAULT_TURN_DURATION);
        assert_eq!(config.priority_step, CombatConfig::DEFAULT_PRIORITY_STEP);
        assert!(!config.turn_rounds);
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "turn_duration = 0.5").expect("write");

        let config = ConfigLoader::load(file.path()).expect("valid config");
        assert_eq!(config.turn_duration, 0.5);
    }

    #[test]
    fn rejects_non_positive_priority_step() {
        let error = ConfigLoader::parse("priority_step = 0.0").unwrap_err();
        assert!(error.to_string().contains("priority_step"));
    }

    #[test]
    fn reports_missing_files() {
        let error = ConfigLoader::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(error.to_string().contains("Failed to read file"));
    }
}
