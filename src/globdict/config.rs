use crate::allocator::IdPolicy;
use crate::error::{DictError, Result};
use crate::model::MAX_GLOBAL_SIZE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";

/// Store configuration, read from `config.json` in the config directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DictConfig {
    /// Hard cap on the number of entries in the global dictionary
    #[serde(default = "default_max_global_size")]
    pub max_global_size: usize,

    /// How handles are chosen for new dictionaries
    #[serde(default)]
    pub id_policy: IdPolicy,
}

fn default_max_global_size() -> usize {
    MAX_GLOBAL_SIZE
}

impl Default for DictConfig {
    fn default() -> Self {
        Self {
            max_global_size: MAX_GLOBAL_SIZE,
            id_policy: IdPolicy::default(),
        }
    }
}

impl DictConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(DictError::Io)?;
        let config: DictConfig =
            serde_json::from_str(&content).map_err(DictError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(DictError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(DictError::Serialization)?;
        fs::write(config_path, content).map_err(DictError::Io)?;
        Ok(())
    }

    pub fn with_max_global_size(mut self, max: usize) -> Self {
        self.max_global_size = max;
        self
    }

    pub fn with_id_policy(mut self, policy: IdPolicy) -> Self {
        self.id_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DictConfig::default();
        assert_eq!(config.max_global_size, 42);
        assert_eq!(config.id_policy, IdPolicy::Compact);
    }

    #[test]
    fn test_load_missing_config() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = DictConfig::load(temp_dir.path().join("nowhere")).unwrap();
        assert_eq!(config, DictConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_dir = temp_dir.path().join("nested");

        let config = DictConfig::default()
            .with_max_global_size(7)
            .with_id_policy(IdPolicy::Monotonic);
        config.save(&config_dir).unwrap();

        let loaded = DictConfig::load(&config_dir).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(
            temp_dir.path().join(CONFIG_FILENAME),
            r#"{ "id_policy": "monotonic" }"#,
        )
        .unwrap();

        let loaded = DictConfig::load(temp_dir.path()).unwrap();
        assert_eq!(loaded.max_global_size, MAX_GLOBAL_SIZE);
        assert_eq!(loaded.id_policy, IdPolicy::Monotonic);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILENAME), "{ not json").unwrap();
        assert!(matches!(
            DictConfig::load(temp_dir.path()),
            Err(DictError::Serialization(_))
        ));
    }
}
