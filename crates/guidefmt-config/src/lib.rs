use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Column width lines are wrapped to.
    #[serde(default = "default_width")]
    pub width: usize,

    #[serde(default)]
    pub index: IndexConfig,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndexConfig {
    /// Leading strings stripped from index terms when sorting and grouping,
    /// never from the displayed term.
    #[serde(default)]
    pub ignore_prefixes: Vec<String>,

    /// Extra node names whose entries feed the consolidated index.
    #[serde(default)]
    pub subindexes: Vec<String>,

    /// Column at which index references start.
    #[serde(default = "default_refs_indent")]
    pub refs_indent: usize,

    /// Minimum spacing between an index term and its references.
    #[serde(default = "default_refs_gap")]
    pub refs_gap: usize,
}

fn default_width() -> usize {
    80
}

fn default_refs_indent() -> usize {
    20
}

fn default_refs_gap() -> usize {
    3
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: default_width(),
            index: IndexConfig::default(),
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            ignore_prefixes: Vec::new(),
            subindexes: Vec::new(),
            refs_indent: default_refs_indent(),
            refs_gap: default_refs_gap(),
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/guidefmt");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        // Should not contain tilde anymore
        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/guidefmt/config.toml"));
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.width, 80);
        assert_eq!(config.index.refs_indent, 20);
        assert_eq!(config.index.refs_gap, 3);
        assert!(config.index.ignore_prefixes.is_empty());
        assert!(config.index.subindexes.is_empty());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let empty: Config = toml::from_str("").unwrap();
        assert_eq!(empty, Config::default());
    }

    #[test]
    fn test_partial_config_fills_gaps() {
        let config: Config = toml::from_str("width = 64\n").unwrap();
        assert_eq!(config.width, 64);
        assert_eq!(config.index, IndexConfig::default());
    }

    #[test]
    fn test_index_section() {
        let content = r#"
[index]
ignore_prefixes = [".", "_"]
subindexes = ["SUBIDX"]
refs_indent = 24
"#;
        let config: Config = toml::from_str(content).unwrap();
        assert_eq!(config.index.ignore_prefixes, vec![".", "_"]);
        assert_eq!(config.index.subindexes, vec!["SUBIDX"]);
        assert_eq!(config.index.refs_indent, 24);
        assert_eq!(config.index.refs_gap, 3);
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let original = Config {
            width: 72,
            index: IndexConfig {
                ignore_prefixes: vec![".".to_string()],
                subindexes: vec!["SUBIDX".to_string()],
                refs_indent: 24,
                refs_gap: 2,
            },
        };

        let toml_str = toml::to_string(&original).unwrap();
        let deserialized: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        let test_config = Config {
            width: 72,
            ..Config::default()
        };

        test_config.save_to_path(&config_file).unwrap();

        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }

    #[test]
    fn test_invalid_toml_is_a_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "width = \"eighty\"").unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();
        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
    }
}
