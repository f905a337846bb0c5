//! Configuration for the helpdeck viewer: where the docs folder lives.
//!
//! The config file is TOML at `~/.config/helpdeck/config.toml`. A
//! missing file is not an error; callers fall back to command-line
//! arguments. Stored paths may use `~` and `$VAR` forms, expanded at
//! load time.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub docs_path: PathBuf,
}

impl Config {
    /// Default config file location, tilde expanded.
    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/helpdeck");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Loads the config from the default location. `Ok(None)` when no
    /// config file exists yet.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        Self::load_from_path(Self::config_path())
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Option<Self>, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Some(config.expanded()))
    }

    /// Saves to the default location, creating directories as needed.
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to_path(Self::config_path())
    }

    pub fn save_to_path(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Expands `~` and `$VAR` in the docs path. A path that fails to
    /// expand (e.g. an unset variable) is kept as written.
    fn expanded(mut self) -> Self {
        if let Some(expanded) = expand_path(&self.docs_path) {
            self.docs_path = expanded;
        }
        self
    }
}

fn expand_path(path: &Path) -> Option<PathBuf> {
    let raw = path.to_string_lossy();
    shellexpand::full(&raw)
        .ok()
        .map(|expanded| PathBuf::from(expanded.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn config_path_is_under_expanded_home() {
        let path = Config::config_path();
        let text = path.to_string_lossy();
        assert!(!text.starts_with('~'));
        assert!(text.ends_with(".config/helpdeck/config.toml"));
    }

    #[test]
    fn missing_file_loads_as_none() {
        let dir = TempDir::new().unwrap();
        let loaded = Config::load_from_path(dir.path().join("absent.toml")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("config.toml");
        let config = Config {
            docs_path: PathBuf::from("/srv/helpdeck/docs"),
        };

        config.save_to_path(&file).unwrap();
        let loaded = Config::load_from_path(&file).unwrap().unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("deeply").join("nested").join("config.toml");
        let config = Config {
            docs_path: PathBuf::from("/srv/docs"),
        };

        config.save_to_path(&file).unwrap();

        assert!(file.exists());
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("config.toml");
        fs::write(&file, "docs_path = [not toml").unwrap();

        let result = Config::load_from_path(&file);

        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn tilde_in_stored_path_is_expanded_on_load() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("config.toml");
        fs::write(&file, "docs_path = \"~/helpdeck/docs\"").unwrap();

        let loaded = Config::load_from_path(&file).unwrap().unwrap();

        let text = loaded.docs_path.to_string_lossy();
        assert!(!text.starts_with('~'));
        assert!(text.ends_with("helpdeck/docs"));
    }

    #[test]
    fn env_var_in_stored_path_is_expanded_on_load() {
        unsafe {
            env::set_var("HELPDECK_TEST_DOCS", "/test/env/path");
        }

        let dir = TempDir::new().unwrap();
        let file = dir.path().join("config.toml");
        fs::write(&file, "docs_path = \"$HELPDECK_TEST_DOCS/manuals\"").unwrap();

        let loaded = Config::load_from_path(&file).unwrap().unwrap();
        assert_eq!(loaded.docs_path, PathBuf::from("/test/env/path/manuals"));

        unsafe {
            env::remove_var("HELPDECK_TEST_DOCS");
        }
    }

    #[test]
    fn absolute_path_survives_expansion() {
        assert_eq!(
            expand_path(Path::new("/absolute/path")),
            Some(PathBuf::from("/absolute/path"))
        );
    }

    #[test]
    fn unset_variable_keeps_path_as_written() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("config.toml");
        fs::write(&file, "docs_path = \"$HELPDECK_UNSET_VAR/docs\"").unwrap();

        let loaded = Config::load_from_path(&file).unwrap().unwrap();
        assert_eq!(loaded.docs_path, PathBuf::from("$HELPDECK_UNSET_VAR/docs"));
    }
}
