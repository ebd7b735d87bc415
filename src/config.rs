use std::{
    io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub prompt: String,
    pub history_file: Option<PathBuf>,
    pub log_dir: PathBuf,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prompt: "$ ".into(),
            history_file: None,
            log_dir: home()
                .map(|home| home.join(".local/state/skiff"))
                .unwrap_or_else(std::env::temp_dir),
            log_filter: "skiff=info".into(),
        }
    }
}

fn home() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
}

impl Config {
    /// `$SKIFF_CONFIG`, else `~/.config/skiff/config.toml`.
    pub fn path() -> Option<PathBuf> {
        std::env::var_os("SKIFF_CONFIG")
            .map(PathBuf::from)
            .or_else(|| home().map(|home| home.join(".config/skiff/config.toml")))
    }

    /// Loads the config file if there is one, then applies `$HISTFILE`.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };

        if let Some(histfile) = std::env::var_os("HISTFILE").filter(|f| !f.is_empty()) {
            config.history_file = Some(histfile.into());
        }

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;

        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_use_defaults() {
        let config: Config = toml::from_str(r#"prompt = "skiff> ""#).unwrap();
        assert_eq!(config.prompt, "skiff> ");
        assert_eq!(config.history_file, None);
        assert_eq!(config.log_filter, Config::default().log_filter);
    }

    #[test]
    fn reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "history_file = \"/tmp/hist\"\nlog_dir = \"/tmp/logs\"\nlog_filter = \"skiff=trace\"\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.prompt, "$ ");
        assert_eq!(config.history_file, Some(PathBuf::from("/tmp/hist")));
        assert_eq!(config.log_dir, PathBuf::from("/tmp/logs"));
        assert_eq!(config.log_filter, "skiff=trace");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "prompt = [").unwrap();

        assert!(matches!(
            Config::from_file(&path),
            Err(ConfigError::Parse { .. })
        ));
        assert!(matches!(
            Config::from_file(&dir.path().join("absent.toml")),
            Err(ConfigError::Read { .. })
        ));
    }
}
