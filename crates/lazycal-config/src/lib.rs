use serde::Deserialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Block kind pulled when neither the command line nor the config names one.
pub const DEFAULT_KIND: &str = "VCALENDAR";

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

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Top-level block kind to list, e.g. `VCALENDAR` or `VCARD`.
    ///
    /// Kinds nested inside another block, such as `VEVENT`, stop at the
    /// enclosing block's `END` line.
    #[serde(default = "default_kind")]
    pub default_kind: String,
    /// File to read when no path is given on the command line.
    #[serde(default)]
    pub input_path: Option<PathBuf>,
}

fn default_kind() -> String {
    DEFAULT_KIND.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_kind: default_kind(),
            input_path: None,
        }
    }
}

impl Config {
    /// Reads the config at `config_path`, or `None` if there is no file there.
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        let content = match std::fs::read_to_string(config_path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::ConfigReadError {
                    config_path: config_path.to_path_buf(),
                    source,
                });
            }
        };

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        config.input_path = config
            .input_path
            .map(|path| Self::expand_path(&path).unwrap_or(path));

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/lazycal");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Expands `~` and `$VAR`; `None` if a variable is unset.
    fn expand_path(path: &Path) -> Option<PathBuf> {
        shellexpand::full(&path.to_string_lossy())
            .ok()
            .map(|expanded| PathBuf::from(expanded.as_ref()))
    }
}
