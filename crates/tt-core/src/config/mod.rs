//! Configuration loading and validation for tt-core.
//!
//! This module handles:
//! - Loading `triage.toml`
//! - Config resolution order (CLI > env > XDG > defaults)
//! - Semantic validation of the loaded values

pub mod validation;

pub use validation::{validate_config, ValidationError, MAX_TICKET_COUNT};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::dashboard::DEFAULT_DRILLDOWN_ROWS;
use crate::mock::{AI_ACTOR, DEFAULT_TICKET_COUNT};

/// Default XDG config directory name.
const CONFIG_DIR_NAME: &str = "ticket_triage";

/// Config file looked up inside the config directory.
pub const CONFIG_FILE_NAME: &str = "triage.toml";

/// Environment variable naming the config directory.
pub const CONFIG_ENV_VAR: &str = "TICKET_TRIAGE_CONFIG";

/// Errors that can occur during config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Invalid TOML in config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Semantic validation failed: {0}")]
    ValidationError(#[from] ValidationError),

    #[error("I/O error reading {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<ConfigError> for tt_common::Error {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NotFound { .. } => tt_common::Error::Config(err.to_string()),
            ConfigError::IoError { source, .. } => tt_common::Error::Io(source),
            ConfigError::ParseError { .. } | ConfigError::ValidationError(_) => {
                tt_common::Error::InvalidConfig(err.to_string())
            }
        }
    }
}

/// Session settings from `triage.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TriageConfig {
    /// Number of mock tickets to generate.
    pub ticket_count: usize,
    /// RNG seed; absent means a fresh dataset each run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Label stamped on changes applied through the CLI.
    pub actor: String,
    /// Rows shown in the drilldown table.
    pub drilldown_rows: usize,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            ticket_count: DEFAULT_TICKET_COUNT,
            seed: None,
            actor: AI_ACTOR.to_string(),
            drilldown_rows: DEFAULT_DRILLDOWN_ROWS,
        }
    }
}

/// Resolved configuration with provenance information.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedConfig {
    pub config: TriageConfig,
    /// File the values came from (None if using defaults).
    pub config_path: Option<PathBuf>,
    /// The config directory used for resolution.
    pub config_dir: PathBuf,
}

/// Configuration resolution options.
#[derive(Debug, Default)]
pub struct ConfigOptions {
    /// Explicit config directory (highest priority).
    pub config_dir: Option<PathBuf>,
    /// Explicit config file path.
    pub config_path: Option<PathBuf>,
}

/// Load configuration with the standard resolution order.
///
/// Resolution order (highest to lowest priority):
/// 1. Explicit CLI flags (via ConfigOptions)
/// 2. Environment variable (TICKET_TRIAGE_CONFIG)
/// 3. XDG config home (~/.config/ticket_triage/)
/// 4. Built-in defaults
///
/// An explicit `config_path` must exist; a missing file in the config
/// directory falls back to defaults.
pub fn load_config(options: &ConfigOptions) -> Result<ResolvedConfig, ConfigError> {
    let config_dir = resolve_config_dir(options);

    let (config, config_path) = match &options.config_path {
        Some(path) => {
            if !path.exists() {
                return Err(ConfigError::NotFound { path: path.clone() });
            }
            (load_config_from_file(path)?, Some(path.clone()))
        }
        None => {
            let default_path = config_dir.join(CONFIG_FILE_NAME);
            if default_path.exists() {
                (load_config_from_file(&default_path)?, Some(default_path))
            } else {
                (TriageConfig::default(), None)
            }
        }
    };

    validate_config(&config)?;

    Ok(ResolvedConfig {
        config,
        config_path,
        config_dir,
    })
}

/// Resolve the config directory using the standard resolution order.
fn resolve_config_dir(options: &ConfigOptions) -> PathBuf {
    if let Some(dir) = &options.config_dir {
        return dir.clone();
    }

    if let Ok(dir) = std::env::var(CONFIG_ENV_VAR) {
        return PathBuf::from(dir);
    }

    let xdg_config = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .ok()
        .or_else(dirs::config_dir)
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config")
        });

    xdg_config.join(CONFIG_DIR_NAME)
}

/// Load and parse a config file without semantic validation.
pub fn load_config_from_file(path: &Path) -> Result<TriageConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&content).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn options_for(dir: &TempDir) -> ConfigOptions {
        ConfigOptions {
            config_dir: Some(dir.path().to_path_buf()),
            config_path: None,
        }
    }

    #[test]
    fn test_defaults_when_no_file() {
        let dir = TempDir::new().unwrap();
        let resolved = load_config(&options_for(&dir)).unwrap();

        assert_eq!(resolved.config, TriageConfig::default());
        assert_eq!(resolved.config.ticket_count, 20);
        assert_eq!(resolved.config.actor, "AI Triage System");
        assert_eq!(resolved.config.drilldown_rows, 10);
        assert!(resolved.config_path.is_none());
        assert_eq!(resolved.config_dir, dir.path());
    }

    #[test]
    fn test_loads_file_from_config_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "ticket_count = 50\nseed = 9\nactor = \"Night Shift\"\n",
        )
        .unwrap();

        let resolved = load_config(&options_for(&dir)).unwrap();

        assert_eq!(resolved.config.ticket_count, 50);
        assert_eq!(resolved.config.seed, Some(9));
        assert_eq!(resolved.config.actor, "Night Shift");
        assert_eq!(resolved.config.drilldown_rows, 10);
        assert_eq!(resolved.config_path, Some(dir.path().join(CONFIG_FILE_NAME)));
    }

    #[test]
    fn test_parse_error_names_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "ticket_count = \"many\"").unwrap();

        let err = load_config(&options_for(&dir)).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.to_string().contains(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "tickets = 5").unwrap();

        let err = load_config(&options_for(&dir)).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn test_validation_runs_after_load() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "drilldown_rows = 0").unwrap();

        let err = load_config(&options_for(&dir)).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let dir = TempDir::new().unwrap();
        let options = ConfigOptions {
            config_dir: Some(dir.path().to_path_buf()),
            config_path: Some(dir.path().join("missing.toml")),
        };

        let err = load_config(&options).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn test_config_error_converts_by_kind() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "drilldown_rows = 0").unwrap();
        let invalid = tt_common::Error::from(load_config(&options_for(&dir)).unwrap_err());
        assert!(matches!(invalid, tt_common::Error::InvalidConfig(_)));
        assert_eq!(invalid.category(), tt_common::ErrorCategory::Config);

        let missing = tt_common::Error::from(ConfigError::NotFound {
            path: dir.path().join("missing.toml"),
        });
        assert!(matches!(missing, tt_common::Error::Config(_)));
        assert!(missing.to_string().contains("missing.toml"));

        let io = tt_common::Error::from(ConfigError::IoError {
            path: dir.path().to_path_buf(),
            source: std::io::Error::other("denied"),
        });
        assert_eq!(io.category(), tt_common::ErrorCategory::Io);
    }

    #[test]
    fn test_resolved_config_serializes() {
        let dir = TempDir::new().unwrap();
        let resolved = load_config(&options_for(&dir)).unwrap();
        let json = serde_json::to_value(&resolved).unwrap();
        assert_eq!(json["config"]["ticket_count"], 20);
        assert!(json["config"].get("seed").is_none());
    }
}
