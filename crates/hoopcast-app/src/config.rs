// Configuration loading and parsing (config/hoopcast.toml).

use hoopcast_core::{SourceNames, Windows, DEFAULT_HTTP_TIMEOUT};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Name of the config file inside `config/` and `defaults/`.
pub const CONFIG_FILE: &str = "hoopcast.toml";

/// Log file written under `<base_dir>/logs/`.
pub const LOG_FILE: &str = "hoopcast.log";

/// Where the log file for a run rooted at `base_dir` goes.
pub fn log_path(base_dir: &Path) -> PathBuf {
    base_dir.join("logs").join(LOG_FILE)
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no config at {path} and no defaults to seed it from")]
    Missing { path: PathBuf },

    #[error("{path} is not a valid hoopcast config: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("`{field}` {message}")]
    Invalid { field: String, message: String },

    #[error("could not seed {path} from defaults: {source}")]
    Seed {
        path: PathBuf,
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub sources: SourcesConfig,
    #[serde(default)]
    pub view: ViewConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKindConfig {
    File,
    Http,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourcesConfig {
    pub kind: SourceKindConfig,
    /// Directory (for `file`) or base URL (for `http`).
    pub root: String,
    /// Per-request limit for `http` sources.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(flatten)]
    pub names: SourceNames,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_HTTP_TIMEOUT.as_secs()
}

impl SourcesConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ViewConfig {
    pub short_window: usize,
    pub long_window: usize,
    pub search_limit: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        let windows = Windows::default();
        ViewConfig {
            short_window: windows.short,
            long_window: windows.long,
            search_limit: 10,
        }
    }
}

impl ViewConfig {
    pub fn windows(&self) -> Windows {
        Windows {
            short: self.short_window,
            long: self.long_window,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/hoopcast.toml` under `base_dir`, seeding it from
/// `defaults/` first if it does not exist yet.
pub fn load_config(base_dir: &Path) -> Result<Config, ConfigError> {
    if let Some(seeded) = seed_config(base_dir)? {
        tracing::info!("Created {} from defaults", seeded.display());
    }
    load_config_from(base_dir)
}

/// Load and validate `config/hoopcast.toml` under `base_dir` as it stands.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = std::fs::read_to_string(&path).map_err(|_| ConfigError::Missing {
        path: path.clone(),
    })?;
    let config: Config =
        toml::from_str(&text).map_err(|source| ConfigError::Parse { path, source })?;

    validate(&config)?;
    Ok(config)
}

/// Copy `defaults/hoopcast.toml` to `config/hoopcast.toml` when the latter is
/// absent. Returns the created path, or `None` when nothing was copied.
pub fn seed_config(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = base_dir.join("config").join(CONFIG_FILE);
    let default = base_dir.join("defaults").join(CONFIG_FILE);
    if target.exists() || !default.exists() {
        return Ok(None);
    }

    let seed_err = |source| ConfigError::Seed {
        path: target.clone(),
        source,
    };
    std::fs::create_dir_all(base_dir.join("config")).map_err(seed_err)?;
    std::fs::copy(&default, &target).map_err(seed_err)?;
    Ok(Some(target))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field: field.to_string(),
        message: message.into(),
    }
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    let sources = &config.sources;
    if sources.root.trim().is_empty() {
        return Err(invalid("sources.root", "must not be empty"));
    }
    if sources.timeout_secs == 0 {
        return Err(invalid("sources.timeout_secs", "must be > 0"));
    }

    let names = &sources.names;
    for (field, value) in [
        ("sources.predictions", names.predictions.as_str()),
        ("sources.game_log", names.game_log.as_str()),
        ("sources.averages", names.averages.as_str()),
        ("sources.model_quality", names.model_quality.as_str()),
    ] {
        if value.trim().is_empty() {
            return Err(invalid(field, "must not be empty"));
        }
    }

    let view = &config.view;
    for (field, value) in [
        ("view.short_window", view.short_window),
        ("view.long_window", view.long_window),
        ("view.search_limit", view.search_limit),
    ] {
        if value == 0 {
            return Err(invalid(field, "must be > 0"));
        }
    }

    if view.short_window > view.long_window {
        return Err(invalid(
            "view.short_window",
            format!(
                "must not exceed view.long_window ({} > {})",
                view.short_window, view.long_window
            ),
        ));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
