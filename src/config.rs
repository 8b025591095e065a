//! Application-level configuration loading: draft defaults, snapshot
//! window sizes, and the commissioner token.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "DRAFTROOM_BACK_CONFIG_PATH";
/// Environment variable that overrides the configured commissioner token.
const COMMISSIONER_TOKEN_ENV: &str = "COMMISSIONER_TOKEN";

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// Pick clock applied when a draft is created without one.
    pub default_clock_seconds: u32,
    /// Round count applied when a draft is created without one.
    pub default_rounds: u32,
    /// How many recent picks a snapshot carries.
    pub recent_picks_window: usize,
    /// How many upcoming slots a snapshot carries.
    pub upcoming_window: usize,
    /// Token required on commissioner routes; `None` disables them.
    pub commissioner_token: Option<String>,
    /// JSON file serving as the bundled default directory.
    pub directory_file: PathBuf,
    /// Seconds between default-pool refresh attempts.
    pub directory_refresh_secs: u64,
}

impl AppConfig {
    /// Load the configuration from disk, falling back to built-in
    /// defaults when the file is missing or malformed. The commissioner
    /// token can always be overridden from the environment.
    pub fn load() -> Self {
        let path = resolve_config_path();
        let mut config = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let config: Self = raw.into();
                    info!(path = %path.display(), "loaded configuration");
                    config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        };

        if let Ok(token) = env::var(COMMISSIONER_TOKEN_ENV) {
            if !token.is_empty() {
                config.commissioner_token = Some(token);
            }
        }

        config
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_clock_seconds: 90,
            default_rounds: 16,
            recent_picks_window: 10,
            upcoming_window: 10,
            commissioner_token: None,
            directory_file: PathBuf::from("config/players.json"),
            directory_refresh_secs: 300,
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file.
struct RawConfig {
    #[serde(default)]
    default_clock_seconds: Option<u32>,
    #[serde(default)]
    default_rounds: Option<u32>,
    #[serde(default)]
    recent_picks_window: Option<usize>,
    #[serde(default)]
    upcoming_window: Option<usize>,
    #[serde(default)]
    commissioner_token: Option<String>,
    #[serde(default)]
    directory_file: Option<PathBuf>,
    #[serde(default)]
    directory_refresh_secs: Option<u64>,
}

impl From<RawConfig> for AppConfig {
    fn from(raw: RawConfig) -> Self {
        let defaults = AppConfig::default();
        Self {
            default_clock_seconds: raw
                .default_clock_seconds
                .unwrap_or(defaults.default_clock_seconds),
            default_rounds: raw.default_rounds.unwrap_or(defaults.default_rounds),
            recent_picks_window: raw
                .recent_picks_window
                .unwrap_or(defaults.recent_picks_window),
            upcoming_window: raw.upcoming_window.unwrap_or(defaults.upcoming_window),
            commissioner_token: raw.commissioner_token.filter(|token| !token.is_empty()),
            directory_file: raw.directory_file.unwrap_or(defaults.directory_file),
            directory_refresh_secs: raw
                .directory_refresh_secs
                .unwrap_or(defaults.directory_refresh_secs),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_raw_config_keeps_defaults_elsewhere() {
        let raw: RawConfig =
            serde_json::from_str(r#"{"default_clock_seconds": 45, "commissioner_token": ""}"#)
                .unwrap();
        let config: AppConfig = raw.into();
        assert_eq!(config.default_clock_seconds, 45);
        assert_eq!(config.default_rounds, AppConfig::default().default_rounds);
        // Empty tokens are treated as unset.
        assert!(config.commissioner_token.is_none());
    }
}
