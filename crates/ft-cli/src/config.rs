//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use ft_core::PresenceConfig;

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file.
    pub database_path: PathBuf,

    /// Continuous absence (ms) before the user counts as away.
    pub away_threshold_ms: u64,

    /// Continuous presence (ms) before an away user counts as returned.
    pub return_threshold_ms: u64,

    /// Seconds between periodic persistence flushes while tracking.
    pub flush_interval_secs: u64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_path", &self.database_path)
            .field("away_threshold_ms", &self.away_threshold_ms)
            .field("return_threshold_ms", &self.return_threshold_ms)
            .field("flush_interval_secs", &self.flush_interval_secs)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        let presence = PresenceConfig::default();
        Self {
            database_path: data_dir.join("ft.db"),
            away_threshold_ms: presence.away_threshold_ms,
            return_threshold_ms: presence.return_threshold_ms,
            flush_interval_secs: 300,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (FT_*)
        figment = figment.merge(Env::prefixed("FT_"));

        figment.extract()
    }

    /// The presence classifier thresholds from this config.
    #[must_use]
    pub const fn presence(&self) -> PresenceConfig {
        PresenceConfig {
            away_threshold_ms: self.away_threshold_ms,
            return_threshold_ms: self.return_threshold_ms,
        }
    }
}

/// Returns the platform-specific config directory for ft.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("ft"))
}

/// Returns the platform-specific data directory for ft.
///
/// On Linux: `~/.local/share/ft`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("ft"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirs_data_path_returns_some() {
        assert!(dirs_data_path().is_some());
    }

    #[test]
    fn test_default_config_uses_data_dir_for_db() {
        let config = Config::default();
        let data_dir = dirs_data_path().unwrap();
        assert_eq!(config.database_path, data_dir.join("ft.db"));
    }

    #[test]
    fn test_default_thresholds_match_presence_defaults() {
        let config = Config::default();
        assert_eq!(config.presence(), PresenceConfig::default());
    }
}
