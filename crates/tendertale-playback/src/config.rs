//! Playback timing, speaker colors and asset locations.

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Environment variable overriding [`PlaybackConfig::typing_speed_ms`].
pub const TYPING_SPEED_VAR: &str = "TENDERTALE_TYPING_SPEED_MS";
/// Environment variable overriding [`PlaybackConfig::settle_delay_ms`].
pub const SETTLE_DELAY_VAR: &str = "TENDERTALE_SETTLE_DELAY_MS";
/// Environment variable overriding [`PlaybackConfig::character_entry_delay_ms`].
pub const ENTRY_DELAY_VAR: &str = "TENDERTALE_ENTRY_DELAY_MS";
/// Environment variable overriding [`PlaybackConfig::transition_timeout_ms`].
pub const TRANSITION_TIMEOUT_VAR: &str = "TENDERTALE_TRANSITION_TIMEOUT_MS";
/// Environment variable overriding [`PlaybackConfig::asset_prefix`].
pub const ASSET_PREFIX_VAR: &str = "TENDERTALE_ASSET_PREFIX";

/// Invalid playback configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable holds a value that does not parse.
    #[error("{var} must be a whole number of milliseconds, got '{value}'")]
    InvalidMillis {
        /// Variable name.
        var: &'static str,
        /// Offending value.
        value: String,
    },
}

/// Tunables for scene playback.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Interval between typed characters.
    pub typing_speed_ms: u64,
    /// Pause after each stage command so the change is perceivable.
    pub settle_delay_ms: u64,
    /// Pause between placing the opening characters and revealing them, so
    /// the host lays them out off-screen before their entry transition.
    pub character_entry_delay_ms: u64,
    /// Longest wait for a fade to report completion before playback moves on.
    pub transition_timeout_ms: u64,
    /// Prefix joined to sprite and background asset names.
    pub asset_prefix: String,
    /// Speaker name → label color.
    pub speaker_colors: HashMap<String, String>,
    /// Label color for speakers without an entry in `speaker_colors`.
    pub default_speaker_color: String,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            typing_speed_ms: 25,
            settle_delay_ms: 200,
            character_entry_delay_ms: 100,
            transition_timeout_ms: 2000,
            asset_prefix: "assets/".to_owned(),
            speaker_colors: HashMap::from([("Алиса".to_owned(), "#FFD700".to_owned())]),
            default_speaker_color: "#fff".to_owned(),
        }
    }
}

impl PlaybackConfig {
    /// Builds a config from defaults overridden by `TENDERTALE_*` environment
    /// variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidMillis` if a timing variable is set but is
    /// not a whole number.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds a config from defaults overridden by values from `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidMillis` if a timing value does not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let millis = |var: &'static str, slot: &mut u64| -> Result<(), ConfigError> {
            if let Some(value) = lookup(var) {
                *slot = value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidMillis { var, value })?;
            }
            Ok(())
        };
        millis(TYPING_SPEED_VAR, &mut config.typing_speed_ms)?;
        millis(SETTLE_DELAY_VAR, &mut config.settle_delay_ms)?;
        millis(ENTRY_DELAY_VAR, &mut config.character_entry_delay_ms)?;
        millis(TRANSITION_TIMEOUT_VAR, &mut config.transition_timeout_ms)?;
        if let Some(prefix) = lookup(ASSET_PREFIX_VAR) {
            config.asset_prefix = prefix;
        }
        Ok(config)
    }

    /// Interval between typed characters.
    #[must_use]
    pub fn typing_speed(&self) -> Duration {
        Duration::from_millis(self.typing_speed_ms)
    }

    /// Pause after each stage command.
    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Pause before opening characters are revealed.
    #[must_use]
    pub fn character_entry_delay(&self) -> Duration {
        Duration::from_millis(self.character_entry_delay_ms)
    }

    /// Longest wait for a fade completion signal.
    #[must_use]
    pub fn transition_timeout(&self) -> Duration {
        Duration::from_millis(self.transition_timeout_ms)
    }

    /// Resolves an asset name to the path handed to the render surface.
    #[must_use]
    pub fn asset_path(&self, name: &str) -> String {
        format!("{}{name}", self.asset_prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_lookup_overrides_defaults() {
        // Arrange
        let vars = HashMap::from([
            (TYPING_SPEED_VAR, "40"),
            (ASSET_PREFIX_VAR, "/static/"),
        ]);

        // Act
        let config = PlaybackConfig::from_lookup(|var| vars.get(var).map(|v| (*v).to_owned()))
            .unwrap();

        // Assert
        assert_eq!(config.typing_speed(), Duration::from_millis(40));
        assert_eq!(config.settle_delay(), Duration::from_millis(200));
        assert_eq!(config.asset_path("alice.png"), "/static/alice.png");
    }

    #[test]
    fn test_from_lookup_rejects_non_numeric_millis() {
        let result = PlaybackConfig::from_lookup(|var| {
            (var == SETTLE_DELAY_VAR).then(|| "soon".to_owned())
        });

        match result {
            Err(ConfigError::InvalidMillis { var, value }) => {
                assert_eq!(var, SETTLE_DELAY_VAR);
                assert_eq!(value, "soon");
            }
            other => panic!("expected InvalidMillis, got {other:?}"),
        }
    }

    #[test]
    fn test_config_deserializes_partial_json() {
        let config: PlaybackConfig =
            serde_json::from_value(serde_json::json!({ "typing_speed_ms": 5 })).unwrap();

        assert_eq!(config.typing_speed_ms, 5);
        assert_eq!(config.default_speaker_color, "#fff");
    }
}
