//! Player configuration.

use std::time::Duration;

use reqwest::Url;
use tendertale_playback::application::game::DEFAULT_START_SCENE;
use tendertale_playback::config::{ConfigError, PlaybackConfig};
use thiserror::Error;

const DEFAULT_API_URL: &str = "http://localhost:8080";
const DEFAULT_USER_ID: &str = "player";
const DEFAULT_FADE_MS: u64 = 300;

/// Errors that stop the player from starting.
#[derive(Debug, Error)]
pub enum PlayerError {
    /// A configuration value is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The playback tunables are invalid.
    #[error(transparent)]
    Playback(#[from] ConfigError),

    /// Reading player input failed.
    #[error("input error: {0}")]
    Input(#[from] std::io::Error),
}

/// Runtime configuration of the terminal player.
#[derive(Debug, Clone)]
pub struct PlayerConfig {
    /// Root URL of the story backend.
    pub api_url: Url,
    /// Identity saves are stored under.
    pub user_id: String,
    /// Scene new games start at.
    pub start_scene: String,
    /// How long a terminal fade takes to report completion.
    pub fade_duration: Duration,
    /// Playback tunables.
    pub playback: PlaybackConfig,
}

impl PlayerConfig {
    /// Loads configuration from `TENDERTALE_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns `PlayerError` if a variable holds an invalid value.
    pub fn from_env() -> Result<Self, PlayerError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Loads configuration from values provided by `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `PlayerError` if a value is invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, PlayerError> {
        let raw_url = lookup("TENDERTALE_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_owned());
        let api_url = Url::parse(&raw_url)
            .map_err(|e| PlayerError::Config(format!("TENDERTALE_API_URL '{raw_url}': {e}")))?;

        let fade_duration = match lookup("TENDERTALE_FADE_MS") {
            Some(value) => value.trim().parse().map(Duration::from_millis).map_err(|_| {
                PlayerError::Config(format!("TENDERTALE_FADE_MS must be a number, got '{value}'"))
            })?,
            None => Duration::from_millis(DEFAULT_FADE_MS),
        };

        Ok(Self {
            api_url,
            user_id: lookup("TENDERTALE_USER_ID").unwrap_or_else(|| DEFAULT_USER_ID.to_owned()),
            start_scene: lookup("TENDERTALE_START_SCENE")
                .unwrap_or_else(|| DEFAULT_START_SCENE.to_owned()),
            fade_duration,
            playback: PlaybackConfig::from_lookup(&lookup)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = PlayerConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.api_url.as_str(), "http://localhost:8080/");
        assert_eq!(config.user_id, "player");
        assert_eq!(config.start_scene, DEFAULT_START_SCENE);
        assert_eq!(config.fade_duration, Duration::from_millis(300));
        assert_eq!(config.playback, PlaybackConfig::default());
    }

    #[test]
    fn test_environment_overrides_defaults() {
        let config = PlayerConfig::from_lookup(lookup(&[
            ("TENDERTALE_API_URL", "https://story.example.com"),
            ("TENDERTALE_USER_ID", "alice"),
            ("TENDERTALE_START_SCENE", "prologue"),
            ("TENDERTALE_FADE_MS", "0"),
            ("TENDERTALE_TYPING_SPEED_MS", "5"),
        ]))
        .unwrap();

        assert_eq!(config.api_url.host_str(), Some("story.example.com"));
        assert_eq!(config.user_id, "alice");
        assert_eq!(config.start_scene, "prologue");
        assert_eq!(config.fade_duration, Duration::ZERO);
        assert_eq!(config.playback.typing_speed_ms, 5);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let bad_url = PlayerConfig::from_lookup(lookup(&[("TENDERTALE_API_URL", "not a url")]));
        let bad_fade = PlayerConfig::from_lookup(lookup(&[("TENDERTALE_FADE_MS", "slow")]));
        let bad_typing =
            PlayerConfig::from_lookup(lookup(&[("TENDERTALE_TYPING_SPEED_MS", "fast")]));

        assert!(matches!(bad_url, Err(PlayerError::Config(_))));
        assert!(matches!(bad_fade, Err(PlayerError::Config(_))));
        assert!(matches!(bad_typing, Err(PlayerError::Playback(_))));
    }
}
