//! Server configuration read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::AppError;

/// Origins allowed by CORS in addition to `FRONTEND_URL`. Entries may use a
/// leading `*.` host wildcard.
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 4] = [
    "http://localhost:5173",
    "http://192.168.10.8:5173",
    "https://*.vercel.app",
    "https://*.railway.app",
];

/// Runtime configuration of the API server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Directory holding `<scene_id>.json` files.
    pub scenes_dir: PathBuf,
    /// Directory holding `<user_id>.json` save files.
    pub saves_dir: PathBuf,
    /// Extra origin allowed by CORS, typically the deployed frontend.
    pub frontend_url: Option<String>,
}

impl ServerConfig {
    /// Reads `HOST`, `PORT`, `SCENES_DIR`, `SAVES_DIR` and `FRONTEND_URL`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `PORT` is not a valid port number.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds the config from values supplied by `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `PORT` is not a valid port number.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?,
            None => 8080,
        };
        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_owned()),
            port,
            scenes_dir: lookup("SCENES_DIR").map_or_else(|| PathBuf::from("scenes"), PathBuf::from),
            saves_dir: lookup("SAVES_DIR").map_or_else(|| PathBuf::from("saves"), PathBuf::from),
            frontend_url: lookup("FRONTEND_URL").filter(|url| !url.is_empty()),
        })
    }

    /// Socket address to listen on.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `HOST:PORT` is not a socket address.
    pub fn listen_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }

    /// Every origin pattern CORS accepts.
    #[must_use]
    pub fn allowed_origins(&self) -> Vec<String> {
        DEFAULT_ALLOWED_ORIGINS
            .iter()
            .map(|origin| (*origin).to_owned())
            .chain(self.frontend_url.clone())
            .collect()
    }
}

/// Whether `origin` matches `pattern`, where the pattern may replace the
/// leftmost host label with `*`.
#[must_use]
pub fn origin_matches(pattern: &str, origin: &str) -> bool {
    match pattern.split_once("*.") {
        Some((scheme, domain)) => origin
            .strip_prefix(scheme)
            .and_then(|rest| rest.strip_suffix(domain))
            .and_then(|rest| rest.strip_suffix('.'))
            .is_some_and(|label| !label.is_empty() && !label.contains(['.', '/', ':'])),
        None => pattern == origin,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_defaults_apply_when_environment_is_empty() {
        let config = ServerConfig::from_lookup(|_| None).unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.scenes_dir, PathBuf::from("scenes"));
        assert_eq!(config.saves_dir, PathBuf::from("saves"));
        assert_eq!(config.listen_addr().unwrap().to_string(), "0.0.0.0:8080");
        assert_eq!(config.allowed_origins().len(), DEFAULT_ALLOWED_ORIGINS.len());
    }

    #[test]
    fn test_frontend_url_is_added_to_allowed_origins() {
        let vars = HashMap::from([("FRONTEND_URL", "https://novel.example.com"), ("PORT", "3000")]);

        let config =
            ServerConfig::from_lookup(|var| vars.get(var).map(|v| (*v).to_owned())).unwrap();

        assert_eq!(config.port, 3000);
        assert!(config.allowed_origins().contains(&"https://novel.example.com".to_owned()));
    }

    #[test]
    fn test_invalid_port_is_a_config_error() {
        let result = ServerConfig::from_lookup(|var| (var == "PORT").then(|| "eighty".to_owned()));

        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_origin_matching_supports_subdomain_wildcard() {
        assert!(origin_matches("http://localhost:5173", "http://localhost:5173"));
        assert!(origin_matches("https://*.vercel.app", "https://tendertale.vercel.app"));
        assert!(!origin_matches("https://*.vercel.app", "https://vercel.app"));
        assert!(!origin_matches("https://*.vercel.app", "https://evil.com/x.vercel.app"));
        assert!(!origin_matches("https://*.vercel.app", "http://tendertale.vercel.app"));
    }
}
