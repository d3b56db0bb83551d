use std::time::Duration;

use reqwest::Url;

use crate::error::ConfigError;

pub const DEFAULT_API_BASE: &str = "http://localhost:3000";

/// Client configuration loaded from environment variables.
///
/// | Env Var                    | Default                 |
/// |----------------------------|-------------------------|
/// | `WORKOUT_API_BASE`         | `http://localhost:3000` |
/// | `WORKOUT_SESSION_COOKIE`   | unset                   |
/// | `WORKOUT_API_TIMEOUT_SECS` | unset (client default)  |
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// Cookie header carrying a session established by the login surface.
    pub session_cookie: Option<String>,
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            session_cookie: None,
            timeout: None,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup so parsing can be tested
    /// without touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("WORKOUT_API_BASE")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let base_url = validate_base_url(&base_url)?;

        let session_cookie = lookup("WORKOUT_SESSION_COOKIE").filter(|v| !v.trim().is_empty());

        let timeout = match lookup("WORKOUT_API_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::Timeout(raw.clone()))?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            base_url,
            session_cookie,
            timeout,
        })
    }
}

/// Base URL must be http(s) with a host. A trailing slash is dropped so paths
/// can be appended directly.
fn validate_base_url(base: &str) -> Result<String, ConfigError> {
    let parsed = Url::parse(base).map_err(|e| ConfigError::BaseUrl {
        value: base.to_string(),
        reason: e.to_string(),
    })?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ConfigError::BaseUrl {
            value: base.to_string(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }
    if parsed.host_str().is_none() {
        return Err(ConfigError::BaseUrl {
            value: base.to_string(),
            reason: "missing host".to_string(),
        });
    }

    Ok(base.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.base_url, DEFAULT_API_BASE);
        assert!(config.session_cookie.is_none());
        assert!(config.timeout.is_none());
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let config = ClientConfig::from_lookup(lookup(&[("WORKOUT_API_BASE", "https://gym.example.com/")])).unwrap();
        assert_eq!(config.base_url, "https://gym.example.com");
    }

    #[test]
    fn rejects_non_http_scheme() {
        let err = ClientConfig::from_lookup(lookup(&[("WORKOUT_API_BASE", "ftp://gym.example.com")])).unwrap_err();
        assert!(matches!(err, ConfigError::BaseUrl { .. }));
    }

    #[test]
    fn parses_timeout_and_cookie() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("WORKOUT_API_TIMEOUT_SECS", "15"),
            ("WORKOUT_SESSION_COOKIE", "connect.sid=abc"),
        ]))
        .unwrap();
        assert_eq!(config.timeout, Some(Duration::from_secs(15)));
        assert_eq!(config.session_cookie.as_deref(), Some("connect.sid=abc"));
    }

    #[test]
    fn bad_timeout_is_an_error() {
        let err = ClientConfig::from_lookup(lookup(&[("WORKOUT_API_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert!(matches!(err, ConfigError::Timeout(_)));
    }
}
