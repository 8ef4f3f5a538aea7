//! Server configuration

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:5173,http://127.0.0.1:5173";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{0} has an invalid value")]
    Invalid(&'static str),
}

#[derive(Clone)]
pub struct Config {
    pub bind_address: String,
    pub jwt_secret: String,
    /// Expected `aud` claim; not checked when unset
    pub jwt_audience: Option<String>,
    pub allowed_origins: Vec<String>,
    /// Billing routes answer with a configuration error when disabled
    pub enable_billing: bool,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("bind_address", &self.bind_address)
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_audience", &self.jwt_audience)
            .field("allowed_origins", &self.allowed_origins)
            .field("enable_billing", &self.enable_billing)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let jwt_secret = non_empty("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let bind_address =
            non_empty("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let allowed_origins = non_empty("ALLOWED_ORIGINS")
            .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let enable_billing = match non_empty("ENABLE_BILLING") {
            Some(raw) => raw
                .trim()
                .parse::<bool>()
                .map_err(|_| ConfigError::Invalid("ENABLE_BILLING"))?,
            None => true,
        };

        Ok(Self {
            bind_address,
            jwt_secret,
            jwt_audience: non_empty("JWT_AUDIENCE"),
            allowed_origins,
            enable_billing,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[("JWT_SECRET", "secret")])).unwrap();
        assert_eq!(config.bind_address, DEFAULT_BIND_ADDRESS);
        assert_eq!(
            config.allowed_origins,
            vec!["http://localhost:5173", "http://127.0.0.1:5173"]
        );
        assert!(config.enable_billing);
        assert!(config.jwt_audience.is_none());
    }

    #[test]
    fn test_missing_jwt_secret() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("JWT_SECRET")));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("JWT_SECRET", "secret"),
            ("BIND_ADDRESS", "127.0.0.1:3000"),
            ("ALLOWED_ORIGINS", "https://app.example.com, ,https://www.example.com"),
            ("ENABLE_BILLING", "false"),
            ("JWT_AUDIENCE", "substatus-web"),
        ]))
        .unwrap();
        assert_eq!(config.bind_address, "127.0.0.1:3000");
        assert_eq!(
            config.allowed_origins,
            vec!["https://app.example.com", "https://www.example.com"]
        );
        assert!(!config.enable_billing);
        assert_eq!(config.jwt_audience.as_deref(), Some("substatus-web"));
    }

    #[test]
    fn test_invalid_enable_billing() {
        let err = Config::from_lookup(lookup_from(&[
            ("JWT_SECRET", "secret"),
            ("ENABLE_BILLING", "maybe"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("ENABLE_BILLING")));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = Config::from_lookup(lookup_from(&[("JWT_SECRET", "hunter2")])).unwrap();
        assert!(!format!("{:?}", config).contains("hunter2"));
    }
}
