//! Session configuration
//!
//! The page scripts this replaces differed in small ways (cookie fallback,
//! eager vs. deferred redirect, automatic guard on init). Those differences
//! are modelled as fields here instead of separate code paths.

use config::ConfigError;
use serde::{Deserialize, Serialize};
use url::Url;

/// Storage keys shared by both storage tiers
pub struct StorageKeys;

impl StorageKeys {
    /// Primary token key
    pub const AUTH_TOKEN: &'static str = "authToken";

    /// Legacy alias, always written together with [`Self::AUTH_TOKEN`]
    pub const JWT_TOKEN: &'static str = "jwtToken";

    /// Cached profile display name
    pub const USER_NAME: &'static str = "userName";

    /// Cached profile email
    pub const USER_EMAIL: &'static str = "userEmail";

    /// Cached profile identifier
    pub const USER_ID: &'static str = "userId";

    /// Both token slots, in read priority order
    pub const TOKEN_KEYS: [&'static str; 2] = [Self::AUTH_TOKEN, Self::JWT_TOKEN];

    /// Profile fields cleared whenever a fresh token is adopted
    pub const PROFILE_KEYS: [&'static str; 3] = [Self::USER_NAME, Self::USER_EMAIL, Self::USER_ID];

    /// Query parameter carrying a token between subdomains
    pub const TOKEN_PARAM: &'static str = "token";

    /// Cookie consulted when cookie fallback is enabled
    pub const TOKEN_COOKIE: &'static str = "authToken";
}

/// Upper bound for the deferred redirect
const MAX_REDIRECT_DELAY_MS: u32 = 10_000;

/// Token session manager configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Read the `authToken` cookie when no storage slot holds a token
    pub cookie_fallback: bool,
    /// Run the route guard automatically once the document is ready
    pub auto_guard_on_init: bool,
    /// Re-attach the stored token to a reloaded protected page's URL
    pub reattach_on_reload: bool,
    /// Delay before the route guard re-checks and redirects
    pub redirect_delay_ms: u32,
    /// Hostname that selects the local auth service
    pub local_hostname: String,
    /// Auth service origin used during local development
    pub local_auth_origin: String,
    /// Auth service origin used everywhere else
    pub deployed_auth_origin: String,
    /// Login page path on the auth service
    pub login_path: String,
    /// Profile validation endpoint path on the auth service
    pub validate_path: String,
    /// Path substrings that require a valid token
    pub protected_paths: Vec<String>,
    /// Log level for the browser console subscriber
    pub log_level: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_fallback: false,
            auto_guard_on_init: false,
            reattach_on_reload: false,
            redirect_delay_ms: 50,
            local_hostname: "localhost".to_string(),
            local_auth_origin: "http://localhost:8083".to_string(),
            deployed_auth_origin: "https://job-application-service-production.up.railway.app"
                .to_string(),
            login_path: "/login".to_string(),
            validate_path: "/api/auth/validate".to_string(),
            protected_paths: [
                "/dashboard",
                "/browse-jobs",
                "/my-applications",
                "/profile",
                "/job-details",
                "/create-job",
                "/job-listings",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            log_level: "info".to_string(),
        }
    }
}

impl SessionConfig {
    /// Load a configuration from a JSON document layered over the defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(json, config::FileFormat::Json))
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        validators::validate_origin(&self.local_auth_origin, "local_auth_origin")?;
        validators::validate_origin(&self.deployed_auth_origin, "deployed_auth_origin")?;
        validators::validate_path(&self.login_path, "login_path")?;
        validators::validate_path(&self.validate_path, "validate_path")?;
        validators::validate_not_empty(&self.local_hostname, "local_hostname")?;

        if self.protected_paths.is_empty() {
            return Err(ConfigError::Message(
                "protected_paths must contain at least one entry".to_string(),
            ));
        }
        for path in &self.protected_paths {
            validators::validate_not_empty(path, "protected_paths")?;
        }

        if self.redirect_delay_ms > MAX_REDIRECT_DELAY_MS {
            return Err(ConfigError::Message(format!(
                "redirect_delay_ms must be at most {MAX_REDIRECT_DELAY_MS}, got {}",
                self.redirect_delay_ms
            )));
        }

        Ok(())
    }

    /// Auth service origin for the given page hostname
    pub fn auth_origin(&self, hostname: &str) -> &str {
        if hostname == self.local_hostname {
            &self.local_auth_origin
        } else {
            &self.deployed_auth_origin
        }
    }

    /// Login page URL for the given page hostname
    pub fn login_url(&self, hostname: &str) -> String {
        join_origin(self.auth_origin(hostname), &self.login_path)
    }

    /// Profile validation endpoint for the given page hostname
    pub fn validate_url(&self, hostname: &str) -> String {
        join_origin(self.auth_origin(hostname), &self.validate_path)
    }
}

fn join_origin(origin: &str, path: &str) -> String {
    format!("{}{}", origin.trim_end_matches('/'), path)
}

/// Common validation helpers
pub mod validators {
    use super::*;

    /// Validate that a value is an absolute http(s) origin
    pub fn validate_origin(value: &str, field: &str) -> Result<(), ConfigError> {
        let url = Url::parse(value)
            .map_err(|e| ConfigError::Message(format!("{field} is not a valid URL: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(ConfigError::Message(format!(
                "{field} must be an absolute http(s) URL, got '{value}'"
            )));
        }
        Ok(())
    }

    /// Validate that a path is absolute
    pub fn validate_path(value: &str, field: &str) -> Result<(), ConfigError> {
        if !value.starts_with('/') {
            return Err(ConfigError::Message(format!(
                "{field} must start with '/', got '{value}'"
            )));
        }
        Ok(())
    }

    /// Validate that a string is not empty
    pub fn validate_not_empty(value: &str, field: &str) -> Result<(), ConfigError> {
        if value.trim().is_empty() {
            return Err(ConfigError::Message(format!("{field} cannot be empty")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SessionConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.auto_guard_on_init);
        assert!(!config.reattach_on_reload);
        assert_eq!(config.redirect_delay_ms, 50);
    }

    #[test]
    fn test_login_url_depends_on_host() {
        let config = SessionConfig::default();
        assert_eq!(config.login_url("localhost"), "http://localhost:8083/login");
        assert_eq!(
            config.login_url("jobs.example.com"),
            "https://job-application-service-production.up.railway.app/login"
        );
        assert_eq!(
            config.validate_url("localhost"),
            "http://localhost:8083/api/auth/validate"
        );
    }

    #[test]
    fn test_from_json_overrides_defaults() {
        let config = SessionConfig::from_json(
            r#"{ "cookie_fallback": true, "reattach_on_reload": true, "redirect_delay_ms": 120, "local_auth_origin": "http://localhost:9000/" }"#,
        )
        .unwrap();

        assert!(config.cookie_fallback);
        assert!(config.reattach_on_reload);
        assert_eq!(config.redirect_delay_ms, 120);
        assert_eq!(config.login_url("localhost"), "http://localhost:9000/login");
        assert_eq!(config.login_path, "/login");
        assert_eq!(config.protected_paths.len(), 7);
    }

    #[test]
    fn test_from_json_rejects_invalid_values() {
        assert!(SessionConfig::from_json(r#"{ "redirect_delay_ms": 60000 }"#).is_err());
        assert!(SessionConfig::from_json(r#"{ "login_path": "login" }"#).is_err());
        assert!(SessionConfig::from_json(r#"{ "deployed_auth_origin": "not a url" }"#).is_err());
        assert!(SessionConfig::from_json("not json").is_err());
    }

    #[test]
    fn test_empty_allow_list_is_rejected() {
        let config = SessionConfig {
            protected_paths: Vec::new(),
            ..SessionConfig::default()
        };
        assert!(config.validate().is_err());

        let config = SessionConfig {
            protected_paths: vec![" ".to_string()],
            ..SessionConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
