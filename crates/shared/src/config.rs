//! Application configuration management.

use serde::Deserialize;

/// Placeholder secret shipped in example configs; treated as unconfigured.
pub const PLACEHOLDER_GATEWAY_SECRET: &str = "placeholder_secret";

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Seeded admin account.
    pub admin: AdminConfig,
    /// Admin session configuration.
    pub session: SessionConfig,
    /// Request rate limiting.
    pub rate_limit: RateLimitConfig,
    /// Payment gateway credentials.
    pub gateway: GatewayConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// The admin account seeded at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    /// Login email.
    #[serde(default = "default_admin_email")]
    pub email: String,
    /// Display name.
    #[serde(default = "default_admin_name")]
    pub name: String,
    /// Initial password, hashed before it is stored.
    #[serde(default = "default_admin_password")]
    pub password: String,
    /// Optional master password accepted for any admin account.
    ///
    /// Disabled unless explicitly configured.
    #[serde(default)]
    pub shared_password: Option<String>,
}

fn default_admin_email() -> String {
    "admin@smartgenedux.com".to_string()
}

fn default_admin_name() -> String {
    "Super Admin".to_string()
}

fn default_admin_password() -> String {
    "change-me-in-production".to_string()
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            email: default_admin_email(),
            name: default_admin_name(),
            password: default_admin_password(),
            shared_password: None,
        }
    }
}

/// Admin session configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Session lifetime in seconds.
    #[serde(default = "default_session_ttl")]
    pub ttl_secs: u64,
}

fn default_session_ttl() -> u64 {
    86_400 // 24 hours
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_session_ttl(),
        }
    }
}

/// Fixed-window rate limit configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Window length in seconds.
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
    /// Requests allowed per client within one window.
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,
}

fn default_window_secs() -> u64 {
    60
}

fn default_max_requests() -> u32 {
    100
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_secs: default_window_secs(),
            max_requests: default_max_requests(),
        }
    }
}

/// Payment gateway configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Public key id handed to the checkout client.
    #[serde(default = "default_key_id")]
    pub key_id: String,
    /// Shared secret used to verify callback signatures.
    #[serde(default)]
    pub key_secret: Option<String>,
    /// Reject every payment when no secret is configured.
    ///
    /// Only non-strict deployments accept unsigned demo payments.
    #[serde(default = "default_strict")]
    pub strict: bool,
}

fn default_key_id() -> String {
    "rzp_test_placeholder".to_string()
}

const fn default_strict() -> bool {
    true
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            key_id: default_key_id(),
            key_secret: None,
            strict: default_strict(),
        }
    }
}

impl GatewayConfig {
    /// Returns the signing secret if a real one is configured.
    #[must_use]
    pub fn configured_secret(&self) -> Option<&str> {
        self.key_secret
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty() && *s != PLACEHOLDER_GATEWAY_SECRET)
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or is invalid.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("SMARTGEN").separator("__"))
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values that deserialize fine but cannot run.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Message` describing the first invalid value.
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.admin.password.is_empty() {
            return Err(config::ConfigError::Message(
                "admin.password must not be empty".to_string(),
            ));
        }
        if self.session.ttl_secs == 0 {
            return Err(config::ConfigError::Message(
                "session.ttl_secs must be positive".to_string(),
            ));
        }
        if self.rate_limit.window_secs == 0 || self.rate_limit.max_requests == 0 {
            return Err(config::ConfigError::Message(
                "rate_limit.window_secs and rate_limit.max_requests must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.session.ttl_secs, 86_400);
        assert_eq!(config.rate_limit.window_secs, 60);
        assert_eq!(config.rate_limit.max_requests, 100);
        assert!(config.gateway.strict);
        assert!(config.admin.shared_password.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_configured_secret_ignores_placeholder() {
        let mut gateway = GatewayConfig::default();
        assert_eq!(gateway.configured_secret(), None);

        gateway.key_secret = Some(PLACEHOLDER_GATEWAY_SECRET.to_string());
        assert_eq!(gateway.configured_secret(), None);

        gateway.key_secret = Some("   ".to_string());
        assert_eq!(gateway.configured_secret(), None);

        gateway.key_secret = Some("live_secret".to_string());
        assert_eq!(gateway.configured_secret(), Some("live_secret"));
    }

    #[test]
    fn test_load_from_env() {
        temp_env::with_vars(
            [
                ("SMARTGEN__SERVER__PORT", Some("8081")),
                ("SMARTGEN__GATEWAY__KEY_SECRET", Some("s3cret")),
                ("SMARTGEN__GATEWAY__STRICT", Some("false")),
                ("SMARTGEN__RATE_LIMIT__MAX_REQUESTS", Some("5")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.server.port, 8081);
                assert_eq!(config.gateway.configured_secret(), Some("s3cret"));
                assert!(!config.gateway.strict);
                assert_eq!(config.rate_limit.max_requests, 5);
            },
        );
    }

    #[test]
    fn test_validate_rejects_zero_window() {
        let mut config = AppConfig::default();
        config.rate_limit.window_secs = 0;
        assert!(config.validate().is_err());
    }
}
