use serde::Deserialize;
use std::env;

/// Process configuration. Every key has a default, so an empty source
/// stack still yields a runnable (if payment-less) server.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub payment: PaymentConfig,
    pub slots: SlotConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    /// Body of `GET /api/ping`.
    pub ping_message: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            ping_message: "ping".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AuthConfig {
    /// Unset means sessions never expire.
    pub session_ttl_seconds: Option<u64>,
    pub admin_email: String,
    pub admin_password: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl_seconds: None,
            admin_email: "admin@greenfield.com".to_string(),
            admin_password: "admin123".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PaymentConfig {
    pub key_id: Option<String>,
    pub key_secret: Option<String>,
    pub currency: String,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            key_id: None,
            key_secret: None,
            currency: "INR".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SlotConfig {
    pub horizon_days: u32,
    pub prebooked_ratio: f64,
}

impl Default for SlotConfig {
    fn default() -> Self {
        Self {
            horizon_days: 30,
            prebooked_ratio: 0.0,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // e.g. `GREENFIELD__PAYMENT__KEY_SECRET=...`
            .add_source(config::Environment::with_prefix("GREENFIELD").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    pub fn from_toml(source: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}
