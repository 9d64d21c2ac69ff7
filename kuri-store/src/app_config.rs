use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub booking: BookingConfig,
    #[serde(default)]
    pub notifier: NotifierConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    #[serde(default = "default_session_ttl")]
    pub session_ttl_seconds: u64,
    pub bootstrap_username: Option<String>,
    pub bootstrap_password: Option<String>,
}

fn default_session_ttl() -> u64 {
    3600
}

#[derive(Debug, Deserialize, Clone)]
pub struct BookingConfig {
    #[serde(default = "default_slot_capacity")]
    pub slot_capacity: i32,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            slot_capacity: default_slot_capacity(),
        }
    }
}

fn default_slot_capacity() -> i32 {
    kuri_core::slots::DEFAULT_SLOT_CAPACITY
}

#[derive(Debug, Deserialize, Clone)]
pub struct NotifierConfig {
    pub worker_url: Option<String>,
    #[serde(default = "default_notifier_timeout")]
    pub timeout_seconds: u64,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            worker_url: None,
            timeout_seconds: default_notifier_timeout(),
        }
    }
}

fn default_notifier_timeout() -> u64 {
    10
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(config::File::with_name("config/default"))
            // Add in the current environment file (optional)
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add in a local configuration file, not checked in to git
            .add_source(config::File::with_name("config/local").required(false))
            // Environment overrides, e.g. KURI__SERVER__PORT=8080
            .add_source(config::Environment::with_prefix("KURI").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
