use serde::Deserialize;
use std::net::SocketAddr;
use thiserror::Error;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub security: SecurityConfig,
    pub scoring: ScoringConfig,
    pub jobs: JobsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Caller-level timeout. Advisory: on expiry the client gets a timeout
    /// error, in-flight storage writes are not assumed rolled back.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

/// Point values for the scoring engine. Constants of the community, not of
/// the code.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    /// Points for any approved content item, before event bonuses.
    #[serde(default = "default_base_points")]
    pub base_points: i64,

    /// Score delta one star is worth to the content's author.
    #[serde(default = "default_points_per_star")]
    pub points_per_star: i64,

    /// IANA timezone used when scoring evaluates a submission date.
    #[serde(default = "default_scoring_timezone")]
    pub timezone: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobsConfig {
    /// Rolling window of materialized future occurrences per recurring event.
    #[serde(default = "default_min_future_instances")]
    pub min_future_instances: usize,

    /// Materialized occurrences older than this many days are pruned.
    #[serde(default = "default_instance_retention_days")]
    pub instance_retention_days: u32,
}

impl DatabaseConfig {
    /// The pool settings in the persistence layer's shape.
    pub fn pool_config(&self) -> persistence::db::DatabaseConfig {
        persistence::db::DatabaseConfig {
            url: self.url.clone(),
            max_connections: self.max_connections,
            min_connections: self.min_connections,
            connect_timeout_secs: self.connect_timeout_secs,
            idle_timeout_secs: self.idle_timeout_secs,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    10
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_idle_timeout() -> u64 {
    600
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_base_points() -> i64 {
    50
}

fn default_points_per_star() -> i64 {
    10
}

fn default_scoring_timezone() -> String {
    "UTC".to_string()
}

fn default_min_future_instances() -> usize {
    6
}

fn default_instance_retention_days() -> u32 {
    30
}

#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value: {0}")]
    Invalid(String),
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration with defaults
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with AB__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("AB").separator("__"))
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.database.url.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "AB__DATABASE__URL environment variable must be set".to_string(),
            ));
        }
        if self.scoring.base_points < 0 || self.scoring.points_per_star < 0 {
            return Err(ConfigValidationError::Invalid(
                "Scoring point values must be non-negative".to_string(),
            ));
        }
        if shared::validation::parse_timezone(&self.scoring.timezone).is_err() {
            return Err(ConfigValidationError::Invalid(format!(
                "Unknown scoring timezone: {}",
                self.scoring.timezone
            )));
        }
        Ok(())
    }

    /// The socket address to bind the server to.
    pub fn socket_addr(&self) -> SocketAddr {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .expect("Invalid host/port configuration")
    }

    /// The scoring timezone, validated at load time.
    pub fn scoring_timezone(&self) -> chrono_tz::Tz {
        shared::validation::parse_timezone(&self.scoring.timezone)
            .expect("Scoring timezone validated at load time")
    }
}
