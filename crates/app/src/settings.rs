//! Runtime settings.
//!
//! Sources, later ones winning: built-in defaults, an optional
//! `settings.toml` next to the binary, then process environment variables
//! (`DB_HOST`, `PORT`, `LOG_LEVEL`, ...).
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub db_host: String,
    pub db_port: u16,
    pub db_user: String,
    pub db_password: String,
    pub db_name: String,
    pub db_sslmode: String,
    /// Full connection string; takes precedence over the `db_*` parts.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub bind: String,
    pub port: u16,
    pub log_level: String,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::load(Environment::default())
    }

    /// Same as [`Settings::new`] but reading variables from `vars` instead
    /// of the process environment.
    #[cfg(test)]
    pub fn from_env_map(vars: config::Map<String, String>) -> Result<Self, ConfigError> {
        Self::load(Environment::default().source(Some(vars)))
    }

    fn load(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("db_host", "localhost")?
            .set_default("db_port", 5432)?
            .set_default("db_user", "postgres")?
            .set_default("db_password", "postgres")?
            .set_default("db_name", "expense_tracker")?
            .set_default("db_sslmode", "disable")?
            .set_default("db_max_connections", 25)?
            .set_default("db_min_connections", 5)?
            .set_default("bind", "0.0.0.0")?
            .set_default("port", 8080)?
            .set_default("log_level", "info")?
            .add_source(File::with_name("settings").required(false))
            .add_source(environment.try_parsing(true))
            .build()?
            .try_deserialize()
    }

    pub fn database_url(&self) -> String {
        if let Some(url) = self.database_url.as_deref().filter(|u| !u.is_empty()) {
            return url.to_string();
        }
        format!(
            "postgres://{}:{}@{}:{}/{}?sslmode={}",
            self.db_user,
            self.db_password,
            self.db_host,
            self.db_port,
            self.db_name,
            self.db_sslmode
        )
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}
