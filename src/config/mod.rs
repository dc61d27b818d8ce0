use anyhow::{bail, Result};
use dotenvy::dotenv;
use serde::Deserialize;

/// Configuration for the registry server and console
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Full connection URL (`postgres://...` or `sqlite:...`), wins over the
    /// individual `DB_*` settings
    pub database_url: Option<String>,
    pub db_host: Option<String>,
    #[serde(default = "default_db_port")]
    pub db_port: u16,
    pub db_user: Option<String>,
    pub db_password: Option<String>,
    pub db_name: Option<String>,
    #[serde(default = "default_max_connections")]
    pub db_max_connections: u32,
    /// Port the HTTP API listens on
    #[serde(default = "default_port")]
    pub port: u16,
    /// Base URL the console uses to reach the API
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Comma-separated origins, or `*`
    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: String,
    #[serde(default)]
    pub log_format: LogFormat,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Where the data store lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseSettings {
    Url(String),
    Postgres {
        host: String,
        port: u16,
        user: String,
        password: String,
        name: String,
    },
}

fn default_db_port() -> u16 {
    5432
}

fn default_max_connections() -> u32 {
    5
}

fn default_port() -> u16 {
    3000
}

fn default_api_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_cors_origins() -> String {
    "*".to_string()
}

impl Config {
    /// Read the process environment, with `.env` values filling any gaps
    ///
    /// Database settings are not checked here; see [`Config::database_settings`].
    pub fn load() -> Result<Self> {
        dotenv().ok();
        Ok(envy::from_env::<Config>()?)
    }

    /// Build a configuration from explicit key/value pairs
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::from_iter::<_, Config>(pairs)?)
    }

    /// Resolve the data store location
    ///
    /// `DATABASE_URL` is used as-is; otherwise host, user and database name
    /// are required and the password defaults to empty.
    pub fn database_settings(&self) -> Result<DatabaseSettings> {
        if let Some(url) = self.database_url.as_deref().filter(|u| !u.trim().is_empty()) {
            return Ok(DatabaseSettings::Url(url.trim().to_string()));
        }

        match (&self.db_host, &self.db_user, &self.db_name) {
            (Some(host), Some(user), Some(name)) => Ok(DatabaseSettings::Postgres {
                host: host.clone(),
                port: self.db_port,
                user: user.clone(),
                password: self.db_password.clone().unwrap_or_default(),
                name: name.clone(),
            }),
            _ => bail!("set DATABASE_URL, or DB_HOST, DB_USER and DB_NAME"),
        }
    }
}

/// Configuration for either subcommand; `serve` additionally needs
/// `DATABASE_URL` or the `DB_HOST`/`DB_USER`/`DB_NAME` trio
pub fn init() -> Result<Config> {
    Config::load()
}
