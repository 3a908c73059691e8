//! # configs
//!
//! Layered settings for the forum server: built-in defaults, then an optional
//! TOML file (`config/forum-board.toml`, or the path in `FORUM_CONFIG`), then
//! `FORUM__*` environment variables such as `FORUM__SERVER__PORT=8080`.

use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

const DEFAULT_CONFIG_PATH: &str = "config/forum-board";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ConfigError),

    #[error("missing required setting `{0}`")]
    Missing(&'static str),
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub database: DatabaseSettings,
    #[serde(default)]
    pub auth: AuthSettings,
    pub log: LogSettings,
}

#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    Postgres,
}

#[derive(Debug, Deserialize)]
pub struct StorageSettings {
    pub backend: StorageBackend,
}

#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default, deserialize_with = "optional_secret")]
    pub url: Option<SecretString>,
    pub max_connections: u32,
}

#[derive(Debug, Default, Deserialize)]
pub struct AuthSettings {
    /// HMAC key access tokens are signed with.
    #[serde(default, deserialize_with = "optional_secret")]
    pub access_token_key: Option<SecretString>,
    /// Maximum token age measured from `iat`.
    pub access_token_age_secs: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Deserialize)]
pub struct LogSettings {
    pub format: LogFormat,
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Settings {
    /// Loads `.env`, then defaults, the config file and the environment.
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }
        let path = std::env::var("FORUM_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let settings: Settings = Self::defaults()?
            .add_source(File::with_name(&path).required(false))
            .add_source(
                Environment::with_prefix("FORUM")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Defaults overlaid with a TOML document.
    pub fn from_toml(toml: &str) -> Result<Self, SettingsError> {
        let settings: Settings = Self::defaults()?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .set_default("storage.backend", "memory")?
            .set_default("database.max_connections", 10)?
            .set_default("log.format", "pretty")?
            .set_default("log.filter", "info,forum_board=debug,services=debug")
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.storage.backend == StorageBackend::Postgres && self.database.url.is_none() {
            return Err(SettingsError::Missing("database.url"));
        }
        Ok(())
    }

    pub fn access_token_key(&self) -> Result<&SecretString, SettingsError> {
        self.auth
            .access_token_key
            .as_ref()
            .ok_or(SettingsError::Missing("auth.access_token_key"))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn optional_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .filter(|s| !s.is_empty())
        .map(SecretString::from))
}
