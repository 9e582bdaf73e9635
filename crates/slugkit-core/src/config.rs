use anyhow::Result;
use config::Config;
use serde::Deserialize;

use crate::types::SourceFields;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database: Option<DatabaseConfig>,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub hooks: Vec<HookConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u8,
}

const fn default_max_connections() -> u8 {
    4
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

/// Declarative definition of a slug hook.
///
/// `collection` names a collection handle supplied at registration time;
/// `scope_fields` restricts the uniqueness check to siblings sharing the
/// record's values for those fields.
#[derive(Debug, Clone, Deserialize)]
pub struct HookConfig {
    pub collection: String,
    pub source: SourceFields,
    pub destination: String,
    #[serde(default)]
    pub allow_duplication: bool,
    #[serde(default)]
    pub invalidate_on_duplicate: bool,
    #[serde(default)]
    pub scope_fields: Vec<String>,
}

impl Settings {
    /// ## Summary
    /// Loads configuration from environment variables and an optional
    /// `config.toml` into a `Settings`.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        Self::load_from("config.toml")
    }

    /// ## Summary
    /// Same as [`Settings::load`] with an explicit configuration file name.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load_from(file_name: &str) -> Result<Self> {
        Self::load_with_env(file_name, None)
    }

    /// `env` replaces the process environment when given.
    fn load_with_env(file_name: &str, env: Option<config::Map<String, String>>) -> Result<Self> {
        Ok(Config::builder()
            .set_default("logging.level", "info")?
            .add_source(
                config::Environment::with_prefix("SLUGKIT")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true)
                    .source(env),
            )
            .add_source(config::File::with_name(file_name).required(false))
            .build()?
            .try_deserialize::<Settings>()?)
    }

    /// ## Summary
    /// Parses settings from an in-memory TOML document, with the same
    /// defaults as [`Settings::load`].
    ///
    /// ## Errors
    /// Returns an error if the document is not valid TOML or does not match
    /// the settings shape.
    pub fn from_toml(document: &str) -> Result<Self> {
        Ok(Config::builder()
            .set_default("logging.level", "info")?
            .add_source(config::File::from_str(document, config::FileFormat::Toml))
            .build()?
            .try_deserialize::<Settings>()?)
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    let settings = Settings::load()?;
    tracing::debug!(hooks = settings.hooks.len(), "Slug configuration loaded");
    Ok(settings)
}
