//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (DEJURE_*)
//! 2. TOML config file (if DEJURE_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod annotation;
mod options;
mod validation;

pub use annotation::{AnnotationConfig, AnnotationSettings};
pub use options::{LineBreak, LinkStyle, Tooltip};
pub use validation::ConfigError;

/// Default dejure.org linking endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://rechtsnetz.dejure.org/dienste/vernetzung/vernetzen";

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (DEJURE_*), nested keys split on `__`
/// 2. TOML file from `DEJURE_CONFIG_FILE` (if set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to SQLite cache database.
    ///
    /// Set via DEJURE_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Linking service endpoint.
    ///
    /// Set via DEJURE_ENDPOINT environment variable.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Default annotation settings.
    ///
    /// Set via DEJURE_ANNOTATION__* environment variables,
    /// e.g. DEJURE_ANNOTATION__LINK_STYLE=narrow.
    #[serde(default)]
    pub annotation: AnnotationSettings,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./dejure-cache.sqlite")
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { db_path: default_db_path(), endpoint: default_endpoint(), annotation: AnnotationSettings::default() }
    }
}

impl AppConfig {
    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `DEJURE_`
    /// 2. TOML file from `DEJURE_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("DEJURE_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("DEJURE_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        Self::from_figment(&figment)
    }

    /// Extract and validate configuration from a prepared figment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::LoadFailed` if extraction fails, or any
    /// validation error.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Parse the default annotation settings.
    ///
    /// # Errors
    ///
    /// See [`AnnotationSettings::parse`].
    pub fn annotation_config(&self) -> Result<AnnotationConfig, ConfigError> {
        self.annotation.parse()
    }
}
