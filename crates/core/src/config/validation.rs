//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;
use url::Url;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("unrecognized value for {field}: {value:?}")]
    UnknownValue { field: String, value: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `endpoint` is not an http(s) URL
    /// - a timeout is below 100ms or exceeds 5 minutes
    ///
    /// Returns `ConfigError::UnknownValue` if an annotation option holds an
    /// unrecognized value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let endpoint = Url::parse(&self.endpoint)
            .map_err(|e| ConfigError::Invalid { field: "endpoint".into(), reason: e.to_string() })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid { field: "endpoint".into(), reason: "must be an http(s) URL".into() });
        }

        self.annotation.parse()?;

        if self.annotation.provider_id.is_empty() || self.annotation.contact_email.is_empty() {
            tracing::warn!(
                provider_id = %self.annotation.provider_id,
                contact_email = %self.annotation.contact_email,
                "provider_id or contact_email is empty; dejure.org expects a provider identity"
            );
        }

        Ok(())
    }
}
