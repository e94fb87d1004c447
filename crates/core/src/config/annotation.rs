//! Per-call annotation settings.
//!
//! [`AnnotationSettings`] is the raw, string-typed form that arrives from
//! config files, environment variables, tool arguments or CLI flags.
//! [`AnnotationConfig`] is the validated value the pipeline runs on.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::ConfigError;
use super::options::{LineBreak, LinkStyle, Tooltip};

const MIN_TIMEOUT_MS: u64 = 100;
const MAX_TIMEOUT_MS: u64 = 300_000;

/// Raw annotation settings, as loaded or received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationSettings {
    /// `wide` | `narrow` (or `weit` | `schmal`).
    #[serde(default = "default_link_style")]
    pub link_style: String,

    /// `none` | `neutral` | `descriptive` | `statutes` | `half`.
    #[serde(default = "default_tooltip")]
    pub tooltip: String,

    /// `none` | `with` | `auto`.
    #[serde(default = "default_line_break")]
    pub line_break: String,

    /// `target` attribute of generated anchors.
    #[serde(default)]
    pub target: String,

    /// `class` attribute of generated anchors.
    #[serde(default)]
    pub css_class: String,

    /// Link to buzer.de when a norm is not available on dejure.org.
    #[serde(default = "default_true")]
    pub fallback_to_secondary_source: bool,

    /// Provider designation, usually the site's domain.
    #[serde(default)]
    pub provider_id: String,

    /// Contact address reported to the service.
    #[serde(default)]
    pub contact_email: String,

    /// Citation identifiers the service should leave unlinked.
    #[serde(default)]
    pub ignore: Vec<String>,

    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,

    /// Lifetime of cached annotations in seconds.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

fn default_link_style() -> String {
    LinkStyle::default().as_str().into()
}

fn default_tooltip() -> String {
    Tooltip::default().as_str().into()
}

fn default_line_break() -> String {
    LineBreak::default().as_str().into()
}

fn default_true() -> bool {
    true
}

fn default_connect_timeout_ms() -> u64 {
    3_000
}

fn default_read_timeout_ms() -> u64 {
    10_000
}

fn default_cache_ttl_secs() -> u64 {
    2 * 24 * 60 * 60 // 2 days
}

impl Default for AnnotationSettings {
    fn default() -> Self {
        Self {
            link_style: default_link_style(),
            tooltip: default_tooltip(),
            line_break: default_line_break(),
            target: String::new(),
            css_class: String::new(),
            fallback_to_secondary_source: true,
            provider_id: String::new(),
            contact_email: String::new(),
            ignore: Vec::new(),
            connect_timeout_ms: default_connect_timeout_ms(),
            read_timeout_ms: default_read_timeout_ms(),
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

impl AnnotationSettings {
    /// Validate the raw settings and produce an [`AnnotationConfig`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownValue` for unrecognized `link_style`,
    /// `tooltip` or `line_break` values, and `ConfigError::Invalid` for
    /// timeouts outside 100ms..=5min.
    pub fn parse(&self) -> Result<AnnotationConfig, ConfigError> {
        let link_style = self.link_style.parse()?;
        let tooltip = self.tooltip.parse()?;
        let line_break = self.line_break.parse()?;

        check_timeout("connect_timeout_ms", self.connect_timeout_ms)?;
        check_timeout("read_timeout_ms", self.read_timeout_ms)?;

        Ok(AnnotationConfig {
            link_style,
            tooltip,
            line_break,
            target: self.target.clone(),
            css_class: self.css_class.clone(),
            fallback_to_secondary_source: self.fallback_to_secondary_source,
            provider_id: self.provider_id.clone(),
            contact_email: self.contact_email.clone(),
            ignore: self.ignore.clone(),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            read_timeout: Duration::from_millis(self.read_timeout_ms),
            cache_ttl: Duration::from_secs(self.cache_ttl_secs),
        })
    }
}

fn check_timeout(field: &str, value: u64) -> Result<(), ConfigError> {
    if value < MIN_TIMEOUT_MS {
        return Err(ConfigError::Invalid { field: field.into(), reason: "must be at least 100ms".into() });
    }
    if value > MAX_TIMEOUT_MS {
        return Err(ConfigError::Invalid {
            field: field.into(),
            reason: "must not exceed 5 minutes (300000ms)".into(),
        });
    }
    Ok(())
}

/// Validated annotation configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationConfig {
    pub link_style: LinkStyle,
    pub tooltip: Tooltip,
    pub line_break: LineBreak,
    pub target: String,
    pub css_class: String,
    pub fallback_to_secondary_source: bool,
    pub provider_id: String,
    pub contact_email: String,
    pub ignore: Vec<String>,
    /// Bound on connecting and receiving the response head.
    pub connect_timeout: Duration,
    /// Bound on each wait for the next body chunk.
    pub read_timeout: Duration,
    pub cache_ttl: Duration,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            link_style: LinkStyle::default(),
            tooltip: Tooltip::default(),
            line_break: LineBreak::default(),
            target: String::new(),
            css_class: String::new(),
            fallback_to_secondary_source: true,
            provider_id: String::new(),
            contact_email: String::new(),
            ignore: Vec::new(),
            connect_timeout: Duration::from_millis(default_connect_timeout_ms()),
            read_timeout: Duration::from_millis(default_read_timeout_ms()),
            cache_ttl: Duration::from_secs(default_cache_ttl_secs()),
        }
    }
}

impl AnnotationConfig {
    /// Provider identity in the `domain-email` form the service expects.
    pub fn provider_identity(&self) -> String {
        format!("{}-{}", self.provider_id, self.contact_email)
    }
}
