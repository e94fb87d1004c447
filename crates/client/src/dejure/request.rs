//! Form body for the dejure.org linking endpoint.

use dejure_core::AnnotationConfig;
use serde::Serialize;

/// Client version reported in the `version` field.
pub const CLIENT_VERSION: &str = concat!("rust-", env!("CARGO_PKG_VERSION"));

/// Separator for the ignore list in `AktenzeichenIgnorieren`.
const IGNORE_SEPARATOR: &str = "|";

/// Form fields sent to the linking service, in the service's own names.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct VernetzungForm<'a> {
    #[serde(rename = "Originaltext")]
    pub original_text: &'a str,

    #[serde(rename = "AktenzeichenIgnorieren")]
    pub ignore: String,

    #[serde(rename = "Anbieterkennung")]
    pub provider: String,

    pub format: &'static str,

    #[serde(rename = "Tooltip")]
    pub tooltip: &'static str,

    #[serde(rename = "Zeilenwechsel")]
    pub line_break: &'static str,

    pub target: &'a str,

    pub class: &'a str,

    /// `1` links unknown norms to buzer.de, `0` leaves them unlinked.
    pub buzer: u8,

    pub version: &'static str,

    #[serde(rename = "Schema")]
    pub schema: &'static str,
}

impl<'a> VernetzungForm<'a> {
    /// Build the form for `text` under `config`. The text is trimmed.
    pub fn new(text: &'a str, config: &'a AnnotationConfig) -> Self {
        Self {
            original_text: text.trim(),
            ignore: config.ignore.join(IGNORE_SEPARATOR),
            provider: config.provider_identity(),
            format: config.link_style.wire_value(),
            tooltip: config.tooltip.wire_value(),
            line_break: config.line_break.wire_value(),
            target: &config.target,
            class: &config.css_class,
            buzer: u8::from(config.fallback_to_secondary_source),
            version: CLIENT_VERSION,
            schema: "https",
        }
    }
}
