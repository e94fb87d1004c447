//! Content-addressed cache key generation.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::config::{AnnotationConfig, LineBreak, LinkStyle, Tooltip};

/// Config fields that change what the service returns, in fixed order.
#[derive(Serialize)]
struct OutputFields<'a> {
    link_style: LinkStyle,
    tooltip: Tooltip,
    line_break: LineBreak,
    target: &'a str,
    css_class: &'a str,
    fallback_to_secondary_source: bool,
    ignore: &'a [String],
}

impl<'a> From<&'a AnnotationConfig> for OutputFields<'a> {
    fn from(config: &'a AnnotationConfig) -> Self {
        Self {
            link_style: config.link_style,
            tooltip: config.tooltip,
            line_break: config.line_break,
            target: &config.target,
            css_class: &config.css_class,
            fallback_to_secondary_source: config.fallback_to_secondary_source,
            ignore: &config.ignore,
        }
    }
}

/// Compute the cache key for annotating `text` under `config`.
///
/// Only leading and trailing whitespace is normalized away. The key is the
/// byte length of the trimmed text followed by the SHA-256 hex digest of
/// the text and the output-affecting config fields.
pub fn fingerprint(text: &str, config: &AnnotationConfig) -> String {
    let text = text.trim();
    // Serializing plain strings, enums and a bool cannot fail.
    let fields = serde_json::to_string(&OutputFields::from(config)).unwrap_or_default();

    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hasher.update(b"\n");
    hasher.update(fields.as_bytes());
    format!("{}{}", text.len(), hex::encode(hasher.finalize()))
}
