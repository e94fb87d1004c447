//! annotate_text tool implementation.
//!
//! Links citations in the given text to dejure.org through the
//! annotate-verify-cache pipeline.

use dejure_client::{AnnotationPath, Annotator};
use dejure_core::cache::fingerprint;
use dejure_core::{AnnotationSettings, Error};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Input parameters for annotate_text tool.
///
/// Every option left out falls back to the server's configured default.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct AnnotateTextParams {
    /// Text or HTML fragment to annotate.
    pub text: String,

    /// "wide" links the whole citation, "narrow" only the provision number.
    #[serde(default)]
    pub link_style: Option<String>,

    /// Anchor title: "none", "neutral", "descriptive", "statutes" or "half".
    #[serde(default)]
    pub tooltip: Option<String>,

    /// Citations across line breaks: "none", "with" or "auto".
    #[serde(default)]
    pub line_break: Option<String>,

    /// `target` attribute of generated anchors.
    #[serde(default)]
    pub target: Option<String>,

    /// `class` attribute of generated anchors.
    #[serde(default)]
    pub css_class: Option<String>,

    /// Link to buzer.de when a norm is not available on dejure.org.
    #[serde(default)]
    pub fallback_to_secondary_source: Option<bool>,

    /// Citation identifiers to leave unlinked.
    #[serde(default)]
    pub ignore: Option<Vec<String>>,
}

impl AnnotateTextParams {
    /// Apply the per-call overrides on top of `defaults`.
    fn settings(&self, defaults: &AnnotationSettings) -> AnnotationSettings {
        let mut settings = defaults.clone();
        if let Some(link_style) = &self.link_style {
            settings.link_style = link_style.clone();
        }
        if let Some(tooltip) = &self.tooltip {
            settings.tooltip = tooltip.clone();
        }
        if let Some(line_break) = &self.line_break {
            settings.line_break = line_break.clone();
        }
        if let Some(target) = &self.target {
            settings.target = target.clone();
        }
        if let Some(css_class) = &self.css_class {
            settings.css_class = css_class.clone();
        }
        if let Some(fallback) = self.fallback_to_secondary_source {
            settings.fallback_to_secondary_source = fallback;
        }
        if let Some(ignore) = &self.ignore {
            settings.ignore = ignore.clone();
        }
        settings
    }
}

/// Output structure for annotate_text tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AnnotateTextOutput {
    /// Annotated text, or the input unchanged if annotation was skipped or failed.
    pub text: String,
    /// Whether the text came from the cache.
    pub from_cache: bool,
    /// How the call ended: no_candidate, cache_hit, annotated, rejected or transport_failed.
    pub path: String,
    /// Cache key for this text and configuration.
    pub fingerprint: String,
}

/// Implementation of the annotate_text tool.
pub async fn annotate_impl(
    annotator: &Annotator, defaults: &AnnotationSettings, params: AnnotateTextParams,
) -> Result<CallToolResult, McpError> {
    let config = params.settings(defaults).parse()?;
    let outcome = annotator.annotate_with(&params.text, &config).await;

    if outcome.path == AnnotationPath::Annotated {
        tracing::info!(len = params.text.len(), "annotated text");
    }

    let output = AnnotateTextOutput {
        fingerprint: fingerprint(&params.text, &config),
        text: outcome.text,
        from_cache: outcome.from_cache,
        path: outcome.path.to_string(),
    };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dejure_client::{AnnotationClient, RawResponse, TransportError};
    use dejure_core::{AnnotationConfig, MemoryCache};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Echoes the text back unchanged.
    #[derive(Default)]
    struct EchoClient {
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl AnnotationClient for EchoClient {
        async fn send(&self, text: &str, _config: &AnnotationConfig) -> Result<RawResponse, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(RawResponse { body: text.to_string(), status: 200, fetch_ms: 0 })
        }
    }

    fn params(text: &str) -> AnnotateTextParams {
        AnnotateTextParams { text: text.into(), ..Default::default() }
    }

    #[test]
    fn test_overrides_apply_on_defaults() {
        let defaults = AnnotationSettings { provider_id: "example.com".into(), ..Default::default() };
        let params = AnnotateTextParams {
            link_style: Some("narrow".into()),
            fallback_to_secondary_source: Some(false),
            ..params("§ 433 BGB")
        };

        let settings = params.settings(&defaults);
        assert_eq!(settings.link_style, "narrow");
        assert!(!settings.fallback_to_secondary_source);
        assert_eq!(settings.provider_id, "example.com");
        assert_eq!(settings.tooltip, defaults.tooltip);
    }

    fn output(result: &CallToolResult) -> AnnotateTextOutput {
        let content_val = serde_json::to_value(&result.content[0]).unwrap();
        let text = content_val
            .get("text")
            .and_then(|v| v.as_str())
            .expect("Expected text field in content");
        serde_json::from_str(text).unwrap()
    }

    #[tokio::test]
    async fn test_annotate_blank_text_returned_unchanged() {
        let client = Arc::new(EchoClient::default());
        let annotator = Annotator::new(client.clone(), Arc::new(MemoryCache::new()));

        let result = annotate_impl(&annotator, &AnnotationSettings::default(), params("  \n ")).await.unwrap();
        let output = output(&result);
        assert_eq!(output.text, "  \n ");
        assert_eq!(output.path, "no_candidate");
        assert!(!output.from_cache);
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_annotate_invalid_override() {
        let client = Arc::new(EchoClient::default());
        let annotator = Annotator::new(client.clone(), Arc::new(MemoryCache::new()));
        let params = AnnotateTextParams { tooltip: Some("invalid-value".into()), ..params("§ 433 BGB") };

        let err = annotate_impl(&annotator, &AnnotationSettings::default(), params).await.unwrap_err();
        assert_eq!(err.code.0, -32602);
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_annotate_then_cache_hit() {
        let client = Arc::new(EchoClient::default());
        let annotator = Annotator::new(client.clone(), Arc::new(MemoryCache::new()));
        let defaults = AnnotationSettings::default();

        let first = annotate_impl(&annotator, &defaults, params("§ 433 BGB")).await.unwrap();
        let second = annotate_impl(&annotator, &defaults, params("§ 433 BGB")).await.unwrap();
        assert!(!output(&first).from_cache);
        assert_eq!(output(&second).path, "cache_hit");
        assert_eq!(output(&first).fingerprint, output(&second).fingerprint);
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
    }
}
