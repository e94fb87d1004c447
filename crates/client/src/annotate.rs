//! The annotate-verify-cache pipeline.
//!
//! ```text
//! settings ──parse──▶ prefilter ──▶ fingerprint ──▶ cache.get ──hit──▶ cached text
//!                        │                             │
//!                   no candidate                      miss
//!                        │                             ▼
//!                        ▼                        client.send ──error──▶ original text
//!                  original text                       │
//!                                                      ▼
//!                                                   verify ──reject──▶ original text
//!                                                      │
//!                                                   accept ──▶ cache.put ──▶ annotated text
//! ```
//!
//! Every failure after configuration parsing degrades to returning the
//! caller's text unchanged. Concurrent calls with the same fingerprint are
//! not deduplicated; each misses, fetches and writes independently.

use std::fmt;
use std::sync::Arc;

use dejure_core::cache::fingerprint;
use dejure_core::{AnnotationConfig, AnnotationSettings, CacheStore, ConfigError};
use serde::Serialize;

use crate::dejure::AnnotationClient;
use crate::prefilter::has_candidate;
use crate::verify::{Verdict, verify};

/// Terminal state a call ended in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationPath {
    /// Prefilter found nothing linkable.
    NoCandidate,
    /// Served from cache without a network call.
    CacheHit,
    /// Fetched, verified and cached.
    Annotated,
    /// Fetched but failed verification.
    Rejected,
    /// The remote call failed.
    TransportFailed,
}

impl fmt::Display for AnnotationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NoCandidate => "no_candidate",
            Self::CacheHit => "cache_hit",
            Self::Annotated => "annotated",
            Self::Rejected => "rejected",
            Self::TransportFailed => "transport_failed",
        };
        f.write_str(name)
    }
}

/// Result of one `annotate` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotationOutcome {
    pub text: String,
    pub from_cache: bool,
    pub path: AnnotationPath,
}

impl AnnotationOutcome {
    fn unchanged(text: &str, path: AnnotationPath) -> Self {
        Self { text: text.to_string(), from_cache: false, path }
    }
}

/// Composes prefilter, cache, remote client and verifier.
#[derive(Clone)]
pub struct Annotator {
    client: Arc<dyn AnnotationClient>,
    cache: Arc<dyn CacheStore>,
}

impl Annotator {
    pub fn new(client: Arc<dyn AnnotationClient>, cache: Arc<dyn CacheStore>) -> Self {
        Self { client, cache }
    }

    /// Validate `settings`, then annotate `text`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for invalid settings, before any cache lookup
    /// or network call. All other failures return `text` unchanged.
    pub async fn annotate(&self, text: &str, settings: &AnnotationSettings) -> Result<AnnotationOutcome, ConfigError> {
        let config = settings.parse()?;
        Ok(self.annotate_with(text, &config).await)
    }

    /// Annotate `text` under an already validated config.
    pub async fn annotate_with(&self, text: &str, config: &AnnotationConfig) -> AnnotationOutcome {
        if !has_candidate(text) {
            tracing::debug!(len = text.len(), "no citation candidate, skipping annotation");
            return AnnotationOutcome::unchanged(text, AnnotationPath::NoCandidate);
        }

        let key = fingerprint(text, config);

        match self.cache.get(&key).await {
            Ok(Some(cached)) => {
                tracing::debug!(%key, "annotation cache hit");
                return AnnotationOutcome { text: cached, from_cache: true, path: AnnotationPath::CacheHit };
            }
            Ok(None) => tracing::debug!(%key, "annotation cache miss"),
            Err(e) => tracing::warn!(%key, error = %e, "cache read failed, treating as miss"),
        }

        let response = match self.client.send(text, config).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(%key, error = %e, "annotation request failed, returning text unchanged");
                return AnnotationOutcome::unchanged(text, AnnotationPath::TransportFailed);
            }
        };

        match verify(text, &response.body) {
            Verdict::Accept(annotated) => {
                if let Err(e) = self.cache.put(&key, &annotated, config.cache_ttl).await {
                    tracing::warn!(%key, error = %e, "failed to cache verified annotation");
                }
                tracing::debug!(%key, fetch_ms = response.fetch_ms, "annotation verified");
                AnnotationOutcome { text: annotated, from_cache: false, path: AnnotationPath::Annotated }
            }
            Verdict::Reject(reason) => {
                tracing::warn!(%key, ?reason, "annotation failed integrity check, returning text unchanged");
                AnnotationOutcome::unchanged(text, AnnotationPath::Rejected)
            }
        }
    }
}
