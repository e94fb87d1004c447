//! Client code for dejure-rs.
//!
//! This crate provides the citation prefilter, the dejure.org linking
//! client, the integrity verifier, and the annotation pipeline that
//! composes them with a cache.

pub mod annotate;
pub mod dejure;
pub mod prefilter;
pub mod verify;

pub use annotate::{AnnotationOutcome, AnnotationPath, Annotator};
pub use dejure::{AnnotationClient, DejureClient, DejureConfig, RawResponse, TimeoutPhase, TransportError};
pub use prefilter::has_candidate;
pub use verify::{RejectReason, Verdict, verify};
