//! Core types and shared functionality for dejure-rs.
//!
//! This crate provides:
//! - Annotation settings, validation and layered configuration loading
//! - Cache fingerprinting and the cache capability with SQLite and in-memory backends
//! - Unified error types

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{CacheDb, CacheStore, MemoryCache};
pub use config::{AnnotationConfig, AnnotationSettings, AppConfig, ConfigError, LineBreak, LinkStyle, Tooltip};
pub use error::Error;
