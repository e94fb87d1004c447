//! Cache-related MCP tools.
//!
//! This module provides tools for maintaining the SQLite annotation cache.

pub mod purge;
pub mod stats;

pub use purge::{CachePurgeParams, purge_impl};
pub use stats::stats_impl;
