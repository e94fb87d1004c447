//! MCP tool implementations.
//!
//! This module contains all tools exposed by the mcp-dejure server.

pub mod annotate_text;
pub mod cache;

pub use annotate_text::{AnnotateTextOutput, AnnotateTextParams};
