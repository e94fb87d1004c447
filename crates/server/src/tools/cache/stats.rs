//! cache_stats tool implementation.

use dejure_core::{CacheDb, Error};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};

/// Implementation of the cache_stats tool.
pub async fn stats_impl(cache: &CacheDb) -> Result<CallToolResult, McpError> {
    let stats = cache.annotation_stats().await?;
    let json = serde_json::to_string_pretty(&stats)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize stats: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
