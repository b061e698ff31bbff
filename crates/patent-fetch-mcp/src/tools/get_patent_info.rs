//! `get_patent_info` tool — metadata lookup without downloading.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

use super::registry::ToolContext;

#[derive(Debug, Deserialize)]
struct GetPatentInfoParams {
    patent_number: String,
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "get_patent_info".to_string(),
        description: Some(
            "Get patent information (title, inventors, assignee, abstract) without downloading"
                .to_string(),
        ),
        input_schema: json!({
            "type": "object",
            "properties": {
                "patent_number": {
                    "type": "string",
                    "description": "The patent number to look up (e.g., 'WO2013078254A1')"
                }
            },
            "required": ["patent_number"]
        }),
    }
}

pub async fn execute(args: Value, ctx: &Arc<ToolContext>) -> McpResult<ToolCallResult> {
    let params: GetPatentInfoParams =
        serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;

    match ctx.client.get_patent_info(&params.patent_number).await {
        Ok(info) => Ok(ToolCallResult::json(&info)),
        Err(e) => Ok(ToolCallResult::error(format!(
            "Error retrieving patent info: {e}"
        ))),
    }
}
