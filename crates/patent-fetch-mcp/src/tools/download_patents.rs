//! `download_patents` tool — fetch a batch of patent PDFs.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

use super::registry::ToolContext;

#[derive(Debug, Deserialize)]
struct DownloadPatentsParams {
    patent_numbers: Vec<String>,
    #[serde(default)]
    output_dir: Option<String>,
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "download_patents".to_string(),
        description: Some("Download multiple patent PDFs from Google Patents".to_string()),
        input_schema: json!({
            "type": "object",
            "properties": {
                "patent_numbers": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "List of patent numbers to download"
                },
                "output_dir": {
                    "type": "string",
                    "description": "Directory to save the PDF files (default: current directory)"
                }
            },
            "required": ["patent_numbers"]
        }),
    }
}

pub async fn execute(args: Value, ctx: &Arc<ToolContext>) -> McpResult<ToolCallResult> {
    let params: DownloadPatentsParams =
        serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;

    if params.patent_numbers.is_empty() {
        return Ok(ToolCallResult::error(
            "patent_numbers must not be empty".to_string(),
        ));
    }

    let output_dir = ctx.resolve_output_dir(params.output_dir.as_deref());
    let results = ctx
        .client
        .download_patents(&params.patent_numbers, &output_dir)
        .await;

    // Report each distinct number once, in the order it was requested.
    let mut successful: Vec<&str> = Vec::new();
    let mut failed: Vec<&str> = Vec::new();
    for number in &params.patent_numbers {
        let ok = results.get(number.as_str()).copied().unwrap_or(false);
        let bucket = if ok { &mut successful } else { &mut failed };
        if !bucket.contains(&number.as_str()) {
            bucket.push(number.as_str());
        }
    }

    let mut summary = String::from("Download completed:\n");
    summary.push_str(&format!("  Successful: {} patents\n", successful.len()));
    summary.push_str(&format!("  Failed: {} patents\n", failed.len()));
    if !successful.is_empty() {
        summary.push_str(&format!(
            "  Successfully downloaded: {}\n",
            successful.join(", ")
        ));
    }
    if !failed.is_empty() {
        summary.push_str(&format!("  Failed to download: {}", failed.join(", ")));
    }

    if failed.is_empty() {
        Ok(ToolCallResult::text(summary))
    } else {
        Ok(ToolCallResult::error(summary))
    }
}
