//! `download_patent` tool — fetch a single patent PDF.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};

use patent_fetch::PatentIdentifier;

use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

use super::registry::ToolContext;

#[derive(Debug, Deserialize)]
struct DownloadPatentParams {
    patent_number: String,
    #[serde(default)]
    output_dir: Option<String>,
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "download_patent".to_string(),
        description: Some("Download a patent PDF from Google Patents".to_string()),
        input_schema: json!({
            "type": "object",
            "properties": {
                "patent_number": {
                    "type": "string",
                    "description": "The patent number to download (e.g., 'WO2013078254A1')"
                },
                "output_dir": {
                    "type": "string",
                    "description": "Directory to save the PDF file (default: current directory)"
                }
            },
            "required": ["patent_number"]
        }),
    }
}

pub async fn execute(args: Value, ctx: &Arc<ToolContext>) -> McpResult<ToolCallResult> {
    let params: DownloadPatentParams =
        serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;

    let output_dir = ctx.resolve_output_dir(params.output_dir.as_deref());

    // The saved file is named after the canonical form, so an unparseable
    // number can short-circuit straight to the failure text.
    let target = match PatentIdentifier::parse(&params.patent_number) {
        Ok(id) => output_dir.join(format!("{}.pdf", id.canonical())),
        Err(e) => {
            tracing::warn!("Rejected patent number {:?}: {e}", params.patent_number);
            return Ok(ToolCallResult::error(format!(
                "Failed to download patent {}",
                params.patent_number
            )));
        }
    };

    if ctx
        .client
        .download_patent(&params.patent_number, &output_dir)
        .await
    {
        Ok(ToolCallResult::text(format!(
            "Successfully downloaded patent {} to {}",
            params.patent_number,
            target.display()
        )))
    } else {
        Ok(ToolCallResult::error(format!(
            "Failed to download patent {}",
            params.patent_number
        )))
    }
}
