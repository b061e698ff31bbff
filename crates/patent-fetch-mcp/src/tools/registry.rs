//! Tool registration and dispatch.

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;

use patent_fetch::PatentClient;

use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

use super::{download_patent, download_patents, get_patent_info};

/// Shared state handed to every tool invocation.
///
/// The client is stateless, so no lock is needed; tools borrow the
/// context through an `Arc` and run concurrently if the transport
/// ever pipelines requests.
pub struct ToolContext {
    pub client: PatentClient,
    pub output_dir: PathBuf,
}

impl ToolContext {
    pub fn new(client: PatentClient, output_dir: PathBuf) -> Self {
        Self { client, output_dir }
    }

    /// Per-call output directory override, falling back to the server default.
    pub fn resolve_output_dir(&self, override_dir: Option<&str>) -> PathBuf {
        match override_dir {
            Some(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => self.output_dir.clone(),
        }
    }
}

pub struct ToolRegistry;

impl ToolRegistry {
    pub fn list_tools() -> Vec<ToolDefinition> {
        vec![
            download_patent::definition(),
            download_patents::definition(),
            get_patent_info::definition(),
        ]
    }

    pub async fn call(
        name: &str,
        arguments: Option<Value>,
        context: &Arc<ToolContext>,
    ) -> McpResult<ToolCallResult> {
        let args = arguments.unwrap_or(Value::Object(serde_json::Map::new()));

        match name {
            "download_patent" => download_patent::execute(args, context).await,
            "download_patents" => download_patents::execute(args, context).await,
            "get_patent_info" => get_patent_info::execute(args, context).await,
            _ => Err(McpError::ToolNotFound(name.to_string())),
        }
    }
}
