//! MCP tool implementations.

pub mod download_patent;
pub mod download_patents;
pub mod get_patent_info;
pub mod registry;

pub use registry::{ToolContext, ToolRegistry};
