//! PatentFetch MCP Server — patent downloads and metadata lookup over MCP.

pub mod config;
pub mod protocol;
pub mod tools;
pub mod transport;
pub mod types;

pub use config::ServerConfig;
pub use protocol::ProtocolHandler;
pub use tools::{ToolContext, ToolRegistry};
pub use transport::StdioTransport;
