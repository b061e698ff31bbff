//! Initialize-time version and capability negotiation.

use crate::types::{
    ClientCapabilities, InitializeParams, InitializeResult, McpResult, MCP_VERSION,
};

/// What the connected client told us during `initialize`.
///
/// The server always answers with its own protocol version; a client asking
/// for a different one gets a warning in the log and the handshake proceeds.
#[derive(Debug, Clone, Default)]
pub struct NegotiatedCapabilities {
    pub client: ClientCapabilities,
    pub initialized: bool,
}

impl NegotiatedCapabilities {
    pub fn negotiate(&mut self, params: InitializeParams) -> McpResult<InitializeResult> {
        let InitializeParams {
            protocol_version,
            capabilities,
            client_info,
        } = params;

        if protocol_version == MCP_VERSION {
            tracing::info!(
                "initialize from {} v{}",
                client_info.name,
                client_info.version
            );
        } else {
            tracing::warn!(
                "{} v{} asked for protocol {protocol_version}, answering with {MCP_VERSION}",
                client_info.name,
                client_info.version
            );
        }

        self.client = capabilities;
        Ok(InitializeResult::for_this_server())
    }

    pub fn mark_initialized(&mut self) -> McpResult<()> {
        self.initialized = true;
        tracing::info!("handshake complete, accepting tool calls");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Implementation, SERVER_NAME};

    fn init_params(version: &str) -> InitializeParams {
        InitializeParams {
            protocol_version: version.to_string(),
            capabilities: ClientCapabilities::default(),
            client_info: Implementation {
                name: "test-client".to_string(),
                version: "0.1.0".to_string(),
            },
        }
    }

    #[test]
    fn test_negotiate_advertises_tools_only() {
        let mut caps = NegotiatedCapabilities::default();
        let result = caps.negotiate(init_params(MCP_VERSION)).unwrap();
        assert_eq!(result.protocol_version, MCP_VERSION);
        assert_eq!(result.server_info.name, SERVER_NAME);
        assert!(result.capabilities.tools.is_some());
        assert!(result.capabilities.logging.is_some());
    }

    #[test]
    fn test_version_mismatch_still_negotiates() {
        let mut caps = NegotiatedCapabilities::default();
        let result = caps.negotiate(init_params("2099-01-01")).unwrap();
        assert_eq!(result.protocol_version, MCP_VERSION);
    }

    #[test]
    fn test_mark_initialized_sets_flag() {
        let mut caps = NegotiatedCapabilities::default();
        assert!(!caps.initialized);
        caps.mark_initialized().unwrap();
        assert!(caps.initialized);
    }
}
