//! Structural checks on incoming JSON-RPC requests.

use crate::types::{JsonRpcRequest, McpError, McpResult, JSONRPC_VERSION};

/// Reject requests this server cannot meaningfully dispatch.
///
/// The version marker must be the JSON-RPC 2.0 literal and the method must
/// name something, whitespace does not count. Anything else about the
/// request (unknown methods, bad params) is the dispatcher's problem.
pub fn validate_request(request: &JsonRpcRequest) -> McpResult<()> {
    if request.jsonrpc != JSONRPC_VERSION {
        return Err(McpError::InvalidRequest(format!(
            "unsupported jsonrpc version {:?}, this server speaks {JSONRPC_VERSION:?}",
            request.jsonrpc
        )));
    }

    if request.method.trim().is_empty() {
        return Err(McpError::InvalidRequest(
            "request carries no method name".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RequestId;

    fn request(jsonrpc: &str, method: &str) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: jsonrpc.to_string(),
            id: RequestId::Number(1),
            method: method.to_string(),
            params: None,
        }
    }

    #[test]
    fn test_accepts_well_formed_request() {
        assert!(validate_request(&request("2.0", "tools/list")).is_ok());
    }

    #[test]
    fn test_rejects_wrong_version_and_empty_method() {
        assert!(matches!(
            validate_request(&request("1.0", "tools/list")),
            Err(McpError::InvalidRequest(_))
        ));
        assert!(matches!(
            validate_request(&request("2.0", "")),
            Err(McpError::InvalidRequest(_))
        ));
        assert!(matches!(
            validate_request(&request("2.0", "   ")),
            Err(McpError::InvalidRequest(_))
        ));
    }
}
