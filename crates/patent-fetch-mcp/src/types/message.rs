//! Wire shapes for JSON-RPC 2.0, the framing MCP runs over.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Version literal every message must carry.
pub const JSONRPC_VERSION: &str = "2.0";

/// Request id, echoed back verbatim in the matching response.
///
/// The wire permits strings, numbers, and null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    String(String),
    Number(i64),
    Null,
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestId::String(s) => write!(f, "{s}"),
            RequestId::Number(n) => write!(f, "{n}"),
            RequestId::Null => write!(f, "null"),
        }
    }
}

/// A call the client expects an answer to, matched by `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: RequestId,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

/// Successful reply carrying the result for `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: RequestId,
    pub result: Value,
}

/// Failure reply for `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub jsonrpc: String,
    pub id: RequestId,
    pub error: JsonRpcErrorObject,
}

/// Code, human-readable message, and optional structured detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcErrorObject {
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Fire-and-forget message. Carries no id and gets no reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcNotification {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

/// Union type for any incoming JSON-RPC message.
///
/// Untagged deserialization tries requests first, so a message with an
/// `id` field parses as a request and one without parses as a
/// notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonRpcMessage {
    Request(JsonRpcRequest),
    Response(JsonRpcResponse),
    Error(JsonRpcError),
    Notification(JsonRpcNotification),
}

impl JsonRpcResponse {
    pub fn new(id: RequestId, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result,
        }
    }
}

impl JsonRpcError {
    pub fn new(id: RequestId, code: i32, message: String) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            error: JsonRpcErrorObject {
                code,
                message,
                data: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_id_variants_parse() {
        let msg: JsonRpcMessage = serde_json::from_value(json!({
            "jsonrpc": "2.0", "id": 7, "method": "tools/list"
        }))
        .unwrap();
        match msg {
            JsonRpcMessage::Request(req) => assert_eq!(req.id, RequestId::Number(7)),
            other => panic!("expected request, got {other:?}"),
        }

        let msg: JsonRpcMessage = serde_json::from_value(json!({
            "jsonrpc": "2.0", "id": "abc", "method": "ping"
        }))
        .unwrap();
        match msg {
            JsonRpcMessage::Request(req) => {
                assert_eq!(req.id, RequestId::String("abc".to_string()));
            }
            other => panic!("expected request, got {other:?}"),
        }
    }

    #[test]
    fn test_message_without_id_is_notification() {
        let msg: JsonRpcMessage = serde_json::from_value(json!({
            "jsonrpc": "2.0", "method": "initialized"
        }))
        .unwrap();
        assert!(matches!(msg, JsonRpcMessage::Notification(_)));
    }

    #[test]
    fn test_error_response_omits_empty_data() {
        let err = JsonRpcError::new(RequestId::Number(1), -32601, "no such method".to_string());
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value["jsonrpc"], "2.0");
        assert_eq!(value["error"]["code"], -32601);
        assert!(value["error"].get("data").is_none());
    }
}
