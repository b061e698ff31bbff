//! JSON-RPC dispatch for the patent tool server.
//!
//! One handler instance serves the whole connection. Tool state is a shared
//! [`ToolContext`] (a stateless patent client plus the default output
//! directory), so the only mutable piece is the negotiation record filled in
//! during the initialize handshake.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::tools::{ToolContext, ToolRegistry};
use crate::types::{
    JsonRpcMessage, JsonRpcNotification, JsonRpcRequest, JsonRpcResponse, McpError, McpResult,
    ToolCallParams, ToolListResult,
};

use super::negotiation::NegotiatedCapabilities;
use super::validator::validate_request;

pub struct ProtocolHandler {
    context: Arc<ToolContext>,
    negotiated: Mutex<NegotiatedCapabilities>,
}

impl ProtocolHandler {
    pub fn new(context: Arc<ToolContext>) -> Self {
        Self {
            context,
            negotiated: Mutex::new(NegotiatedCapabilities::default()),
        }
    }

    /// Handle one incoming message. Requests produce a response value,
    /// notifications produce nothing.
    pub async fn handle_message(&self, msg: JsonRpcMessage) -> Option<Value> {
        match msg {
            JsonRpcMessage::Request(req) => Some(self.answer(req).await),
            JsonRpcMessage::Notification(notif) => {
                self.absorb_notification(notif).await;
                None
            }
            _ => {
                tracing::warn!("client sent a response frame, ignoring it");
                None
            }
        }
    }

    /// Run a request through validation and dispatch, shaping the outcome
    /// into the success or error envelope for its id.
    async fn answer(&self, request: JsonRpcRequest) -> Value {
        let id = request.id.clone();
        let outcome = match validate_request(&request) {
            Ok(()) => self.dispatch(&request).await,
            Err(e) => Err(e),
        };

        let envelope = match outcome {
            Ok(result) => serde_json::to_value(JsonRpcResponse::new(id, result)),
            Err(e) => serde_json::to_value(e.to_json_rpc_error(id)),
        };
        envelope.unwrap_or_default()
    }

    async fn dispatch(&self, request: &JsonRpcRequest) -> McpResult<Value> {
        match request.method.as_str() {
            "initialize" => {
                let params = require_params(request.params.clone(), "initialize")?;
                let result = self.negotiated.lock().await.negotiate(params)?;
                to_result(result)
            }
            "tools/list" => to_result(ToolListResult {
                tools: ToolRegistry::list_tools(),
                next_cursor: None,
            }),
            "tools/call" => {
                let params: ToolCallParams = require_params(request.params.clone(), "tools/call")?;
                let result =
                    ToolRegistry::call(&params.name, params.arguments, &self.context).await?;
                to_result(result)
            }
            "ping" => Ok(empty_object()),
            "shutdown" => {
                tracing::info!("shutdown requested");
                Ok(empty_object())
            }
            other => Err(McpError::MethodNotFound(other.to_string())),
        }
    }

    async fn absorb_notification(&self, notification: JsonRpcNotification) {
        match notification.method.as_str() {
            "initialized" => {
                if let Err(e) = self.negotiated.lock().await.mark_initialized() {
                    tracing::error!("could not record handshake completion: {e}");
                }
            }
            "notifications/cancelled" | "$/cancelRequest" => {
                // Nothing in flight is cancellable; per-request timeouts bound
                // every outbound fetch already.
                tracing::info!("cancellation notification received");
            }
            other => tracing::debug!("unhandled notification {other:?}"),
        }
    }
}

/// Decode required params, mapping absence and malformed shapes alike to
/// an invalid-params error naming the method.
fn require_params<T: DeserializeOwned>(params: Option<Value>, method: &str) -> McpResult<T> {
    let value =
        params.ok_or_else(|| McpError::InvalidParams(format!("{method} requires params")))?;
    serde_json::from_value(value)
        .map_err(|e| McpError::InvalidParams(format!("bad params for {method}: {e}")))
}

fn to_result(value: impl serde::Serialize) -> McpResult<Value> {
    serde_json::to_value(value).map_err(|e| McpError::InternalError(e.to_string()))
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}
