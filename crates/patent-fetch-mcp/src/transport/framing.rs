//! Newline-delimited JSON framing. One message per line, both directions.

use crate::types::{JsonRpcMessage, McpError, McpResult};

/// Decode one line from the wire into a JSON-RPC message.
///
/// Blank lines are framing noise, not valid messages.
pub fn parse_message(line: &str) -> McpResult<JsonRpcMessage> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(McpError::ParseError("blank line".to_string()));
    }

    serde_json::from_str(trimmed)
        .map_err(|e| McpError::ParseError(format!("invalid JSON-RPC frame: {e}")))
}

/// Encode a value as one newline-terminated frame.
///
/// Compact serialization keeps the whole message on a single line.
pub fn frame_message(value: &serde_json::Value) -> McpResult<String> {
    let mut line = serde_json::to_string(value)?;
    line.push('\n');
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_request_line() {
        let msg = parse_message(r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#).unwrap();
        assert!(matches!(msg, JsonRpcMessage::Request(_)));
    }

    #[test]
    fn test_garbage_is_parse_error() {
        assert!(matches!(
            parse_message("{not json"),
            Err(McpError::ParseError(_))
        ));
        assert!(matches!(
            parse_message("   "),
            Err(McpError::ParseError(_))
        ));
    }

    #[test]
    fn test_framed_message_ends_with_newline() {
        let framed = frame_message(&json!({"ok": true})).unwrap();
        assert!(framed.ends_with('\n'));
        assert!(!framed[..framed.len() - 1].contains('\n'));
    }
}
