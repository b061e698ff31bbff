//! Stdio transport — one JSON-RPC frame per line, stdin in, stdout out.
//!
//! Stdout carries nothing but protocol frames; all logging goes to stderr
//! via the tracing subscriber configured in `main`. Unparseable lines get a
//! parse-error frame back (with a null id, since the id never decoded) and
//! the loop keeps serving.

use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::protocol::ProtocolHandler;
use crate::types::{McpError, McpResult, RequestId};

use super::framing;

pub struct StdioTransport {
    handler: ProtocolHandler,
}

impl StdioTransport {
    pub fn new(handler: ProtocolHandler) -> Self {
        Self { handler }
    }

    /// Serve the connection until stdin reaches EOF.
    pub async fn run(&self) -> McpResult<()> {
        let mut lines = BufReader::new(tokio::io::stdin());
        let mut stdout = tokio::io::stdout();
        let mut buf = String::new();

        tracing::info!("serving MCP over stdio");

        loop {
            buf.clear();
            if lines.read_line(&mut buf).await? == 0 {
                tracing::info!("stdin closed, stopping");
                return Ok(());
            }
            if buf.trim().is_empty() {
                continue;
            }

            let reply = match framing::parse_message(&buf) {
                Ok(msg) => self.handler.handle_message(msg).await,
                Err(e) => {
                    tracing::warn!("dropping unparseable frame: {e}");
                    Some(
                        serde_json::to_value(e.to_json_rpc_error(RequestId::Null))
                            .map_err(|e| McpError::InternalError(e.to_string()))?,
                    )
                }
            };

            if let Some(value) = reply {
                write_frame(&mut stdout, &value).await?;
            }
        }
    }
}

async fn write_frame<W: AsyncWrite + Unpin>(
    out: &mut W,
    value: &serde_json::Value,
) -> McpResult<()> {
    let framed = framing::frame_message(value)?;
    out.write_all(framed.as_bytes()).await?;
    out.flush().await?;
    Ok(())
}
