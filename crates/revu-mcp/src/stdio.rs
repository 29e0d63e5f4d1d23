use std::io::{self, BufRead, Write};
use std::sync::Arc;

use revu_bitbucket::PullRequestHost;
use revu_review::ReviewEngine;

use crate::protocol::{self, JsonRpcRequest, JsonRpcResponse};
use crate::server::McpServer;
use crate::tools::{call_tool, list_tools};

pub async fn run_stdio<H: PullRequestHost>(engine: ReviewEngine<H>) -> anyhow::Result<()> {
    let server = Arc::new(McpServer::new(engine));

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<JsonRpcRequest>(&line) {
            Ok(req) => {
                if req.is_notification() {
                    continue;
                }
                handle_request(&server, req).await
            }
            Err(e) => JsonRpcResponse::error(
                serde_json::json!(null),
                protocol::PARSE_ERROR,
                &format!("Parse error: {}", e),
            ),
        };

        let output = serde_json::to_string(&response)?;
        writeln!(stdout, "{}", output)?;
        stdout.flush()?;
    }

    Ok(())
}

async fn handle_request<H: PullRequestHost>(
    server: &Arc<McpServer<H>>,
    req: JsonRpcRequest,
) -> JsonRpcResponse {
    match req.method.as_str() {
        "initialize" => {
            let result = serde_json::json!({
                "protocolVersion": "2024-11-05",
                "capabilities": { "tools": {} },
                "serverInfo": { "name": "revu", "version": env!("CARGO_PKG_VERSION") }
            });
            JsonRpcResponse::success(req.id, result)
        }
        "initialized" | "notifications/initialized" => {
            JsonRpcResponse::success(req.id, serde_json::json!({}))
        }
        "ping" => JsonRpcResponse::success(req.id, serde_json::json!({})),
        "tools/list" => JsonRpcResponse::success(req.id, list_tools()),
        "tools/call" => match call_tool(server, &req.params).await {
            Ok(result) => JsonRpcResponse::success(req.id, result),
            Err(e) => {
                tracing::warn!(error = %e, "tool call failed");
                JsonRpcResponse::error(req.id, protocol::TOOL_ERROR, &e.to_string())
            }
        },
        _ => JsonRpcResponse::error(
            req.id,
            protocol::METHOD_NOT_FOUND,
            &format!("Method not found: {}", req.method),
        ),
    }
}
