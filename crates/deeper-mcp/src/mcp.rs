//! MCP (Model Context Protocol) JSON-RPC handler.
//!
//! Reads JSON-RPC 2.0 requests from stdin (one per line) and writes
//! responses to stdout. Logging goes to stderr so it never mixes with
//! protocol output.
//!
//! ## Supported methods
//!
//! | Method       | Description                      |
//! |--------------|----------------------------------|
//! | `initialize` | Handshake, returns capabilities  |
//! | `tools/list` | List available tool definitions  |
//! | `tools/call` | Execute a tool and return result |
//! | `ping`       | Liveness check                   |
//!
//! Notifications (requests without an `id`) get no response.

use deeper_api::Prober;
use deeper_core::{INSTRUCTIONS, ToolDispatcher};
use serde_json::{Value, json};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, warn};

pub const SERVER_NAME: &str = "deeper-device-mcp-server";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PROTOCOL_VERSION: &str = "2024-11-05";

const PARSE_ERROR: i64 = -32700;
const METHOD_NOT_FOUND: i64 = -32601;

/// Serve on stdio until stdin closes.
pub async fn run_stdio<P: Prober + Send + Sync>(
    dispatcher: ToolDispatcher<P>,
) -> std::io::Result<()> {
    let reader = BufReader::new(tokio::io::stdin());
    let writer = tokio::io::stdout();
    serve(dispatcher, reader, writer).await
}

/// Process newline-delimited JSON-RPC requests from `reader` until EOF.
pub async fn serve<P, R, W>(
    mut dispatcher: ToolDispatcher<P>,
    mut reader: R,
    mut writer: W,
) -> std::io::Result<()>
where
    P: Prober + Send + Sync,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            debug!("stdin closed");
            return Ok(());
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Value>(trimmed) {
            Ok(request) => handle_message(&mut dispatcher, &request).await,
            Err(e) => Some(error_response(
                Value::Null,
                PARSE_ERROR,
                &format!("Parse error: {e}"),
            )),
        };

        if let Some(response) = response {
            write_response(&mut writer, &response).await?;
        }
    }
}

/// Handle one decoded message. Returns `None` for notifications.
pub async fn handle_message<P: Prober + Send + Sync>(
    dispatcher: &mut ToolDispatcher<P>,
    request: &Value,
) -> Option<Value> {
    let method = request.get("method").and_then(Value::as_str).unwrap_or("");

    let Some(id) = request.get("id").cloned() else {
        match method {
            "notifications/initialized" | "notifications/cancelled" => {}
            _ => warn!(method, "unknown notification"),
        }
        return None;
    };

    debug!(method, "request");
    let response = match method {
        "initialize" => result_response(id, handle_initialize()),
        "tools/list" => result_response(id, json!({ "tools": deeper_core::definitions() })),
        "tools/call" => result_response(id, handle_tools_call(dispatcher, request).await),
        "ping" => result_response(id, json!({})),
        _ => error_response(
            id,
            METHOD_NOT_FOUND,
            &format!("Method not found: {method}"),
        ),
    };
    Some(response)
}

/// `initialize`: protocol version, capabilities, server info and agent
/// instructions.
fn handle_initialize() -> Value {
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": {
            "tools": { "listChanged": false }
        },
        "serverInfo": {
            "name": SERVER_NAME,
            "version": SERVER_VERSION
        },
        "instructions": INSTRUCTIONS
    })
}

/// `tools/call`: run the tool and wrap its text as one content block.
async fn handle_tools_call<P: Prober + Send + Sync>(
    dispatcher: &mut ToolDispatcher<P>,
    request: &Value,
) -> Value {
    let params = request.get("params").cloned().unwrap_or(Value::Null);
    let name = params.get("name").and_then(Value::as_str).unwrap_or("");
    let args = params.get("arguments").cloned().unwrap_or(Value::Null);

    let output = dispatcher.call(name, args).await;
    let mut result = json!({
        "content": [{ "type": "text", "text": output.text }]
    });
    if output.is_error {
        result["isError"] = json!(true);
    }
    result
}

fn result_response(id: Value, result: Value) -> Value {
    json!({ "jsonrpc": "2.0", "id": id, "result": result })
}

fn error_response(id: Value, code: i64, message: &str) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": { "code": code, "message": message }
    })
}

/// Write one response line and flush.
async fn write_response<W: AsyncWrite + Unpin>(
    writer: &mut W,
    response: &Value,
) -> std::io::Result<()> {
    let mut output = serde_json::to_string(response)?;
    output.push('\n');
    writer.write_all(output.as_bytes()).await?;
    writer.flush().await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use deeper_api::{DeviceClient, TransportConfig};
    use deeper_core::LoginDefaults;

    use super::*;

    struct NeverUp;

    impl Prober for NeverUp {
        async fn ping(&self, _ip: &str) -> bool {
            false
        }
    }

    fn dispatcher() -> ToolDispatcher<NeverUp> {
        let url = DeviceClient::parse_base_url("127.0.0.1:9").unwrap();
        let client = DeviceClient::new(url, &TransportConfig::default()).unwrap();
        ToolDispatcher::new(client, NeverUp, LoginDefaults::default())
    }

    async fn roundtrip(input: &str) -> Vec<Value> {
        let mut out = Vec::new();
        serve(dispatcher(), input.as_bytes(), &mut out).await.unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn initialize_advertises_server_and_instructions() {
        let responses =
            roundtrip(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#).await;
        let result = &responses[0]["result"];
        assert_eq!(responses[0]["id"], 1);
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(result["serverInfo"]["name"], SERVER_NAME);
        assert!(result["instructions"].as_str().unwrap().contains("AMN"));
    }

    #[tokio::test]
    async fn notifications_get_no_response() {
        let responses = roundtrip(concat!(
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n\n",
            r#"{"jsonrpc":"2.0","id":"a","method":"ping"}"#,
            "\n"
        ))
        .await;
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0]["id"], "a");
        assert_eq!(responses[0]["result"], json!({}));
    }

    #[tokio::test]
    async fn tools_list_returns_every_tool() {
        let responses = roundtrip(r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#).await;
        let tools = responses[0]["result"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), deeper_core::definitions().len());
        assert!(tools.iter().any(|t| t["name"] == "loginToDeeperDevice"));
    }

    #[tokio::test]
    async fn tool_errors_are_flagged() {
        let responses = roundtrip(
            r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"getDpnMode","arguments":{}}}"#,
        )
        .await;
        let result = &responses[0]["result"];
        assert_eq!(result["isError"], true);
        assert_eq!(result["content"][0]["type"], "text");
        assert_eq!(
            result["content"][0]["text"],
            "Please login to Deeper device first using loginToDeeperDevice tool."
        );
    }

    #[tokio::test]
    async fn successful_tool_has_no_error_flag() {
        let responses = roundtrip(
            r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"setBaseUrl","arguments":{"baseUrl":"10.0.0.2"}}}"#,
        )
        .await;
        let result = &responses[0]["result"];
        assert!(result.get("isError").is_none());
        assert!(
            result["content"][0]["text"]
                .as_str()
                .unwrap()
                .starts_with("Base URL set to 10.0.0.2")
        );
    }

    #[tokio::test]
    async fn protocol_errors() {
        let responses = roundtrip("not json\n{\"jsonrpc\":\"2.0\",\"id\":5,\"method\":\"resources/list\"}\n").await;
        assert_eq!(responses[0]["error"]["code"], PARSE_ERROR);
        assert_eq!(responses[0]["id"], Value::Null);
        assert_eq!(responses[1]["error"]["code"], METHOD_NOT_FOUND);
        assert_eq!(responses[1]["id"], 5);
    }
}
