//! End-to-end tests for the HTTP server: checklist routes, the JSON tool
//! API and the MCP endpoint.

use ai_sdk_migration_mcp::config::Config;
use ai_sdk_migration_mcp::server::run_server;
use serde_json::{json, Value};
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

const GUIDE: &str = "\
# Guide

## Streaming

Use streamText for streaming.

## Tools

Tools use inputSchema.

### Tool Invocation Structure Changes

toolInvocation parts become typed tool parts.
";

const DATA_GUIDE: &str = "\
# Data Guide

## Phase 1: Runtime Conversion

Convert messages when reading them.

```ts
convertV4MessageToV5(row);
```
";

struct TestServer {
    _tmp: TempDir,
    base: String,
    handle: tokio::task::JoinHandle<()>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn find_free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

async fn wait_for_server(port: u16) {
    let client = reqwest::Client::new();
    let url = format!("http://127.0.0.1:{}/health", port);
    for _ in 0..50 {
        tokio::time::sleep(Duration::from_millis(100)).await;
        if let Ok(resp) = client.get(&url).send().await {
            if resp.status().is_success() {
                return;
            }
        }
    }
    panic!("Server did not become ready within 5 seconds");
}

/// Starts a server over temp guide files. `with_data_guide = false` leaves
/// the data guide missing; `conversion` configures the download file.
async fn start_server(with_data_guide: bool, conversion: Option<&str>) -> TestServer {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    let port = find_free_port();

    fs::write(root.join("guide.md"), GUIDE).unwrap();
    if with_data_guide {
        fs::write(root.join("data.md"), DATA_GUIDE).unwrap();
    }

    let mut extra = String::new();
    if let Some(body) = conversion {
        fs::write(root.join("convert-messages.ts"), body).unwrap();
        extra = format!(
            "conversion_functions = \"{}/convert-messages.ts\"\n",
            root.display()
        );
    }

    let config_content = format!(
        r#"[guides]
guide = "{root}/guide.md"
data_guide = "{root}/data.md"
{extra}
[server]
bind = "127.0.0.1:{port}"
"#,
        root = root.display(),
        extra = extra,
        port = port
    );
    let cfg: Config = toml::from_str(&config_content).unwrap();

    let handle = tokio::spawn(async move {
        run_server(&cfg).await.ok();
    });
    wait_for_server(port).await;

    TestServer {
        _tmp: tmp,
        base: format!("http://127.0.0.1:{}", port),
        handle,
    }
}

async fn call_tool(server: &TestServer, name: &str, params: Value) -> (u16, Value) {
    let resp = reqwest::Client::new()
        .post(format!("{}/tools/{}", server.base, name))
        .json(&params)
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap())
}

#[tokio::test]
async fn test_health() {
    let server = start_server(true, None).await;

    let body: Value = reqwest::get(format!("{}/health", server.base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_checklist_route() {
    let server = start_server(true, None).await;

    let resp = reqwest::get(format!("{}/api/checklist", server.base))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers()["content-type"],
        "text/markdown; charset=utf-8"
    );
    assert_eq!(resp.headers()["cache-control"], "no-cache");

    let text = resp.text().await.unwrap();
    assert!(text.starts_with("# AI SDK 5 Migration Checklist"));
    assert!(text.contains(&format!("{}/api/conversion-functions", server.base)));
}

#[tokio::test]
async fn test_conversion_functions_not_configured() {
    let server = start_server(true, None).await;

    let resp = reqwest::get(format!("{}/api/conversion-functions", server.base))
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn test_conversion_functions_download() {
    let source = "export function convertV4MessageToV5() {}\n";
    let server = start_server(true, Some(source)).await;

    let resp = reqwest::get(format!("{}/api/conversion-functions", server.base))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["content-type"], "text/plain; charset=utf-8");
    assert_eq!(
        resp.headers()["content-disposition"],
        "attachment; filename=\"convert-messages.ts\""
    );
    assert_eq!(resp.headers()["cache-control"], "public, max-age=3600");
    assert_eq!(resp.text().await.unwrap(), source);
}

#[tokio::test]
async fn test_tools_list() {
    let server = start_server(true, None).await;

    let body: Value = reqwest::get(format!("{}/tools/list", server.base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let names: Vec<&str> = body["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec!["create-checklist", "search-guide", "search-data-guide"]
    );

    let search = &body["tools"][1];
    assert_eq!(search["parameters"]["properties"]["limit"]["maximum"], 5);
    assert_eq!(search["parameters"]["required"], json!(["query"]));
}

#[tokio::test]
async fn test_search_guide_tool() {
    let server = start_server(true, None).await;

    let (status, body) = call_tool(&server, "search-guide", json!({ "query": "toolInvocation" })).await;
    assert_eq!(status, 200);

    let result = &body["result"];
    assert_eq!(result["total"], 1);
    assert_eq!(
        result["results"][0]["title"],
        "### Tool Invocation Structure Changes"
    );
    assert!(result["results"][0]["relevance"].as_u64().unwrap() >= 30);
    assert!(result["text"]
        .as_str()
        .unwrap()
        .starts_with("# Search Results for \"toolInvocation\""));
}

#[tokio::test]
async fn test_search_data_guide_tool_respects_limit() {
    let server = start_server(true, None).await;

    let (status, body) = call_tool(
        &server,
        "search-data-guide",
        json!({ "query": "convert", "limit": 1 }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["result"]["results"].as_array().unwrap().len(), 1);
    assert_eq!(
        body["result"]["results"][0]["title"],
        "## Phase 1: Runtime Conversion"
    );
}

#[tokio::test]
async fn test_whole_float_limit_accepted() {
    let server = start_server(true, None).await;

    let (status, body) = call_tool(
        &server,
        "search-data-guide",
        json!({ "query": "convert", "limit": 1.0 }),
    )
    .await;
    assert_eq!(status, 200, "body: {}", body);
    assert_eq!(body["result"]["results"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_invalid_params_are_bad_requests() {
    let server = start_server(true, None).await;

    for params in [
        json!({}),
        json!({ "query": 7 }),
        json!({ "query": "tools", "limit": 0 }),
        json!({ "query": "tools", "limit": 6 }),
        json!({ "query": "tools", "limit": "two" }),
        json!({ "query": "tools", "limit": 2.5 }),
    ] {
        let (status, body) = call_tool(&server, "search-guide", params.clone()).await;
        assert_eq!(status, 400, "params {}", params);
        assert_eq!(body["error"]["code"], "bad_request");
    }
}

#[tokio::test]
async fn test_unknown_tool_is_not_found() {
    let server = start_server(true, None).await;

    let (status, body) = call_tool(&server, "search", json!({ "query": "x" })).await;
    assert_eq!(status, 404);
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn test_missing_guide_is_unavailable() {
    let server = start_server(false, None).await;

    let (status, body) = call_tool(&server, "search-data-guide", json!({ "query": "phase" })).await;
    assert_eq!(status, 503);
    assert_eq!(body["error"]["code"], "guide_unavailable");

    // The code guide still works.
    let (status, _) = call_tool(&server, "search-guide", json!({ "query": "streaming" })).await;
    assert_eq!(status, 200);
}

#[tokio::test]
async fn test_create_checklist_tool() {
    let server = start_server(true, None).await;

    let (status, body) = call_tool(&server, "create-checklist", json!({})).await;
    assert_eq!(status, 200);
    let expected = format!("{}/api/checklist", server.base);
    assert_eq!(body["result"]["checklist_url"], expected.as_str());
    assert!(body["result"]["text"].as_str().unwrap().contains(&expected));
}

#[tokio::test]
async fn test_mcp_initialize() {
    let server = start_server(true, None).await;

    let mut resp = reqwest::Client::new()
        .post(format!("{}/api/mcp", server.base))
        .header("accept", "application/json, text/event-stream")
        .json(&json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize",
            "params": {
                "protocolVersion": "2025-03-26",
                "capabilities": {},
                "clientInfo": { "name": "integration-test", "version": "0.0.0" }
            }
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    // The reply arrives as an SSE event; read until the server info shows up.
    let mut body = String::new();
    let read = tokio::time::timeout(Duration::from_secs(5), async {
        while let Some(chunk) = resp.chunk().await.unwrap() {
            body.push_str(&String::from_utf8_lossy(&chunk));
            if body.contains("ai-sdk-5-migration") {
                break;
            }
        }
    })
    .await;
    assert!(read.is_ok(), "no initialize result within 5 seconds: {}", body);
    assert!(body.contains("ai-sdk-5-migration"), "got: {}", body);
}
