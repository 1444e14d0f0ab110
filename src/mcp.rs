//! MCP JSON-RPC protocol bridge.
//!
//! Adapts the [`ToolRegistry`] to the MCP Streamable HTTP transport served
//! at `/api/mcp`. Tool calls go through the same parameter validation as
//! `POST /tools/{name}`; tools that return a `"text"` field answer with
//! that text, anything else is returned as pretty-printed JSON.

use std::borrow::Cow;
use std::sync::Arc;

use rmcp::model::*;
use rmcp::{ErrorData as McpError, ServerHandler};

use crate::config::Config;
use crate::guide::GuideStore;
use crate::traits::{validate_params, ToolContext, ToolRegistry};

/// Server name announced in the MCP handshake.
pub const SERVER_NAME: &str = "ai-sdk-5-migration";

/// Bridges the tool registry to the MCP JSON-RPC protocol.
///
/// Each MCP session receives a clone of this struct (everything is
/// behind `Arc`), so all sessions share the same tools and guide cache.
#[derive(Clone)]
pub struct McpBridge {
    config: Arc<Config>,
    store: Arc<GuideStore>,
    tools: Arc<ToolRegistry>,
}

impl McpBridge {
    pub fn new(config: Arc<Config>, store: Arc<GuideStore>, tools: Arc<ToolRegistry>) -> Self {
        Self {
            config,
            store,
            tools,
        }
    }

    /// Convert a registry tool into an rmcp `Tool` descriptor.
    fn to_mcp_tool(tool: &dyn crate::traits::Tool) -> Tool {
        let input_schema: Arc<serde_json::Map<String, serde_json::Value>> =
            match tool.parameters_schema() {
                serde_json::Value::Object(map) => Arc::new(map),
                _ => Arc::new(serde_json::Map::new()),
            };

        Tool {
            name: Cow::Owned(tool.name().to_string()),
            title: None,
            description: Some(Cow::Owned(tool.description().to_string())),
            input_schema,
            output_schema: None,
            annotations: Some(ToolAnnotations::new().read_only(true)),
            execution: None,
            icons: None,
            meta: None,
        }
    }
}

/// Text sent back to the MCP client for a tool result.
fn result_text(result: &serde_json::Value) -> String {
    match result.get("text").and_then(|t| t.as_str()) {
        Some(text) => text.to_string(),
        None => serde_json::to_string_pretty(result).unwrap_or_default(),
    }
}

impl ServerHandler for McpBridge {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                title: Some("AI SDK 5 Migration".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                description: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Helps migrate projects from AI SDK 4 to AI SDK 5. Call create-checklist to \
                 set up a migration checklist, search-guide for code changes, and \
                 search-data-guide for migrating stored messages."
                    .to_string(),
            ),
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        let tools: Vec<Tool> = self
            .tools
            .tools()
            .iter()
            .map(|t| Self::to_mcp_tool(t.as_ref()))
            .collect();
        std::future::ready(Ok(ListToolsResult::with_all_items(tools)))
    }

    fn get_tool(&self, name: &str) -> Option<Tool> {
        self.tools.find(name).map(Self::to_mcp_tool)
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let tool = self.tools.find(&request.name).ok_or_else(|| {
            McpError::new(
                ErrorCode::METHOD_NOT_FOUND,
                format!("no tool registered with name: {}", request.name),
                None,
            )
        })?;

        let params = request
            .arguments
            .map(serde_json::Value::Object)
            .unwrap_or(serde_json::Value::Object(serde_json::Map::new()));

        let params = validate_params(&tool.parameters_schema(), &params)
            .map_err(|e| McpError::invalid_params(e.to_string(), None))?;

        let ctx = ToolContext::new(self.config.clone(), self.store.clone());
        match tool.execute(params, &ctx).await {
            Ok(result) => Ok(CallToolResult::success(vec![Content::text(result_text(
                &result,
            ))])),
            Err(e) => {
                tracing::warn!(tool = %request.name, error = %e, "mcp tool call failed");
                Ok(CallToolResult::error(vec![Content::text(e.to_string())]))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchConfig;
    use serde_json::json;

    fn bridge() -> McpBridge {
        let config = Arc::new(Config::minimal());
        let store = Arc::new(GuideStore::from_config(&config.guides));
        let tools = Arc::new(ToolRegistry::with_builtins(&SearchConfig::default()));
        McpBridge::new(config, store, tools)
    }

    #[test]
    fn test_server_info() {
        let info = bridge().get_info();
        assert_eq!(info.server_info.name, "ai-sdk-5-migration");
        assert_eq!(info.server_info.version, env!("CARGO_PKG_VERSION"));
        assert!(info.capabilities.tools.is_some());
    }

    #[test]
    fn test_get_tool_exposes_schema() {
        let tool = bridge().get_tool("search-data-guide").unwrap();
        assert_eq!(tool.name, "search-data-guide");
        assert_eq!(tool.input_schema["required"], json!(["query"]));
        assert!(bridge().get_tool("missing").is_none());
    }

    #[test]
    fn test_result_text_prefers_text_field() {
        assert_eq!(result_text(&json!({ "text": "hello", "total": 1 })), "hello");
        assert!(result_text(&json!({ "total": 1 })).contains("\"total\": 1"));
    }
}
