//! Tool trait and registry.
//!
//! Every operation an agent can invoke is a [`Tool`]. The same
//! [`ToolRegistry`] backs both the JSON tool API (`GET /tools/list`,
//! `POST /tools/{name}`) and the MCP endpoint, so the two surfaces always
//! expose identical tools with identical schemas.
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │              ToolRegistry                │
//! │  ┌──────────────┐ ┌───────────────────┐  │
//! │  │create-       │ │search-guide       │  │
//! │  │checklist     │ │search-data-guide  │  │
//! │  └──────────────┘ └───────────────────┘  │
//! └──────────────┬───────────────────────────┘
//!                ▼
//!     /tools/{name}  and  /api/mcp
//! ```

use anyhow::{bail, Result};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

use guide_search_core::GuideCorpus;

use crate::checklist::{create_checklist_instructions, CHECKLIST_FILE, CHECKLIST_ROUTE};
use crate::config::{Config, SearchConfig};
use crate::guide::GuideStore;
use crate::search::format_search_response;

/// An operation agents can discover and call.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Route and MCP name, e.g. `"search-guide"`.
    fn name(&self) -> &str;

    /// One-line description for agent discovery.
    fn description(&self) -> &str;

    /// JSON Schema of the parameters (`type: "object"`).
    fn parameters_schema(&self) -> Value;

    /// Run the tool. `params` has already passed [`validate_params`], so
    /// required fields exist and defaults are filled in.
    ///
    /// Tools that produce prose put it under a `"text"` key; the MCP
    /// bridge returns that string verbatim.
    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<Value>;
}

/// Shared state handed to every tool invocation.
pub struct ToolContext {
    pub config: Arc<Config>,
    pub store: Arc<GuideStore>,
}

impl ToolContext {
    pub fn new(config: Arc<Config>, store: Arc<GuideStore>) -> Self {
        Self { config, store }
    }
}

/// Tool description as listed by `GET /tools/list`.
#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl ToolInfo {
    pub fn from_tool(tool: &dyn Tool) -> Self {
        Self {
            name: tool.name().to_string(),
            description: tool.description().to_string(),
            parameters: tool.parameters_schema(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Built-in tools
// ═══════════════════════════════════════════════════════════════════════

/// Tells the agent how to download the migration checklist into the
/// user's project.
pub struct CreateChecklistTool;

#[async_trait]
impl Tool for CreateChecklistTool {
    fn name(&self) -> &str {
        "create-checklist"
    }

    fn description(&self) -> &str {
        "Creates an AI SDK 5 migration checklist file in the user's project by fetching it \
         from the API. Check if AI_SDK_5_MIGRATION.md exists first - if it does, ask the \
         user before overwriting."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _params: Value, ctx: &ToolContext) -> Result<Value> {
        let api_url = format!("{}{}", ctx.config.server.base_url(), CHECKLIST_ROUTE);
        Ok(json!({
            "text": create_checklist_instructions(&api_url),
            "checklist_url": api_url,
            "file": CHECKLIST_FILE,
        }))
    }
}

/// Ranked section search over one guide corpus.
pub struct GuideSearchTool {
    corpus: GuideCorpus,
    limits: SearchConfig,
}

impl GuideSearchTool {
    pub fn new(corpus: GuideCorpus, limits: SearchConfig) -> Self {
        Self { corpus, limits }
    }
}

#[async_trait]
impl Tool for GuideSearchTool {
    fn name(&self) -> &str {
        match self.corpus {
            GuideCorpus::Guide => "search-guide",
            GuideCorpus::DataGuide => "search-data-guide",
        }
    }

    fn description(&self) -> &str {
        match self.corpus {
            GuideCorpus::Guide => {
                "Search the AI SDK 5 migration guide for specific information about changes, \
                 APIs, or patterns. Returns relevant sections from the official migration guide."
            }
            GuideCorpus::DataGuide => {
                "Search the AI SDK 5 data migration guide for information about migrating \
                 persisted messages, database schemas, and conversion functions."
            }
        }
    }

    fn parameters_schema(&self) -> Value {
        let examples = match self.corpus {
            GuideCorpus::Guide => {
                "What to search for (e.g., \"useChat\", \"maxSteps\", \"tools\", \"message structure\", \"streaming\")"
            }
            GuideCorpus::DataGuide => {
                "What to search for (e.g., \"Phase 1\", \"conversion functions\", \"dual write\", \"database\")"
            }
        };
        json!({
            "type": "object",
            "properties": {
                "query": { "type": "string", "description": examples },
                "limit": {
                    "type": "integer",
                    "description": "Maximum number of results to return",
                    "minimum": 1,
                    "maximum": self.limits.max_limit,
                    "default": self.limits.default_limit
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<Value> {
        let query = params["query"].as_str().unwrap_or("");
        let limit = self
            .limits
            .clamp_limit(params["limit"].as_u64().map(|n| n as usize));

        let results = ctx.store.search(self.corpus, query).await?;
        tracing::debug!(corpus = %self.corpus, query, hits = results.len(), "tool search");

        let text = format_search_response(self.corpus, query, &results, limit);
        let total = results.len();
        let shown: Vec<_> = results.into_iter().take(limit).collect();

        Ok(json!({
            "text": text,
            "total": total,
            "results": shown,
        }))
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Registry
// ═══════════════════════════════════════════════════════════════════════

/// Ordered set of tools served by the HTTP and MCP surfaces.
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Registry holding `create-checklist`, `search-guide` and
    /// `search-data-guide`.
    pub fn with_builtins(search: &SearchConfig) -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(CreateChecklistTool));
        for corpus in GuideCorpus::ALL {
            registry.register(Box::new(GuideSearchTool::new(corpus, search.clone())));
        }
        registry
    }

    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.push(tool);
    }

    pub fn tools(&self) -> &[Box<dyn Tool>] {
        &self.tools
    }

    pub fn find(&self, name: &str) -> Option<&dyn Tool> {
        self.tools
            .iter()
            .find(|t| t.name() == name)
            .map(|t| t.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Parameter validation
// ═══════════════════════════════════════════════════════════════════════

/// Validate call parameters against a tool's schema.
///
/// Checks required fields, JSON types and integer bounds (`minimum` /
/// `maximum`), and fills in `default` values for absent optional fields.
/// A non-object `params` is treated as `{}`.
pub fn validate_params(schema: &Value, params: &Value) -> Result<Value> {
    let params_obj = params.as_object().cloned().unwrap_or_default();

    let properties = schema
        .get("properties")
        .and_then(|p| p.as_object())
        .cloned()
        .unwrap_or_default();

    let required: Vec<&str> = schema
        .get("required")
        .and_then(|r| r.as_array())
        .map(|arr| arr.iter().filter_map(|v| v.as_str()).collect())
        .unwrap_or_default();

    for field in &required {
        if !params_obj.contains_key(*field) {
            bail!("missing required parameter: {}", field);
        }
    }

    let mut result = params_obj.clone();

    for (name, prop) in &properties {
        let Some(raw) = params_obj.get(name) else {
            if let Some(default) = prop.get("default") {
                result.insert(name.clone(), default.clone());
            }
            continue;
        };

        let expected = prop.get("type").and_then(|t| t.as_str());

        // Whole-valued floats such as `3.0` count as integers.
        let whole = match expected {
            Some("integer") => whole_number(raw),
            _ => None,
        };
        if let Some(n) = &whole {
            result.insert(name.clone(), n.clone());
        }
        let value = whole.as_ref().unwrap_or(raw);

        if let Some(expected) = expected {
            let type_ok = match expected {
                "string" => value.is_string(),
                "integer" => value.is_i64() || value.is_u64(),
                "number" => value.is_number(),
                "boolean" => value.is_boolean(),
                "array" => value.is_array(),
                "object" => value.is_object(),
                _ => true,
            };
            if !type_ok {
                bail!(
                    "parameter '{}' must be of type '{}', got {}",
                    name,
                    expected,
                    json_type_name(value)
                );
            }
        }

        if let Some(n) = value.as_i64() {
            if let Some(min) = prop.get("minimum").and_then(|m| m.as_i64()) {
                if n < min {
                    bail!("parameter '{}' must be >= {}, got {}", name, min, n);
                }
            }
            if let Some(max) = prop.get("maximum").and_then(|m| m.as_i64()) {
                if n > max {
                    bail!("parameter '{}' must be <= {}, got {}", name, max, n);
                }
            }
        }
    }

    Ok(Value::Object(result))
}

/// `3.0` becomes `3`; integers and fractional numbers are left alone.
fn whole_number(value: &Value) -> Option<Value> {
    if value.is_i64() || value.is_u64() {
        return None;
    }
    let f = value.as_f64()?;
    if f.fract() != 0.0 || f < i64::MIN as f64 || f > i64::MAX as f64 {
        return None;
    }
    Some(Value::from(f as i64))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
