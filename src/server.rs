//! HTTP server: checklist downloads, JSON tool API and MCP endpoint.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/api/checklist` | Generated migration checklist (markdown) |
//! | `GET`  | `/api/conversion-functions` | Message conversion functions download |
//! | `*`    | `/api/mcp` | MCP Streamable HTTP endpoint |
//! | `GET`  | `/tools/list` | List all tools with schemas |
//! | `POST` | `/tools/{name}` | Call a tool by name |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "missing required parameter: query" } }
//! ```
//!
//! Error codes: `bad_request` (400), `not_found` (404),
//! `guide_unavailable` (503), `tool_error` (500).
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so browser-based MCP
//! clients can connect.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use rmcp::transport::streamable_http_server::{
    session::local::LocalSessionManager, StreamableHttpServerConfig, StreamableHttpService,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tower_http::cors::{Any, CorsLayer};

use crate::checklist::{generate_checklist, today, CHECKLIST_ROUTE, CONVERSION_FUNCTIONS_ROUTE};
use crate::config::Config;
use crate::guide::{GuideError, GuideStore};
use crate::mcp::McpBridge;
use crate::traits::{validate_params, ToolContext, ToolInfo, ToolRegistry};

/// Path the MCP service is mounted under.
pub const MCP_ROUTE: &str = "/api/mcp";

/// Shared application state passed to all route handlers.
#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
    store: Arc<GuideStore>,
    tools: Arc<ToolRegistry>,
    conversion_functions: Arc<OnceCell<Arc<str>>>,
}

/// Build the full router over an existing guide store.
///
/// Split from [`run_server`] so tests can serve a store backed by an
/// in-memory loader.
pub fn build_router(config: Arc<Config>, store: Arc<GuideStore>) -> Router {
    let tools = Arc::new(ToolRegistry::with_builtins(&config.search));

    let bridge = McpBridge::new(config.clone(), store.clone(), tools.clone());
    let mcp_service = StreamableHttpService::new(
        move || Ok(bridge.clone()),
        LocalSessionManager::default().into(),
        StreamableHttpServerConfig::default(),
    );

    let state = AppState {
        config,
        store,
        tools,
        conversion_functions: Arc::new(OnceCell::new()),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(CHECKLIST_ROUTE, get(handle_checklist))
        .route(CONVERSION_FUNCTIONS_ROUTE, get(handle_conversion_functions))
        .route("/tools/list", get(handle_list_tools))
        .route("/tools/{name}", post(handle_tool_call))
        .route("/health", get(handle_health))
        .nest_service(MCP_ROUTE, mcp_service)
        .layer(cors)
        .with_state(state)
}

/// Starts the HTTP + MCP server on `[server].bind`.
///
/// With `guides.preload` set, both guides are read before the listener is
/// bound and a missing guide aborts startup. Otherwise guides load on the
/// first search.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let config = Arc::new(config.clone());
    let store = Arc::new(GuideStore::from_config(&config.guides));

    if config.guides.preload {
        store.preload().await?;
    }

    let app = build_router(config.clone(), store);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(
        bind = %bind_addr,
        base_url = %config.server.base_url(),
        "migration server listening"
    );
    println!("Migration MCP server listening on http://{}", bind_addr);
    println!("  MCP endpoint: {}{}", config.server.base_url(), MCP_ROUTE);

    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Error type that converts into the JSON error envelope.
struct AppError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code.to_string(),
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request",
        message: message.into(),
    }
}

fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found",
        message: message.into(),
    }
}

fn guide_unavailable(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::SERVICE_UNAVAILABLE,
        code: "guide_unavailable",
        message: message.into(),
    }
}

fn tool_error(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "tool_error",
        message: message.into(),
    }
}

/// Maps a tool execution failure to a status code. A guide that could not
/// be read is a 503, everything else a 500.
fn classify_tool_error(tool_name: &str, err: anyhow::Error) -> AppError {
    let message = format!("{}: {}", tool_name, err);
    if err.downcast_ref::<GuideError>().is_some() {
        tracing::error!(tool = tool_name, error = %err, "guide unavailable");
        guide_unavailable(message)
    } else {
        tracing::error!(tool = tool_name, error = %err, "tool failed");
        tool_error(message)
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET /api/checklist ============

/// Freshly rendered on every request so the date stays current.
async fn handle_checklist(State(state): State<AppState>) -> Response {
    let body = generate_checklist(&state.config.server.base_url(), today());
    (
        [
            (header::CONTENT_TYPE, "text/markdown; charset=utf-8"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        body,
    )
        .into_response()
}

// ============ GET /api/conversion-functions ============

async fn handle_conversion_functions(State(state): State<AppState>) -> Result<Response, AppError> {
    let Some(path) = state.config.guides.conversion_functions.clone() else {
        return Err(not_found("conversion functions are not configured"));
    };

    let read_path = path.clone();
    let body = state
        .conversion_functions
        .get_or_try_init(|| async move {
            tokio::fs::read_to_string(read_path)
                .await
                .map(Arc::<str>::from)
        })
        .await
        .map_err(|e| {
            tracing::error!(path = %path.display(), error = %e, "conversion functions unreadable");
            not_found(format!(
                "conversion functions unavailable: {}: {}",
                path.display(),
                e
            ))
        })?
        .to_string();

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"convert-messages.ts\"",
            ),
            (header::CACHE_CONTROL, "public, max-age=3600"),
        ],
        body,
    )
        .into_response())
}

// ============ GET /tools/list ============

#[derive(Serialize)]
struct ToolListResponse {
    tools: Vec<ToolInfo>,
}

async fn handle_list_tools(State(state): State<AppState>) -> Json<ToolListResponse> {
    let tools = state
        .tools
        .tools()
        .iter()
        .map(|t| ToolInfo::from_tool(t.as_ref()))
        .collect();
    Json(ToolListResponse { tools })
}

// ============ POST /tools/{name} ============

/// Validates parameters against the tool's schema, then executes it.
///
/// Returns `404` for unknown tools, `400` for invalid parameters, `503`
/// when a guide cannot be loaded and `500` for other failures.
async fn handle_tool_call(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(params): Json<serde_json::Value>,
) -> Result<Json<serde_json::Value>, AppError> {
    let tool = state
        .tools
        .find(&name)
        .ok_or_else(|| not_found(format!("no tool registered with name: {}", name)))?;

    let params = validate_params(&tool.parameters_schema(), &params)
        .map_err(|e| bad_request(e.to_string()))?;

    let ctx = ToolContext::new(state.config.clone(), state.store.clone());
    let result = tool
        .execute(params, &ctx)
        .await
        .map_err(|e| classify_tool_error(&name, e))?;

    Ok(Json(serde_json::json!({ "result": result })))
}
