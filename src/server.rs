//! Transports.
//!
//! * [`run_stdio`]: MCP over stdin/stdout (JSON-RPC). Logs go to stderr.
//! * [`run_http`]: an Axum server exposing MCP Streamable HTTP plus a
//!   small JSON API over the same dispatcher.
//!
//! # HTTP endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `*`    | `/mcp` | MCP Streamable HTTP endpoint |
//! | `GET`  | `/tools/list` | List tools with their argument schemas |
//! | `POST` | `/tools/{name}` | Call a tool with a JSON object body |
//! | `GET`  | `/health` | Status, version, and data mode |
//!
//! # Error contract
//!
//! ```json
//! { "error": { "code": "invalid_airport_code", "message": "..." } }
//! ```
//!
//! | Code | Status |
//! |------|--------|
//! | `validation_error`, `invalid_airport_code`, `invalid_date_format` | 400 |
//! | `not_found`, `flight_not_found`, `airline_not_found` | 404 |
//! | `api_rate_limit` | 429 |
//! | `api_unavailable`, `network_error` | 502 |
//! | `general_error`, `internal` | 500 |
//!
//! All origins, methods, and headers are permitted.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use rmcp::transport::streamable_http_server::{
    session::local::LocalSessionManager, StreamableHttpServerConfig, StreamableHttpService,
};
use rmcp::ServiceExt;
use serde::Serialize;
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};

use crate::dispatch::Dispatcher;
use crate::mcp::McpBridge;
use crate::tools::ToolInfo;

/// Serve MCP over stdio until the client disconnects.
pub async fn run_stdio(dispatcher: Dispatcher) -> anyhow::Result<()> {
    tracing::info!(mode = %dispatcher.mode(), "serving MCP over stdio");
    let service = McpBridge::new(dispatcher)
        .serve(rmcp::transport::stdio())
        .await?;
    let reason = service.waiting().await?;
    tracing::info!(?reason, "MCP session ended");
    Ok(())
}

/// Build the HTTP router. Exposed for in-process tests.
pub fn router(dispatcher: Dispatcher) -> Router {
    let bridge = McpBridge::new(dispatcher.clone());
    let mcp_service = StreamableHttpService::new(
        move || Ok(bridge.clone()),
        LocalSessionManager::default().into(),
        StreamableHttpServerConfig::default(),
    );

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/tools/list", get(handle_list_tools))
        .route("/tools/{name}", post(handle_tool_call))
        .route("/health", get(handle_health))
        .nest_service("/mcp", mcp_service)
        .layer(cors)
        .with_state(dispatcher)
}

/// Bind `bind` and serve until the process is terminated.
pub async fn run_http(dispatcher: Dispatcher, bind: &str) -> anyhow::Result<()> {
    let mode = dispatcher.mode();
    let app = router(dispatcher);
    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!(%mode, "listening on http://{}", listener.local_addr()?);
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

struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl AppError {
    fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            status: status_for(code),
            code: code.to_string(),
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

/// HTTP status for an error code.
pub fn status_for(code: &str) -> StatusCode {
    match code {
        "validation_error" | "invalid_airport_code" | "invalid_date_format" | "bad_request" => {
            StatusCode::BAD_REQUEST
        }
        "not_found" | "flight_not_found" | "airline_not_found" => StatusCode::NOT_FOUND,
        "api_rate_limit" => StatusCode::TOO_MANY_REQUESTS,
        "api_unavailable" | "network_error" => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    mode: &'static str,
}

async fn handle_health(State(dispatcher): State<Dispatcher>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        mode: dispatcher.mode().as_str(),
    })
}

// ============ GET /tools/list ============

#[derive(Serialize)]
struct ToolListResponse {
    tools: Vec<ToolInfo>,
}

async fn handle_list_tools(State(dispatcher): State<Dispatcher>) -> Json<ToolListResponse> {
    Json(ToolListResponse {
        tools: dispatcher.tools(),
    })
}

// ============ POST /tools/{name} ============

/// An empty body is an empty argument object; anything else must be a JSON object.
async fn handle_tool_call(
    State(dispatcher): State<Dispatcher>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    if !dispatcher.has_tool(&name) {
        return Err(AppError::new(
            "not_found",
            format!("no tool registered with name: {}", name),
        ));
    }

    let params = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Object(serde_json::Map::new())
    } else {
        serde_json::from_slice::<Value>(&body)
            .map_err(|e| AppError::new("bad_request", format!("invalid JSON body: {}", e)))?
    };
    if !params.is_object() {
        return Err(AppError::new(
            "bad_request",
            "request body must be a JSON object",
        ));
    }

    let reply = dispatcher.call(&name, params).await;
    match reply.code {
        Some(code) if reply.is_error => Err(AppError::new(code, reply.text)),
        _ => Ok(Json(serde_json::json!({
            "result": reply.text,
            "mode": dispatcher.mode().as_str(),
        }))),
    }
}
