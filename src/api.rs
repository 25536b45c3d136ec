//! HTTP surface
//!
//! Thin axum handlers over [`NavigatorService`]. Handlers only translate
//! between HTTP and service calls; error kinds are mapped to status codes in
//! one place, [`ApiError`].

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};

use crate::analysis::{Definition, Reference};
use crate::config::Config;
use crate::error::{ErrorKind, NavigatorError, Result};
use crate::github::RepoId;
use crate::service::NavigatorService;
use crate::structure::{RepoStructure, TreeNode, VisualNode};

/// Content type of the context document
pub const YAML_CONTENT_TYPE: &str = "application/x-yaml";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    service: Arc<NavigatorService>,
    started_at: DateTime<Utc>,
}

impl AppState {
    /// Wraps `service` and records the start time reported by `/health`
    pub fn new(service: NavigatorService) -> Self {
        Self {
            service: Arc::new(service),
            started_at: Utc::now(),
        }
    }
}

/// Error wrapper rendering `{"error": {"message", "type"}}`
#[derive(Debug)]
pub struct ApiError(pub NavigatorError);

impl ApiError {
    /// Status code for an error kind
    pub fn status_for(kind: ErrorKind) -> StatusCode {
        match kind {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::ProviderError | ErrorKind::ExternalApiError => StatusCode::BAD_GATEWAY,
            ErrorKind::NotAFile
            | ErrorKind::UnsupportedFileType
            | ErrorKind::ParseError
            | ErrorKind::ValidationError => StatusCode::BAD_REQUEST,
            ErrorKind::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<NavigatorError> for ApiError {
    fn from(err: NavigatorError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        let status = Self::status_for(kind);
        let message = self.0.to_string();
        if status.is_server_error() {
            error!(kind = %kind, "{}", message);
        } else {
            warn!(kind = %kind, "{}", message);
        }

        let body = json!({
            "error": {
                "message": message,
                "type": kind.as_str(),
            }
        });
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = std::result::Result<T, ApiError>;

/// Query of the single-file endpoints
#[derive(Debug, Deserialize)]
pub struct FileQuery {
    /// Repository-relative file path; required
    pub path: Option<String>,
}

/// Query of the references endpoint
#[derive(Debug, Deserialize)]
pub struct ReferenceQuery {
    /// Repository-relative path of a `.py` file; required
    pub path: Option<String>,
    /// Text to search for; required and non-empty
    pub symbol: Option<String>,
}

/// Body of `POST /ai/test-summarization`
#[derive(Debug, Serialize, Deserialize)]
pub struct SummarizationRequest {
    /// Prompt forwarded verbatim to the AI provider
    pub prompt: String,
}

/// Body of `POST /ai/summarize-file`
#[derive(Debug, Serialize, Deserialize)]
pub struct FileSummarizationRequest {
    /// Repository owner
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Repository-relative path of the file to summarize
    pub path: String,
}

/// Answer of both summary endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryResponse {
    /// Text returned by the AI provider
    pub summary: String,
}

/// Answer of `GET /repo/:owner/:repo/definitions`
#[derive(Debug, Serialize, Deserialize)]
pub struct DefinitionsResponse {
    /// Path as requested
    pub path: String,
    /// Definitions in source order
    pub definitions: Vec<Definition>,
}

/// Answer of `GET /repo/:owner/:repo/references`
#[derive(Debug, Serialize, Deserialize)]
pub struct ReferencesResponse {
    /// Path as requested
    pub path: String,
    /// Searched text
    pub symbol: String,
    /// Matching lines in file order
    pub references: Vec<Reference>,
}

/// Builds the router with CORS restricted to `allowed_origin`
pub fn create_app(state: AppState, allowed_origin: &str) -> Result<Router> {
    let origin = HeaderValue::from_str(allowed_origin).map_err(|e| {
        NavigatorError::Config(format!("invalid allowed origin {:?}: {}", allowed_origin, e))
    })?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any);

    Ok(Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/repo/:owner/:repo/files", get(repo_files))
        .route(
            "/repo/:owner/:repo/structure-visualization",
            get(structure_visualization),
        )
        .route("/repo/:owner/:repo/file-content", get(file_content))
        .route("/repo/:owner/:repo/definitions", get(definitions))
        .route("/repo/:owner/:repo/references", get(references))
        .route("/repo/:owner/:repo/yaml-context", get(yaml_context))
        .route("/ai/test-summarization", post(test_summarization))
        .route("/ai/summarize-file", post(summarize_file))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Binds the configured address and serves until Ctrl-C
pub async fn serve(config: &Config) -> Result<()> {
    let addr = config.bind_addr()?;
    let service = NavigatorService::from_config(config)?;
    let app = create_app(AppState::new(service), &config.server.allowed_origin)?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on http://{}", addr);
    info!("Allowed origin: {}", config.server.allowed_origin);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

fn required(value: Option<String>, name: &str) -> Result<String> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(NavigatorError::Validation(format!("missing query parameter '{}'", name))),
    }
}

/// Turns a body rejection into a `ValidationError` with the standard error body
fn json_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| NavigatorError::Validation(rejection.body_text()))
}

async fn index() -> Json<Value> {
    Json(json!({ "message": "Hello, World!" }))
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let now = Utc::now();
    Json(json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "status": "healthy",
        "timestamp": now.to_rfc3339(),
        "uptime": (now - state.started_at).num_seconds(),
    }))
}

async fn repo_files(
    State(state): State<AppState>,
    Path((owner, repo)): Path<(String, String)>,
) -> ApiResult<Json<RepoStructure<TreeNode>>> {
    let repo = RepoId::new(&owner, &repo)?;
    Ok(Json(state.service.file_structure(&repo).await?))
}

async fn structure_visualization(
    State(state): State<AppState>,
    Path((owner, repo)): Path<(String, String)>,
) -> ApiResult<Json<RepoStructure<VisualNode>>> {
    let repo = RepoId::new(&owner, &repo)?;
    Ok(Json(state.service.structure_visualization(&repo).await?))
}

async fn file_content(
    State(state): State<AppState>,
    Path((owner, repo)): Path<(String, String)>,
    Query(query): Query<FileQuery>,
) -> ApiResult<Response> {
    let repo = RepoId::new(&owner, &repo)?;
    let path = required(query.path, "path")?;
    let content = state.service.file_content(&repo, &path).await?;
    let content_type = match std::str::from_utf8(&content) {
        Ok(_) => "text/plain; charset=utf-8",
        Err(_) => "text/plain",
    };
    Ok(([(header::CONTENT_TYPE, content_type)], content).into_response())
}

async fn definitions(
    State(state): State<AppState>,
    Path((owner, repo)): Path<(String, String)>,
    Query(query): Query<FileQuery>,
) -> ApiResult<Json<DefinitionsResponse>> {
    let repo = RepoId::new(&owner, &repo)?;
    let path = required(query.path, "path")?;
    let definitions = state.service.definitions(&repo, &path).await?;
    Ok(Json(DefinitionsResponse { path, definitions }))
}

async fn references(
    State(state): State<AppState>,
    Path((owner, repo)): Path<(String, String)>,
    Query(query): Query<ReferenceQuery>,
) -> ApiResult<Json<ReferencesResponse>> {
    let repo = RepoId::new(&owner, &repo)?;
    let path = required(query.path, "path")?;
    let symbol = required(query.symbol, "symbol")?;
    let references = state.service.references(&repo, &path, &symbol).await?;
    Ok(Json(ReferencesResponse {
        path,
        symbol,
        references,
    }))
}

async fn yaml_context(
    State(state): State<AppState>,
    Path((owner, repo)): Path<(String, String)>,
) -> ApiResult<Response> {
    let repo = RepoId::new(&owner, &repo)?;
    let yaml = state.service.context_yaml(&repo).await?;
    Ok(([(header::CONTENT_TYPE, YAML_CONTENT_TYPE)], yaml).into_response())
}

async fn test_summarization(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SummarizationRequest>, JsonRejection>,
) -> ApiResult<Json<SummaryResponse>> {
    let request = json_body(payload)?;
    let summary = state.service.summarize(&request.prompt).await?;
    Ok(Json(SummaryResponse { summary }))
}

async fn summarize_file(
    State(state): State<AppState>,
    payload: std::result::Result<Json<FileSummarizationRequest>, JsonRejection>,
) -> ApiResult<Json<SummaryResponse>> {
    let request = json_body(payload)?;
    let repo = RepoId::new(&request.owner, &request.repo)?;
    let summary = state.service.summarize_file(&repo, &request.path).await?;
    Ok(Json(SummaryResponse { summary }))
}
