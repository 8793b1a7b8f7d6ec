//! HTTP server implementation using Axum
//!
//! Routes:
//! - POST   /strings                              analyze and store
//! - GET    /strings                              structured filtering
//! - GET    /strings/filter-by-natural-language   free-text filtering
//! - GET    /strings/{value}                      lookup by exact value
//! - DELETE /strings/{value}                      delete by exact value

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Json, Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::{AnalyzerError, Result};
use crate::filter::{FilterConfig, FilterParams, FilterSet};
use crate::service::{CreateRequest, StringService};
use crate::storage::{StorageConfig, StringStore};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Storage configuration
    pub storage: StorageConfig,
    /// Filter engine configuration
    pub filter: FilterConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            storage: StorageConfig::default(),
            filter: FilterConfig::default(),
        }
    }
}

/// Shared server state
pub struct ServerState {
    service: StringService,
}

impl ServerState {
    /// Create new server state
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let store = Arc::new(StringStore::new(config.storage.clone()));
        let service = StringService::new(store, config.filter.clone())?;
        Ok(Self { service })
    }

    pub fn service(&self) -> &StringService {
        &self.service
    }
}

/// String analyzer HTTP server
pub struct ApiServer {
    config: ServerConfig,
    state: Arc<ServerState>,
}

impl ApiServer {
    /// Create a new server
    pub fn new(config: ServerConfig) -> Result<Self> {
        let state = Arc::new(ServerState::new(&config)?);
        Ok(Self { config, state })
    }

    /// Create with default configuration
    pub fn with_defaults() -> Result<Self> {
        Self::new(ServerConfig::default())
    }

    /// Build the router
    pub fn router(&self) -> Router {
        router(self.state.clone())
    }

    /// Run the server
    pub async fn run(&self) -> Result<()> {
        let addr = self.address();
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        tracing::info!("String analyzer listening on {}", addr);

        axum::serve(listener, self.router())
            .await
            .map_err(|e| AnalyzerError::Internal(e.to_string()))?;

        Ok(())
    }

    /// Get server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }
}

/// Build the application router over shared state
pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/strings", get(list_strings).post(create_string))
        .route(
            "/strings/filter-by-natural-language",
            get(filter_by_natural_language),
        )
        .route("/strings/{value}", get(get_string).delete(delete_string))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

impl IntoResponse for AnalyzerError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidInput(_) | Self::UnparsableQuery(_) => StatusCode::BAD_REQUEST,
            Self::InvalidType(_) | Self::ConflictingFilters(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Duplicate(_) => StatusCode::CONFLICT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Io(_) | Self::Config(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
        }

        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct NaturalLanguageParams {
    query: String,
}

/// Health check endpoint
async fn health(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    let stats = state.service.stats().await;
    Json(json!({
        "status": "ok",
        "server": "string-analyzer",
        "version": env!("CARGO_PKG_VERSION"),
        "entries": stats.entries,
    }))
}

/// POST /strings
async fn create_string(
    State(state): State<Arc<ServerState>>,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(body) = body.map_err(|e| AnalyzerError::InvalidInput(e.body_text()))?;
    let request = CreateRequest::from_json(body)?;
    let entry = state.service.create(request).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// GET /strings
async fn list_strings(
    State(state): State<Arc<ServerState>>,
    params: std::result::Result<Query<FilterParams>, QueryRejection>,
) -> Result<impl IntoResponse> {
    let Query(params) = params.map_err(|e| AnalyzerError::InvalidInput(e.body_text()))?;
    let filters = FilterSet::try_from(params)?;
    Ok(Json(state.service.list(filters).await))
}

/// GET /strings/filter-by-natural-language
async fn filter_by_natural_language(
    State(state): State<Arc<ServerState>>,
    params: std::result::Result<Query<NaturalLanguageParams>, QueryRejection>,
) -> Result<impl IntoResponse> {
    let Query(params) = params.map_err(|e| AnalyzerError::InvalidInput(e.body_text()))?;
    let result = state.service.query_by_text(&params.query).await?;
    Ok(Json(result))
}

/// GET /strings/{value}
async fn get_string(
    State(state): State<Arc<ServerState>>,
    Path(value): Path<String>,
) -> Result<impl IntoResponse> {
    Ok(Json(state.service.get_by_value(&value).await?))
}

/// DELETE /strings/{value}
async fn delete_string(
    State(state): State<Arc<ServerState>>,
    Path(value): Path<String>,
) -> Result<impl IntoResponse> {
    state.service.delete_by_value(&value).await?;
    Ok(StatusCode::NO_CONTENT)
}
