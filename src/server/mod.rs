//! HTTP API for recap
//!
//! Exposes summarization, recommendation, health, and stats endpoints over
//! JSON. Summaries are cached in memory keyed on the normalized message.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::cache::{CachedSummary, SummaryCache};
use crate::config::Settings;
use crate::llm::LlmProvider;
use crate::recommend;

const SUMMARIZE_PATH: &str = "/v1/summarize";
const RECOMMEND_PATH: &str = "/v1/recommend";
const HEALTHZ_PATH: &str = "/v1/healthz";
const STATS_PATH: &str = "/v1/stats";

pub type DynLlmProvider = Arc<dyn LlmProvider>;
pub type ApiStateHandle = Arc<ApiState>;

/// Shared state behind the API handlers.
pub struct ApiState {
    provider: DynLlmProvider,
    cache: SummaryCache,
    cache_enabled: bool,
}

impl ApiState {
    pub fn new(settings: &Settings, provider: DynLlmProvider) -> Self {
        Self {
            provider,
            cache: SummaryCache::new(settings.cache.capacity),
            cache_enabled: settings.cache.enabled,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SummarizeRequest {
    message: String,
}

#[derive(Debug, Serialize)]
struct SummarizeResponse {
    status: &'static str,
    summary: String,
    timestamp: String,
    cached: bool,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: String,
}

#[derive(Debug, Clone, Serialize)]
struct ApiErrorBody {
    status: &'static str,
    message: String,
    timestamp: String,
}

/// Structured error response carrying an HTTP status.
#[derive(Debug, Clone)]
struct ApiError {
    status: StatusCode,
    body: ApiErrorBody,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        ApiError {
            status,
            body: ApiErrorBody {
                status: "error",
                message: message.into(),
                timestamp: utc_timestamp(),
            },
        }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        ApiError::new(StatusCode::BAD_REQUEST, message)
    }

    /// The caller-facing 500; the underlying error is logged, never leaked.
    fn processing_failed() -> Self {
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "AI processing failed")
    }

    fn resource_not_found(path: &str) -> Self {
        ApiError::new(
            StatusCode::NOT_FOUND,
            format!("resource `{path}` not found"),
        )
    }

    fn method_not_allowed(method: &str, path: &str) -> Self {
        ApiError::new(
            StatusCode::METHOD_NOT_ALLOWED,
            format!("method `{method}` not allowed for `{path}`"),
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("listen address may not be empty")]
    EmptyListenAddr,
    #[error("invalid listen address `{address}`: {source}")]
    InvalidListenAddr {
        address: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("failed to bind to {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to determine local address: {source}")]
    LocalAddr {
        #[source]
        source: std::io::Error,
    },
    #[error("axum server error: {source}")]
    Serve {
        #[source]
        source: std::io::Error,
    },
}

async fn summarize(
    Extension(state): Extension<ApiStateHandle>,
    Json(request): Json<SummarizeRequest>,
) -> Result<Json<SummarizeResponse>, ApiError> {
    state.cache.record_request();

    if request.message.trim().is_empty() {
        return Err(ApiError::bad_request("Message cannot be empty"));
    }

    if let Some(cached) = state.cache.get(&request.message).await {
        tracing::info!("cache hit, skipping LLM call");
        return Ok(Json(SummarizeResponse {
            status: "ok",
            summary: cached.summary,
            timestamp: cached.timestamp,
            cached: true,
        }));
    }

    let summary = state
        .provider
        .summarize(&request.message)
        .await
        .map_err(|error| {
            tracing::error!(?error, "summary generation failed");
            ApiError::processing_failed()
        })?;

    // Double quotes would break downstream embedding of the summary.
    let summary = recommend::sanitize_summary(&summary);
    let timestamp = utc_timestamp();

    if state.cache_enabled {
        state
            .cache
            .insert(
                &request.message,
                CachedSummary {
                    summary: summary.clone(),
                    timestamp: timestamp.clone(),
                },
            )
            .await;
    }

    Ok(Json(SummarizeResponse {
        status: "ok",
        summary,
        timestamp,
        cached: false,
    }))
}

async fn recommend_summary(Json(input): Json<Value>) -> Result<Json<Value>, ApiError> {
    let record = recommend::recommend_record(&input)
        .map_err(|error| ApiError::bad_request(error.to_string()))?;
    Ok(Json(record))
}

async fn healthz() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        timestamp: utc_timestamp(),
    })
}

async fn stats(Extension(state): Extension<ApiStateHandle>) -> impl IntoResponse {
    Json(state.cache.stats())
}

async fn method_not_allowed_handler(request: Request<Body>) -> axum::response::Response {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    ApiError::method_not_allowed(&method, &path).into_response()
}

async fn not_found_handler(request: Request<Body>) -> axum::response::Response {
    let path = request.uri().path().to_string();
    ApiError::resource_not_found(&path).into_response()
}

/// API routes without middleware layers.
pub fn build_api_router() -> Router {
    Router::new()
        .route(
            SUMMARIZE_PATH,
            post(summarize).fallback(method_not_allowed_handler),
        )
        .route(
            RECOMMEND_PATH,
            post(recommend_summary).fallback(method_not_allowed_handler),
        )
        .route(
            HEALTHZ_PATH,
            get(healthz).fallback(method_not_allowed_handler),
        )
        .route(STATS_PATH, get(stats).fallback(method_not_allowed_handler))
}

fn build_app_router(state: ApiStateHandle) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http.request",
                method = %request.method(),
                path = %request.uri().path()
            )
        })
        .on_response(
            |response: &axum::response::Response, latency: Duration, span: &tracing::Span| {
                let status = response.status().as_u16();
                let latency_ms = latency.as_millis().min(u128::from(u64::MAX)) as u64;
                tracing::info!(parent: span, status, latency_ms, "request completed");
            },
        );

    Router::new()
        .merge(build_api_router())
        .fallback(not_found_handler)
        .layer(trace_layer)
        .layer(Extension(state))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

/// Bind the listen address and serve the API until Ctrl+C or SIGTERM.
pub async fn serve(settings: &Settings, provider: DynLlmProvider) -> Result<(), ServerError> {
    let state: ApiStateHandle = Arc::new(ApiState::new(settings, provider));
    let listen_addr = parse_listen_addr(&settings.server.listen_addr)?;

    let listener = bind_listener(listen_addr).await?;
    let local_addr = listener
        .local_addr()
        .map_err(|source| ServerError::LocalAddr { source })?;
    tracing::info!(%local_addr, "recap API listening");

    let app = build_app_router(state);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|source| ServerError::Serve { source })?;

    tracing::info!("server shutdown complete");
    Ok(())
}

fn parse_listen_addr(addr: &str) -> Result<SocketAddr, ServerError> {
    let trimmed = addr.trim();
    if trimmed.is_empty() {
        return Err(ServerError::EmptyListenAddr);
    }

    trimmed
        .parse()
        .map_err(|source| ServerError::InvalidListenAddr {
            address: trimmed.to_string(),
            source,
        })
}

async fn bind_listener(addr: SocketAddr) -> Result<TcpListener, ServerError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind {
            address: addr.to_string(),
            source,
        })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::warn!(%error, "failed to capture Ctrl+C signal");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(error) => {
                tracing::warn!(%error, "failed to capture SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Ctrl+C received, draining connections"),
        _ = terminate => tracing::info!("SIGTERM received, draining connections"),
    }
}

fn utc_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
