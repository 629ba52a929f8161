//! HTTP surface for Contract Assistant.
//!
//! This module exposes a compact Axum router, every route under `/api`:
//!
//! - `GET /api/health` – Liveness probe echoing the application name and environment.
//! - `POST /api/upload` – Multipart upload (field `file`) of a PDF, DOCX, or TXT contract. Returns
//!   `document_id`, `num_characters`, and `ocr_used`.
//! - `POST /api/summarize` – Summarize a stored contract into at most ten bullets.
//! - `POST /api/chat` – Answer a question about a stored contract.
//! - `POST /api/search` – Keyword-in-context search over a stored contract.
//! - `GET /api/metrics` – Document, summary, and answer counters.
//! - `GET /api/commands` – Machine-readable command catalog for quick discovery by tools/hosts.
//!
//! The router is generic over [`ContractApi`], so the CLI and the server share one pipeline and
//! handlers can be exercised against a stub service.

use crate::extraction::ExtractionError;
use crate::metrics::MetricsSnapshot;
use crate::processing::{ContractApi, ProcessingError};
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

// Room for multipart boundaries and headers on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Static details reported by the health endpoint and used to size request bodies.
#[derive(Debug, Clone)]
pub struct ApiSettings {
    /// Application name echoed by `/api/health`.
    pub app_name: String,
    /// Deployment environment echoed by `/api/health`.
    pub environment: String,
    /// Largest accepted upload in bytes.
    pub max_upload_bytes: usize,
}

struct ApiState<S> {
    service: Arc<S>,
    settings: Arc<ApiSettings>,
}

impl<S> Clone for ApiState<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            settings: Arc::clone(&self.settings),
        }
    }
}

/// Build the HTTP router exposing the contract API surface.
pub fn create_router<S>(service: Arc<S>, settings: ApiSettings) -> Router
where
    S: ContractApi + 'static,
{
    let body_limit = settings.max_upload_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES);
    let api = Router::new()
        .route("/health", get(health::<S>))
        .route("/upload", post(upload::<S>))
        .route("/summarize", post(summarize::<S>))
        .route("/chat", post(chat::<S>))
        .route("/search", post(search::<S>))
        .route("/metrics", get(get_metrics::<S>))
        .route("/commands", get(get_commands))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(ApiState {
            service,
            settings: Arc::new(settings),
        });
    Router::new().nest("/api", api)
}

/// Response body for `GET /api/health`.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    app_name: String,
    environment: String,
}

async fn health<S>(State(state): State<ApiState<S>>) -> Json<HealthResponse>
where
    S: ContractApi,
{
    Json(HealthResponse {
        status: "ok",
        app_name: state.settings.app_name.clone(),
        environment: state.settings.environment.clone(),
    })
}

/// Success response for `POST /api/upload`.
#[derive(Serialize)]
struct UploadResponse {
    document_id: String,
    num_characters: usize,
    ocr_used: bool,
}

/// Store an uploaded contract.
///
/// The first multipart field named `file` is read; its file name decides the extraction path.
async fn upload<S>(
    State(state): State<ApiState<S>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError>
where
    S: ContractApi,
{
    while let Some(field) = multipart.next_field().await.map_err(AppError::multipart)? {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().map(str::to_string);
        let bytes = field.bytes().await.map_err(AppError::multipart)?;
        let outcome = state
            .service
            .upload(filename.as_deref(), bytes.to_vec())
            .await?;
        tracing::info!(
            document_id = %outcome.document_id,
            num_characters = outcome.num_characters,
            ocr_used = outcome.ocr_used,
            "Upload request completed"
        );
        return Ok(Json(UploadResponse {
            document_id: outcome.document_id,
            num_characters: outcome.num_characters,
            ocr_used: outcome.ocr_used,
        }));
    }
    Err(AppError::Request(
        StatusCode::BAD_REQUEST,
        "Missing multipart field 'file'".into(),
    ))
}

/// Request body for `POST /api/summarize`.
#[derive(Deserialize)]
struct SummaryRequest {
    document_id: String,
}

/// Response body for `POST /api/summarize`.
#[derive(Serialize)]
struct SummaryResponse {
    document_id: String,
    summary: Vec<String>,
    model_name: String,
}

async fn summarize<S>(
    State(state): State<ApiState<S>>,
    Json(request): Json<SummaryRequest>,
) -> Result<Json<SummaryResponse>, AppError>
where
    S: ContractApi,
{
    let outcome = state.service.summarize(&request.document_id).await?;
    Ok(Json(SummaryResponse {
        document_id: outcome.document_id,
        summary: outcome.summary,
        model_name: outcome.model_name,
    }))
}

/// Request body for `POST /api/chat`.
#[derive(Deserialize)]
struct ChatRequest {
    document_id: String,
    question: String,
    /// Accepted for client compatibility; answers do not depend on earlier turns.
    #[serde(default)]
    #[allow(dead_code)]
    chat_history: Option<Vec<serde_json::Value>>,
}

/// Response body for `POST /api/chat`.
#[derive(Serialize)]
struct ChatResponse {
    answer: String,
    citations: Option<Vec<String>>,
    model_name: String,
}

async fn chat<S>(
    State(state): State<ApiState<S>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError>
where
    S: ContractApi,
{
    let outcome = state
        .service
        .ask(&request.document_id, &request.question)
        .await?;
    Ok(Json(ChatResponse {
        answer: outcome.answer,
        citations: None,
        model_name: outcome.model_name,
    }))
}

/// Request body for `POST /api/search`.
#[derive(Deserialize)]
struct SearchRequest {
    document_id: String,
    query: String,
}

/// Response body for `POST /api/search`.
#[derive(Serialize)]
struct SearchResponse {
    results: Vec<String>,
}

async fn search<S>(
    State(state): State<ApiState<S>>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, AppError>
where
    S: ContractApi,
{
    let results = state
        .service
        .search(&request.document_id, &request.query)
        .await?;
    Ok(Json(SearchResponse { results }))
}

/// Return the activity counters.
async fn get_metrics<S>(State(state): State<ApiState<S>>) -> Json<MetricsSnapshot>
where
    S: ContractApi,
{
    Json(state.service.metrics_snapshot())
}

/// Descriptor for a single command in the discovery catalog.
#[derive(Serialize)]
struct CommandDescriptor {
    name: &'static str,
    method: &'static str,
    path: &'static str,
    description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_example: Option<serde_json::Value>,
}

/// Response body for `GET /api/commands`.
#[derive(Serialize)]
struct CommandsResponse {
    commands: Vec<CommandDescriptor>,
}

/// Enumerate supported HTTP commands for discovery/UX in hosts and tools.
async fn get_commands() -> Json<CommandsResponse> {
    Json(CommandsResponse {
        commands: vec![
            CommandDescriptor {
                name: "upload",
                method: "POST",
                path: "/api/upload",
                description: "Upload a PDF, DOCX, or TXT contract as multipart field 'file'. Response returns { \"document_id\": string, \"num_characters\": number, \"ocr_used\": bool }.",
                request_example: None,
            },
            CommandDescriptor {
                name: "summarize",
                method: "POST",
                path: "/api/summarize",
                description: "Summarize a stored contract into at most ten bullet points.",
                request_example: Some(json!({ "document_id": "uuid" })),
            },
            CommandDescriptor {
                name: "chat",
                method: "POST",
                path: "/api/chat",
                description: "Answer a question about a stored contract. Ask 'in Hindi' for an English + Hindi answer.",
                request_example: Some(json!({
                    "document_id": "uuid",
                    "question": "What are the payment terms?"
                })),
            },
            CommandDescriptor {
                name: "search",
                method: "POST",
                path: "/api/search",
                description: "Return every case-insensitive occurrence of a phrase with surrounding context.",
                request_example: Some(json!({ "document_id": "uuid", "query": "termination" })),
            },
            CommandDescriptor {
                name: "metrics",
                method: "GET",
                path: "/api/metrics",
                description: "Return document, summary, and answer counters.",
                request_example: None,
            },
            CommandDescriptor {
                name: "health",
                method: "GET",
                path: "/api/health",
                description: "Liveness probe.",
                request_example: None,
            },
        ],
    })
}

enum AppError {
    Processing(ProcessingError),
    Request(StatusCode, String),
}

impl AppError {
    fn multipart(error: axum::extract::multipart::MultipartError) -> Self {
        Self::Request(error.status(), error.body_text())
    }
}

fn status_for(error: &ProcessingError) -> StatusCode {
    match error {
        ProcessingError::Extraction(ExtractionError::UnsupportedFormat(_)) => {
            StatusCode::BAD_REQUEST
        }
        ProcessingError::Extraction(ExtractionError::EmptyDocument) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ProcessingError::UploadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        ProcessingError::DocumentNotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            Self::Processing(error) => {
                let status = status_for(&error);
                if status.is_server_error() {
                    tracing::error!(error = %error, "Request failed");
                }
                (status, error.to_string())
            }
            Self::Request(status, detail) => (status, detail),
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

impl From<ProcessingError> for AppError {
    fn from(inner: ProcessingError) -> Self {
        Self::Processing(inner)
    }
}
