//! HTTP request handlers for the benefit consolidation API.

use std::time::{Duration, Instant};

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::report::execution_summary;
use crate::sources::load_bundle;

use super::request::{ChatRequest, is_consolidation_request};
use super::response::{ApiError, ApiErrorResponse, ChatResponse, HealthResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/chat", post(chat_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

fn json_response<T: serde::Serialize>(status: StatusCode, body: T) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json")], Json(body)).into_response()
}

fn error_response(error: EngineError) -> Response {
    let api_error: ApiErrorResponse = error.into();
    json_response(api_error.status, api_error.error)
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        period: state.config().period().to_string(),
        ai_configured: state.model().is_some(),
    })
}

/// Handler for POST /chat.
///
/// Trigger phrases run a full consolidation and return its summary. Any
/// other message goes to the language model verbatim.
async fn chat_handler(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing chat request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    let body_text = err.body_text();
                    warn!(correlation_id = %correlation_id, error = %body_text, "JSON data error");
                    ApiError::validation_error(body_text)
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(correlation_id = %correlation_id, error = %err, "JSON syntax error");
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => {
                    ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
                }
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            return json_response(StatusCode::BAD_REQUEST, error);
        }
    };

    if request.message.trim().is_empty() {
        return json_response(
            StatusCode::BAD_REQUEST,
            ApiError::validation_error("message must not be empty"),
        );
    }

    let start_time = Instant::now();
    let consolidation = is_consolidation_request(&request.message);
    let result = if consolidation {
        consolidate(&state).await
    } else {
        pass_through(&state, &request.message).await
    };

    match result {
        Ok(response) => {
            info!(
                correlation_id = %correlation_id,
                consolidation,
                employees = ?response.employees,
                duration_ms = start_time.elapsed().as_millis(),
                "Chat request completed"
            );
            json_response(StatusCode::OK, response)
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Chat request failed");
            error_response(err)
        }
    }
}

/// Runs file I/O on the blocking pool.
async fn blocking<T, F>(task: F) -> EngineResult<T>
where
    F: FnOnce() -> EngineResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| EngineError::CalculationError {
            message: format!("blocking task failed: {}", e),
        })?
}

/// Loads sources, consolidates and writes the report.
///
/// Nothing is written unless the consolidation succeeds.
async fn consolidate(state: &AppState) -> EngineResult<ChatResponse> {
    let reader = state.clone();
    let bundle =
        blocking(move || load_bundle(reader.sources(), &reader.config().config().sources)).await?;

    let outcome = state.orchestrator().consolidate(&bundle).await?;

    let writer = state.clone();
    let (outcome, artifact) = blocking(move || {
        let artifact = writer.reports().write(&outcome.result)?;
        Ok((outcome, artifact))
    })
    .await?;

    let reply = execution_summary(&outcome, &artifact, &bundle.source_counts());
    Ok(ChatResponse {
        reply,
        artifact_path: Some(artifact.display().to_string()),
        execution_path: Some(outcome.path),
        employees: Some(outcome.result.totals.count),
        total_benefit: Some(outcome.result.totals.total_benefit),
    })
}

async fn pass_through(state: &AppState, message: &str) -> EngineResult<ChatResponse> {
    let model = state.model().ok_or(EngineError::AiNotConfigured)?;
    let seconds = state.config().config().ai.timeout_seconds;

    let text = tokio::time::timeout(Duration::from_secs(seconds), model.generate(message))
        .await
        .map_err(|_| EngineError::AiTimeout { seconds })??;
    Ok(ChatResponse::text(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use crate::llm::LanguageModel;
    use crate::models::{ConsolidationResult, RawTable};
    use crate::report::{ReportWriter, XlsxReportWriter};
    use crate::sources::{MemorySourceReader, SourceReader};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use std::sync::Arc;
    use tower::ServiceExt;

    struct EchoModel;

    #[async_trait]
    impl LanguageModel for EchoModel {
        async fn generate(&self, prompt: &str) -> EngineResult<String> {
            Ok(format!("eco: {}", prompt))
        }

        fn name(&self) -> &str {
            "echo"
        }
    }

    fn sources() -> MemorySourceReader {
        MemorySourceReader::new().with_table(RawTable::from_rows(
            "ATIVOS.xlsx",
            &[
                &["MATRICULA", "TITULO DO CARGO", "Sindicato"],
                &["ID001", "ANALISTA", "SINDPD SP"],
                &["ID002", "DIRETOR", "SINDPD SP"],
            ],
        ))
    }

    fn state(dir: &std::path::Path, model: Option<Arc<dyn LanguageModel>>) -> AppState {
        AppState::with_collaborators(
            ConfigLoader::default(),
            model,
            Arc::new(sources()),
            Arc::new(XlsxReportWriter::new(dir)),
        )
    }

    fn chat(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/chat")
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_trigger_phrase_runs_consolidation() {
        let dir = tempfile::tempdir().unwrap();
        let router = create_router(state(dir.path(), None));

        let response = router
            .oneshot(chat(r#"{"message": "Gerar planilha do VR"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: ChatResponse = body_json(response).await;
        assert_eq!(body.employees, Some(1));
        assert!(body.reply.contains("Valor total VR: R$ 440.00"));
        let artifact = body.artifact_path.unwrap();
        assert!(artifact.ends_with("VR MENSAL 05-2025.xlsx"));
        assert!(std::path::Path::new(&artifact).is_file());
    }

    /// Fails unless called off the async workers: `block_on` panics there.
    struct BlockingOnly<T>(T);

    fn assert_blocking_thread() {
        tokio::runtime::Handle::current().block_on(tokio::task::yield_now());
    }

    impl SourceReader for BlockingOnly<MemorySourceReader> {
        fn read(&self, name: &str) -> EngineResult<RawTable> {
            assert_blocking_thread();
            self.0.read(name)
        }
    }

    impl ReportWriter for BlockingOnly<XlsxReportWriter> {
        fn write(&self, result: &ConsolidationResult) -> EngineResult<std::path::PathBuf> {
            assert_blocking_thread();
            self.0.write(result)
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_file_io_runs_on_blocking_pool() {
        let dir = tempfile::tempdir().unwrap();
        let router = create_router(AppState::with_collaborators(
            ConfigLoader::default(),
            None,
            Arc::new(BlockingOnly(sources())),
            Arc::new(BlockingOnly(XlsxReportWriter::new(dir.path()))),
        ));

        let response = router
            .oneshot(chat(r#"{"message": "gerar planilha"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: ChatResponse = body_json(response).await;
        assert_eq!(body.employees, Some(1));
    }

    #[tokio::test]
    async fn test_pass_through_returns_model_text() {
        let dir = tempfile::tempdir().unwrap();
        let router = create_router(state(dir.path(), Some(Arc::new(EchoModel))));

        let response = router
            .oneshot(chat(r#"{"message": "quantos dias úteis no RJ?"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: ChatResponse = body_json(response).await;
        assert_eq!(body.reply, "eco: quantos dias úteis no RJ?");
        assert!(body.artifact_path.is_none());
    }

    #[tokio::test]
    async fn test_pass_through_without_model_is_ai_not_configured() {
        let dir = tempfile::tempdir().unwrap();
        let router = create_router(state(dir.path(), None));

        let response = router
            .oneshot(chat(r#"{"message": "olá"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let error: ApiError = body_json(response).await;
        assert_eq!(error.code, "AI_NOT_CONFIGURED");
    }

    #[tokio::test]
    async fn test_malformed_json_returns_400() {
        let dir = tempfile::tempdir().unwrap();
        let router = create_router(state(dir.path(), None));

        let response = router.oneshot(chat("{invalid json")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let error: ApiError = body_json(response).await;
        assert_eq!(error.code, "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_missing_active_roster_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let router = create_router(AppState::with_collaborators(
            ConfigLoader::default(),
            None,
            Arc::new(MemorySourceReader::new()),
            Arc::new(XlsxReportWriter::new(dir.path())),
        ));

        let response = router
            .oneshot(chat(r#"{"message": "vr consolidado"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let error: ApiError = body_json(response).await;
        assert_eq!(error.code, "SOURCE_NOT_FOUND");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let router = create_router(state(dir.path(), None));

        let response = router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: HealthResponse = body_json(response).await;
        assert_eq!(body.status, "ok");
        assert!(!body.ai_configured);
    }
}
