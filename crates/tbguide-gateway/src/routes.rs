//! API route handlers for the gateway.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, extract::State};
use std::sync::Arc;

use tbguide_core::error::TbGuideError;
use tbguide_core::types::{AskRequest, AskResponse, MAX_TOP_K, ResultItem};
use tbguide_corpus::CorpusStore;
use tbguide_retrieval::RankedCandidate;
use tbguide_tables::interpret_table;

use super::server::AppState;

/// Error wrapper mapping the taxonomy onto HTTP status classes:
/// validation is the caller's fault, upstream embedding failures are the
/// embedding service's, everything else is ours. The payload is always a
/// single human-readable `error` string.
pub struct ApiError(pub TbGuideError);

impl From<TbGuideError> for ApiError {
    fn from(e: TbGuideError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            TbGuideError::Validation(_) => StatusCode::BAD_REQUEST,
            TbGuideError::UpstreamEmbedding { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self.0);
        }
        (status, Json(serde_json::json!({ "error": self.0.to_string() }))).into_response()
    }
}

/// Health check endpoint.
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "tbguide-gateway",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Corpus introspection endpoint.
pub async fn corpus_stats(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let stats = state.store.stats();
    Json(serde_json::json!({
        "total_chunks": stats.total_chunks,
        "prose_chunks": stats.prose_chunks,
        "table_chunks": stats.table_chunks,
        "chunks_by_doc": stats.chunks_by_doc,
        "uptime_secs": state.start_time.elapsed().as_secs(),
    }))
}

/// The one retrieval operation: embed the question, rank the corpus,
/// enrich surviving table chunks.
pub async fn ask(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    let question = req.question.as_deref().map(str::trim).unwrap_or("");
    if question.is_empty() {
        return Err(ApiError(TbGuideError::Validation(
            "question is required and must be a non-empty string".into(),
        )));
    }

    let top_k = req
        .top_k
        .unwrap_or(state.config.retrieval.default_top_k)
        .clamp(1, MAX_TOP_K);

    let query_vector = state.embedder.embed(question).await?;
    let outcome = tbguide_retrieval::retrieve(
        &state.store,
        &query_vector,
        question,
        req.scope.clone(),
        req.document_hint.clone(),
        top_k,
        &state.config.retrieval,
    )?;

    let results = outcome
        .ranked
        .iter()
        .map(|candidate| build_result_item(&state.store, candidate))
        .collect();

    Ok(Json(AskResponse {
        question: question.to_string(),
        top_k,
        scope: outcome.scope,
        document_hint: outcome.document_hint,
        results,
    }))
}

/// Project one ranked candidate into a response item. Table chunks go
/// through the normalize/detect/render pipeline; a failure there leaves
/// the chunk unenriched instead of failing the request.
pub fn build_result_item(store: &CorpusStore, candidate: &RankedCandidate) -> ResultItem {
    let chunk = &store.chunks()[candidate.index];
    let mut item = ResultItem::from_chunk(chunk, candidate.score);

    if chunk.is_table() {
        if let Some(path) = chunk.attachment_path.as_deref() {
            match tbguide_corpus::load_table_rows(store.dir(), path) {
                Ok(raw_rows) => {
                    let rendering =
                        interpret_table(&raw_rows, chunk.caption.as_deref(), &chunk.section_path);
                    item.table_subtype = Some(rendering.subtype.as_str().to_string());
                    item.table_text = Some(rendering.text);
                    item.table_rows = Some(rendering.rows);
                }
                Err(e) => {
                    tracing::warn!("Table enrichment failed for {}: {e}", chunk.chunk_id);
                }
            }
        }
    }

    item
}
