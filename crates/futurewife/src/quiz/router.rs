use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error};

use super::answers::QuizSubmission;
use super::catalog::{catalog, Catalog};
use super::narrative::NarrativeGenerator;
use super::repository::{EvaluationId, EvaluationRepository, RepositoryError, DEFAULT_LIST_LIMIT};
use super::service::{QuizService, QuizServiceError};

/// Router builder exposing the quiz catalog, scoring, and stored evaluations.
pub fn quiz_router<R, N>(service: Arc<QuizService<R, N>>) -> Router
where
    R: EvaluationRepository + 'static,
    N: NarrativeGenerator + ?Sized + 'static,
{
    Router::new()
        .route("/api/questions", get(questions_handler))
        .route("/api/score", post(score_handler::<R, N>))
        .route("/api/evaluations", get(list_handler::<R, N>))
        .route("/api/evaluations/:evaluation_id", get(detail_handler::<R, N>))
        .route("/api/statistics", get(statistics_handler::<R, N>))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListQuery {
    pub(crate) limit: Option<usize>,
}

fn not_found() -> Response {
    let payload = json!({ "error": "Valutazione non trovata" });
    (StatusCode::NOT_FOUND, Json(payload)).into_response()
}

fn internal_error(message: &str, err: &QuizServiceError) -> Response {
    error!(error = %err, "{message}");
    let payload = json!({
        "error": message,
        "details": err.to_string(),
    });
    (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
}

pub(crate) async fn questions_handler() -> Json<Catalog> {
    Json(catalog())
}

pub(crate) async fn score_handler<R, N>(
    State(service): State<Arc<QuizService<R, N>>>,
    payload: Result<Json<QuizSubmission>, JsonRejection>,
) -> Response
where
    R: EvaluationRepository + 'static,
    N: NarrativeGenerator + ?Sized + 'static,
{
    let submission = match payload {
        Ok(Json(submission)) => submission,
        Err(rejection) => {
            debug!(reason = %rejection.body_text(), "rejected quiz payload");
            let payload = json!({ "error": "Payload non valido" });
            return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
        }
    };

    match service.submit(submission).await {
        Ok(scored) => (StatusCode::OK, Json(scored)).into_response(),
        Err(err) => internal_error("Errore durante la valutazione", &err),
    }
}

pub(crate) async fn list_handler<R, N>(
    State(service): State<Arc<QuizService<R, N>>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Response
where
    R: EvaluationRepository + 'static,
    N: NarrativeGenerator + ?Sized + 'static,
{
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            debug!(reason = %rejection.body_text(), "ignoring unreadable list query");
            ListQuery::default()
        }
    };
    let limit = query.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    match service.recent(limit) {
        Ok(evaluations) => {
            let payload = json!({ "evaluations": evaluations });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => internal_error("Errore nel recupero delle valutazioni", &err),
    }
}

pub(crate) async fn detail_handler<R, N>(
    State(service): State<Arc<QuizService<R, N>>>,
    evaluation_id: Result<Path<u64>, PathRejection>,
) -> Response
where
    R: EvaluationRepository + 'static,
    N: NarrativeGenerator + ?Sized + 'static,
{
    // Only numeric ids can name a stored evaluation.
    let Ok(Path(evaluation_id)) = evaluation_id else {
        return not_found();
    };

    match service.get(EvaluationId(evaluation_id)) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(QuizServiceError::Repository(RepositoryError::NotFound)) => not_found(),
        Err(err) => internal_error("Errore nel recupero della valutazione", &err),
    }
}

pub(crate) async fn statistics_handler<R, N>(
    State(service): State<Arc<QuizService<R, N>>>,
) -> Response
where
    R: EvaluationRepository + 'static,
    N: NarrativeGenerator + ?Sized + 'static,
{
    match service.statistics() {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(err) => internal_error("Errore nel recupero delle statistiche", &err),
    }
}
