//! Axum route handlers for the questionnaire API.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::questionnaire::catalog::Question;
use crate::questionnaire::session::SubmitError;
use crate::questionnaire::store::SharedSession;
use crate::questionnaire::view::{render, SessionView};
use crate::recommendations::service::RecommendationService;
use crate::state::AppState;

pub const GENERATION_FAILED_MESSAGE: &str =
    "😔 The Genie could not reach the mystical library. Start a new journey to try again.";

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub answer: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn find_session(state: &AppState, id: Uuid) -> Result<SharedSession, AppError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
}

/// Runs the outbound call for a session that is awaiting generation.
///
/// The call runs on its own task that owns the session and the service, so
/// a caller that stops waiting (client disconnect, cancelled request) does
/// not leave the session stuck in `Generating`. The session lock is released
/// while the call is in flight so renders can show the loading state;
/// `begin_generation` guarantees only one caller gets a ticket per journey.
pub async fn generate_recommendations(
    session: SharedSession,
    service: Arc<dyn RecommendationService>,
) {
    let (id, ticket) = {
        let mut guard = session.lock().await;
        (guard.id, guard.begin_generation())
    };
    let Some(ticket) = ticket else {
        return;
    };

    let journey = ticket.journey;
    let task = tokio::spawn({
        let session = session.clone();
        async move {
            info!("Session {id}: requesting recommendations");
            let outcome = match service.recommend(&ticket.prompt).await {
                Ok(text) => {
                    info!("Session {id}: received {} bytes of recommendations", text.len());
                    Ok(text)
                }
                Err(e) => {
                    warn!("Session {id}: recommendation call failed: {e}");
                    Err(GENERATION_FAILED_MESSAGE.to_string())
                }
            };
            finish(&session, id, journey, outcome).await;
        }
    });

    if let Err(e) = task.await {
        error!("Session {id}: recommendation task aborted: {e}");
        finish(&session, id, journey, Err(GENERATION_FAILED_MESSAGE.to_string())).await;
    }
}

async fn finish(session: &SharedSession, id: Uuid, journey: u64, outcome: Result<String, String>) {
    let mut guard = session.lock().await;
    if !guard.finish_generation(journey, outcome) {
        info!("Session {id}: discarded recommendations from an earlier journey");
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/questions
pub async fn handle_list_questions(State(state): State<AppState>) -> Json<&'static [Question]> {
    Json(state.catalog)
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionView>) {
    let session = state.sessions.create(state.catalog).await;
    let view = render(&*session.lock().await);
    (StatusCode::CREATED, Json(view))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = find_session(&state, id).await?;
    let view = render(&*session.lock().await);
    Ok(Json(view))
}

/// POST /api/v1/sessions/:id/answers
///
/// Validates and commits the answer to the current question.
pub async fn handle_submit_answer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<SessionView>, AppError> {
    let session = find_session(&state, id).await?;
    let mut guard = session.lock().await;

    match guard.submit(&request.answer) {
        Ok(phase) => debug!("Session {id}: answer accepted, now {phase:?}"),
        Err(SubmitError::NotAsking) => {
            return Err(AppError::Conflict(SubmitError::NotAsking.to_string()))
        }
        Err(e) => return Err(AppError::Validation(e.to_string())),
    }

    Ok(Json(render(&guard)))
}

/// POST /api/v1/sessions/:id/recommendations
///
/// Asks the model for recommendations once every question is answered.
/// Later calls return the cached result without contacting the model.
pub async fn handle_generate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = find_session(&state, id).await?;

    if session.lock().await.current_question().is_some() {
        return Err(AppError::Conflict(
            "Answer every question before asking for recommendations".to_string(),
        ));
    }

    generate_recommendations(session.clone(), state.recommender.clone()).await;

    let view = render(&*session.lock().await);
    Ok(Json(view))
}

/// POST /api/v1/sessions/:id/reset
pub async fn handle_reset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = find_session(&state, id).await?;
    let mut guard = session.lock().await;
    guard.reset();
    info!("Session {id}: started a new journey");
    Ok(Json(render(&guard)))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Session {id} not found")))
    }
}
