use axum::{extract::State, Json};
use tracing::{info, instrument, warn};

use crate::{
    error::ApiError,
    sessions::{
        aggregate::aggregate,
        dto::{
            EndSessionRequest, EndSessionResponse, StartSessionRequest, StartSessionResponse,
        },
        repo,
    },
    state::AppState,
};

// Intentionally unauthenticated: the practice widget can run before signup.
#[instrument(skip(state, payload))]
pub async fn start_session(
    State(state): State<AppState>,
    payload: Option<Json<StartSessionRequest>>,
) -> Result<Json<StartSessionResponse>, ApiError> {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();

    let session_id = repo::new_session_id();
    repo::create(
        &state.db,
        &session_id,
        &payload.user_id,
        payload.avatar_url.as_deref(),
    )
    .await?;

    info!(%session_id, user_id = %payload.user_id, "session started");
    Ok(Json(StartSessionResponse {
        session_id,
        message: "session started",
    }))
}

#[instrument(skip(state, payload))]
pub async fn end_session(
    State(state): State<AppState>,
    payload: Option<Json<EndSessionRequest>>,
) -> Result<Json<EndSessionResponse>, ApiError> {
    let session_id = payload
        .and_then(|Json(p)| p.session_id)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::validation("session_id required"))?;

    repo::complete(&state.db, &session_id).await?;

    let attempts = repo::attempts_for_session(&state.db, &session_id).await?;
    let report = aggregate(&attempts);

    let feedback = match state
        .feedback
        .generate(&report.scores, &report.mistakes)
        .await
    {
        Ok(text) => text,
        Err(e) => {
            // Scores are already computed; degrade to a null feedback field.
            warn!(error = %e, %session_id, "feedback generation failed");
            None
        }
    };

    info!(
        %session_id,
        attempts = attempts.len(),
        final_score = report.scores.final_score,
        "session ended"
    );
    Ok(Json(EndSessionResponse {
        message: "session ended",
        scores: report.scores,
        feedback,
    }))
}
