use axum::{extract::State, Json};
use tracing::{info, instrument};

use crate::{
    auth::CurrentUser,
    error::ApiError,
    onboarding::{
        dto::{
            FetchOnboardingResponse, OnboardingView, SaveOnboardingRequest,
            SaveOnboardingResponse, SavedFields,
        },
        repo,
    },
    state::AppState,
};

#[instrument(skip(state, user))]
pub async fn fetch_onboarding(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<FetchOnboardingResponse>, ApiError> {
    // A user who never saved anything gets all-defaults, not a 404.
    let record = repo::find_by_user(&state.db, &user.user_id).await?;

    let resp = match record {
        Some(r) => FetchOnboardingResponse {
            onboarding_completed: r.completed,
            onboarding: OnboardingView {
                knowledge_level: r.knowledge_level,
                goals: r.goals.0,
                preferred_session_mins: r.preferred_session_mins,
            },
        },
        None => FetchOnboardingResponse {
            onboarding_completed: false,
            onboarding: OnboardingView {
                knowledge_level: None,
                goals: vec![],
                preferred_session_mins: None,
            },
        },
    };
    Ok(Json(resp))
}

#[instrument(skip(state, user, payload))]
pub async fn save_onboarding(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: Option<Json<SaveOnboardingRequest>>,
) -> Result<Json<SaveOnboardingResponse>, ApiError> {
    // A missing or non-JSON body saves all-defaults, it is not an error.
    let payload = payload.map(|Json(p)| p).unwrap_or_default();
    repo::upsert(
        &state.db,
        &user.user_id,
        payload.knowledge_level.as_deref(),
        &payload.goals,
        payload.preferred_session_mins,
        payload.complete,
    )
    .await?;

    info!(user_id = %user.user_id, complete = payload.complete, "onboarding saved");
    Ok(Json(SaveOnboardingResponse {
        ok: true,
        saved: SavedFields {
            knowledge_level: payload.knowledge_level,
            goals: payload.goals,
            preferred_session_mins: payload.preferred_session_mins,
            completed: payload.complete.then_some(true),
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::extract::FromRequest;
    use axum::http::Request;

    #[tokio::test]
    async fn empty_body_saves_all_defaults() {
        let req = Request::builder()
            .method("POST")
            .body(Body::empty())
            .unwrap();
        let payload = Option::<Json<SaveOnboardingRequest>>::from_request(req, &())
            .await
            .unwrap()
            .map(|Json(p)| p)
            .unwrap_or_default();
        assert_eq!(payload.knowledge_level, None);
        assert!(payload.goals.is_empty());
        assert_eq!(payload.preferred_session_mins, None);
        assert!(!payload.complete);
    }
}
