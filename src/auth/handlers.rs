use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, CredentialsRequest, MeResponse, PublicUser},
        password::{hash_password, verify_password},
        repo::{self, User},
        token::{issue_token, CurrentUser},
    },
    error::ApiError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(me))
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    payload: Option<Json<CredentialsRequest>>,
) -> Result<Json<AuthResponse>, ApiError> {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();
    let email = normalize_email(&payload.email);

    if email.is_empty() || payload.password.is_empty() {
        warn!("signup with missing fields");
        return Err(ApiError::validation("email and password required"));
    }

    if User::find_by_email(&state.db, &email).await?.is_some() {
        warn!(%email, "email already registered");
        return Err(ApiError::conflict("email already registered"));
    }

    let hash = hash_password(&payload.password).map_err(|e| {
        error!(error = %e, "hash_password failed");
        ApiError::Internal(e)
    })?;

    let user = match User::create(&state.db, &email, &hash).await {
        Ok(u) => u,
        Err(e) if repo::is_unique_violation(&e) => {
            // Lost a race with a concurrent signup for the same email.
            warn!(%email, "email already registered");
            return Err(ApiError::conflict("email already registered"));
        }
        Err(e) => return Err(e.into()),
    };

    // Auto-login after signup
    let token = issue_token();
    User::set_token(&state.db, &user.user_id, &token).await?;

    info!(user_id = %user.user_id, %email, "user registered");
    Ok(Json(AuthResponse {
        token,
        user: PublicUser::from(&user),
    }))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Option<Json<CredentialsRequest>>,
) -> Result<Json<AuthResponse>, ApiError> {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();
    let email = normalize_email(&payload.email);

    if email.is_empty() || payload.password.is_empty() {
        warn!("login with missing fields");
        return Err(ApiError::validation("email and password required"));
    }

    let user = match User::find_by_email(&state.db, &email).await? {
        Some(u) => u,
        None => {
            warn!(%email, "login unknown email");
            return Err(ApiError::auth("invalid credentials"));
        }
    };

    let ok = verify_password(&payload.password, &user.password_hash).unwrap_or(false);
    if !ok {
        warn!(%email, user_id = %user.user_id, "login invalid password");
        return Err(ApiError::auth("invalid credentials"));
    }

    // Overwrites any prior token; other sessions are implicitly logged out.
    let token = issue_token();
    User::set_token(&state.db, &user.user_id, &token).await?;

    info!(user_id = %user.user_id, %email, "user logged in");
    Ok(Json(AuthResponse {
        token,
        user: PublicUser::from(&user),
    }))
}

#[instrument(skip_all)]
pub async fn me(CurrentUser(user): CurrentUser) -> Json<MeResponse> {
    Json(MeResponse {
        user: PublicUser::from(&user),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::extract::FromRequest;
    use axum::http::Request;

    async fn extract_credentials(req: Request<Body>) -> CredentialsRequest {
        Option::<Json<CredentialsRequest>>::from_request(req, &())
            .await
            .unwrap()
            .map(|Json(p)| p)
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn empty_body_falls_back_to_empty_credentials() {
        let req = Request::builder()
            .method("POST")
            .body(Body::empty())
            .unwrap();
        let payload = extract_credentials(req).await;
        assert!(payload.email.is_empty());
        assert!(payload.password.is_empty());
    }

    #[tokio::test]
    async fn missing_content_type_falls_back_to_empty_credentials() {
        let req = Request::builder()
            .method("POST")
            .body(Body::from(r#"{"email":"a@b.com","password":"pw"}"#))
            .unwrap();
        let payload = extract_credentials(req).await;
        assert!(payload.email.is_empty());
        assert!(payload.password.is_empty());
    }

    #[test]
    fn email_is_trimmed_and_lowercased() {
        assert_eq!(normalize_email(" A@B.com "), "a@b.com");
        assert_eq!(normalize_email("a@b.com"), "a@b.com");
    }

    #[test]
    fn whitespace_only_email_normalizes_to_empty() {
        assert!(normalize_email("   ").is_empty());
    }
}
