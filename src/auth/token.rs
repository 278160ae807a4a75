use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};
use uuid::Uuid;

use crate::auth::repo::User;
use crate::error::ApiError;
use crate::state::AppState;

/// Mint a fresh opaque bearer token.
pub fn issue_token() -> String {
    format!("tok_{}", Uuid::new_v4().simple())
}

/// Pull the bearer token out of an `Authorization` header value.
///
/// Valid only when the value is exactly `<scheme> <token>`: two parts split
/// on spaces, scheme `bearer` case-insensitively, token non-empty.
pub fn extract_bearer(header: &str) -> Option<&str> {
    let parts: Vec<&str> = header.split(' ').collect();
    if parts.len() != 2 {
        return None;
    }
    if !parts[0].eq_ignore_ascii_case("bearer") || parts[1].is_empty() {
        return None;
    }
    Some(parts[1])
}

/// Resolves the request's bearer token to the one user holding it.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .unwrap_or("");

        let token = extract_bearer(header).ok_or_else(|| ApiError::auth("unauthorized"))?;

        let user = User::find_by_token(&state.db, token)
            .await?
            .ok_or_else(|| ApiError::auth("unauthorized"))?;

        Ok(CurrentUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_well_formed_header() {
        assert_eq!(extract_bearer("Bearer tok_abc123"), Some("tok_abc123"));
    }

    #[test]
    fn scheme_is_case_insensitive() {
        assert_eq!(extract_bearer("bearer t"), Some("t"));
        assert_eq!(extract_bearer("BEARER t"), Some("t"));
    }

    #[test]
    fn rejects_wrong_scheme() {
        assert_eq!(extract_bearer("Basic dXNlcjpwYXNz"), None);
    }

    #[test]
    fn rejects_missing_or_empty_token() {
        assert_eq!(extract_bearer("Bearer"), None);
        assert_eq!(extract_bearer("Bearer "), None);
        assert_eq!(extract_bearer(""), None);
    }

    #[test]
    fn rejects_extra_parts() {
        assert_eq!(extract_bearer("Bearer tok_a extra"), None);
    }

    #[test]
    fn tokens_are_prefixed_and_unique() {
        let a = issue_token();
        let b = issue_token();
        assert!(a.starts_with("tok_"));
        assert_eq!(a.len(), "tok_".len() + 32);
        assert_ne!(a, b);
    }
}
