use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::auth::repo::User;

/// Request body for signup and login. A missing body or absent fields
/// deserialize to empty strings and fail the emptiness check with a 400.
#[derive(Debug, Default, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Response returned by signup and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: PublicUser,
}

/// Public view of a user; never carries the password hash or token.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub user_id: String,
    pub email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<&User> for PublicUser {
    fn from(u: &User) -> Self {
        Self {
            user_id: u.user_id.clone(),
            email: u.email.clone(),
            created_at: u.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            user_id: "user_0123456789ab".into(),
            email: "a@b.com".into(),
            password_hash: "$argon2id$secret".into(),
            created_at: OffsetDateTime::UNIX_EPOCH,
            token: Some("tok_deadbeef".into()),
        }
    }

    #[test]
    fn public_user_hides_credentials() {
        let json = serde_json::to_string(&PublicUser::from(&sample_user())).unwrap();
        assert!(json.contains("user_0123456789ab"));
        assert!(json.contains("a@b.com"));
        assert!(!json.contains("argon2"));
        assert!(!json.contains("tok_deadbeef"));
    }

    #[test]
    fn created_at_serializes_as_rfc3339() {
        let json = serde_json::to_value(PublicUser::from(&sample_user())).unwrap();
        assert_eq!(json["created_at"], "1970-01-01T00:00:00Z");
    }

    #[test]
    fn absent_credential_fields_default_to_empty() {
        let req: CredentialsRequest = serde_json::from_str("{}").unwrap();
        assert!(req.email.is_empty());
        assert!(req.password.is_empty());
    }
}
