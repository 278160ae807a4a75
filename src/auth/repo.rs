use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub user_id: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: OffsetDateTime,
    /// Current bearer token; a fresh login overwrites it, invalidating the
    /// previous one (single active token per user).
    pub token: Option<String>,
}

pub fn new_user_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("user_{}", &hex[..12])
}

/// True when the error is a Postgres unique-constraint violation (23505).
/// Two racing signups both pass the pre-insert email check; the loser's
/// insert fails with this code and must surface as a conflict, not a 500.
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .and_then(|db| db.code())
        .map(|code| code == "23505")
        .unwrap_or(false)
}

impl User {
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, email, password_hash, created_at, token
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_token(db: &PgPool, token: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, email, password_hash, created_at, token
            FROM users
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create a new user with hashed password.
    pub async fn create(db: &PgPool, email: &str, password_hash: &str) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (user_id, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING user_id, email, password_hash, created_at, token
            "#,
        )
        .bind(new_user_id())
        .bind(email)
        .bind(password_hash)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    /// Replace the stored bearer token; last write wins on concurrent logins.
    pub async fn set_token(db: &PgPool, user_id: &str, token: &str) -> anyhow::Result<()> {
        sqlx::query("UPDATE users SET token = $1 WHERE user_id = $2")
            .bind(token)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_violation_detection_ignores_other_errors() {
        assert!(!is_unique_violation(&anyhow::anyhow!("boom")));
        assert!(!is_unique_violation(&anyhow::Error::from(
            sqlx::Error::RowNotFound
        )));
    }

    #[test]
    fn user_ids_are_prefixed_and_unique() {
        let a = new_user_id();
        let b = new_user_id();
        assert!(a.starts_with("user_"));
        assert_eq!(a.len(), "user_".len() + 12);
        assert_ne!(a, b);
    }
}
