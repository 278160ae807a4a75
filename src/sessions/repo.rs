use serde_json::Value;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::sessions::aggregate::{AttemptData, AttemptScores};

pub fn new_session_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("sess_{}", &hex[..8])
}

pub async fn create(
    db: &PgPool,
    session_id: &str,
    user_id: &str,
    avatar_url: Option<&str>,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO sessions (session_id, user_id, avatar_url, started_at, status)
        VALUES ($1, $2, $3, now(), 'active')
        "#,
    )
    .bind(session_id)
    .bind(user_id)
    .bind(avatar_url)
    .execute(db)
    .await?;
    Ok(())
}

/// Mark a session completed. Unconditional: ending an already-ended or
/// unknown session is a no-op that still succeeds.
pub async fn complete(db: &PgPool, session_id: &str) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        UPDATE sessions
        SET status = 'completed', ended_at = now()
        WHERE session_id = $1
        "#,
    )
    .bind(session_id)
    .execute(db)
    .await?;
    Ok(())
}

#[derive(Debug, FromRow)]
struct AttemptRow {
    scores: Json<AttemptScores>,
    mistakes: Json<Value>,
}

/// Load the session's attempts in insertion order.
pub async fn attempts_for_session(
    db: &PgPool,
    session_id: &str,
) -> anyhow::Result<Vec<AttemptData>> {
    let rows = sqlx::query_as::<_, AttemptRow>(
        r#"
        SELECT scores, mistakes
        FROM attempts
        WHERE session_id = $1
        ORDER BY id ASC
        "#,
    )
    .bind(session_id)
    .fetch_all(db)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| AttemptData {
            scores: r.scores.0,
            mistakes: r.mistakes.0,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_ids_are_prefixed_and_unique() {
        let a = new_session_id();
        let b = new_session_id();
        assert!(a.starts_with("sess_"));
        assert_eq!(a.len(), "sess_".len() + 8);
        assert_ne!(a, b);
    }
}
