use sqlx::types::Json;
use sqlx::{FromRow, PgPool};

/// One questionnaire row per user; absent until the first save.
#[derive(Debug, Clone, FromRow)]
pub struct OnboardingRecord {
    pub user_id: String,
    pub knowledge_level: Option<String>,
    pub goals: Json<Vec<String>>,
    pub preferred_session_mins: Option<i32>,
    pub completed: bool,
}

pub async fn find_by_user(db: &PgPool, user_id: &str) -> anyhow::Result<Option<OnboardingRecord>> {
    let record = sqlx::query_as::<_, OnboardingRecord>(
        r#"
        SELECT user_id, knowledge_level, goals, preferred_session_mins, completed
        FROM onboarding
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await?;
    Ok(record)
}

/// Create or merge-update the user's questionnaire. The three answer fields
/// are written as given; `completed` only ever flips to true and stays there.
pub async fn upsert(
    db: &PgPool,
    user_id: &str,
    knowledge_level: Option<&str>,
    goals: &[String],
    preferred_session_mins: Option<i32>,
    complete: bool,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO onboarding (user_id, knowledge_level, goals, preferred_session_mins, completed)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (user_id) DO UPDATE SET
            knowledge_level = EXCLUDED.knowledge_level,
            goals = EXCLUDED.goals,
            preferred_session_mins = EXCLUDED.preferred_session_mins,
            completed = onboarding.completed OR EXCLUDED.completed
        "#,
    )
    .bind(user_id)
    .bind(knowledge_level)
    .bind(Json(goals.to_vec()))
    .bind(preferred_session_mins)
    .bind(complete)
    .execute(db)
    .await?;
    Ok(())
}
