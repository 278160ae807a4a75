use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::AppConfig;
use crate::feedback::{DisabledFeedback, FeedbackGenerator, GeminiFeedback};

/// Shared per-process resources, cloned into every handler. Handlers hold no
/// other state.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub feedback: Arc<dyn FeedbackGenerator>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;

        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        let feedback: Arc<dyn FeedbackGenerator> = match &config.feedback {
            Some(cfg) => Arc::new(GeminiFeedback::new(cfg)?),
            None => {
                tracing::warn!("GEMINI_API_KEY not set; session feedback disabled");
                Arc::new(DisabledFeedback)
            }
        };

        Ok(Self { db, feedback })
    }
}
