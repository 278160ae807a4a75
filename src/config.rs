use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackConfig {
    pub api_key: String,
    pub model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    /// Absent when no GEMINI_API_KEY is configured; feedback is then disabled.
    pub feedback: Option<FeedbackConfig>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let feedback = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .map(|api_key| FeedbackConfig {
                api_key,
                model: std::env::var("GEMINI_MODEL")
                    .unwrap_or_else(|_| "gemini-1.5-flash".into()),
            });
        Ok(Self {
            database_url,
            feedback,
        })
    }
}
