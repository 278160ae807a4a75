use std::time::Duration;

use anyhow::{bail, Context};
use async_trait::async_trait;
use serde_json::{json, Value};

use crate::config::FeedbackConfig;
use crate::sessions::aggregate::AggregateScores;

/// Turns a session's aggregate scores and mistakes into feedback text.
///
/// `Ok(None)` means no feedback is available (generator disabled); callers
/// must treat errors the same way rather than failing the request.
#[async_trait]
pub trait FeedbackGenerator: Send + Sync {
    async fn generate(
        &self,
        scores: &AggregateScores,
        mistakes: &[Value],
    ) -> anyhow::Result<Option<String>>;
}

/// No-op generator used when no API key is configured.
pub struct DisabledFeedback;

#[async_trait]
impl FeedbackGenerator for DisabledFeedback {
    async fn generate(
        &self,
        _scores: &AggregateScores,
        _mistakes: &[Value],
    ) -> anyhow::Result<Option<String>> {
        Ok(None)
    }
}

pub struct GeminiFeedback {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiFeedback {
    pub fn new(cfg: &FeedbackConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .context("build feedback http client")?;
        Ok(Self {
            client,
            api_key: cfg.api_key.clone(),
            model: cfg.model.clone(),
        })
    }

    fn prompt(scores: &AggregateScores, mistakes: &[Value]) -> String {
        format!(
            "You are a language tutor. A learner finished a practice session with \
             these scores out of 100: grammar {}, pronunciation {}, semantic {}, \
             fluency {}, final {}. Mistakes made during the session: {}. \
             Write a short, encouraging feedback paragraph with one concrete tip.",
            scores.grammar,
            scores.pronunciation,
            scores.semantic,
            scores.fluency,
            scores.final_score,
            serde_json::to_string(mistakes).unwrap_or_else(|_| "[]".into()),
        )
    }
}

#[async_trait]
impl FeedbackGenerator for GeminiFeedback {
    async fn generate(
        &self,
        scores: &AggregateScores,
        mistakes: &[Value],
    ) -> anyhow::Result<Option<String>> {
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            self.model, self.api_key
        );
        let body = json!({
            "contents": [{ "parts": [{ "text": Self::prompt(scores, mistakes) }] }]
        });

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .context("feedback request failed")?;

        if !resp.status().is_success() {
            bail!("feedback generator returned {}", resp.status());
        }

        let payload: Value = resp.json().await.context("decode feedback response")?;
        let text = payload["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(|s| s.to_string());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_includes_scores_and_mistakes() {
        let scores = AggregateScores {
            grammar: 85.0,
            pronunciation: 0.0,
            semantic: 0.0,
            fluency: 60.0,
            final_score: 36.25,
        };
        let mistakes = vec![json!({"word": "gato", "expected": "perro"})];
        let prompt = GeminiFeedback::prompt(&scores, &mistakes);
        assert!(prompt.contains("grammar 85"));
        assert!(prompt.contains("final 36.25"));
        assert!(prompt.contains("gato"));
    }

    #[tokio::test]
    async fn disabled_generator_yields_none() {
        let scores = AggregateScores::default();
        let out = DisabledFeedback
            .generate(&scores, &[])
            .await
            .expect("disabled generator never errors");
        assert_eq!(out, None);
    }
}
