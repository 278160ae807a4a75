use serde::{Deserialize, Serialize};

use crate::sessions::aggregate::AggregateScores;

#[derive(Debug, Deserialize)]
pub struct StartSessionRequest {
    pub avatar_url: Option<String>,
    #[serde(default = "anonymous_user")]
    pub user_id: String,
}

fn anonymous_user() -> String {
    "anonymous".into()
}

impl Default for StartSessionRequest {
    fn default() -> Self {
        Self {
            avatar_url: None,
            user_id: anonymous_user(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StartSessionResponse {
    pub session_id: String,
    pub message: &'static str,
}

#[derive(Debug, Default, Deserialize)]
pub struct EndSessionRequest {
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EndSessionResponse {
    pub message: &'static str,
    pub scores: AggregateScores,
    /// Null when the feedback generator is disabled or failed.
    pub feedback: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn start_request_defaults_to_anonymous() {
        let req: StartSessionRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(req.user_id, "anonymous");
        assert_eq!(req.avatar_url, None);

        let req = StartSessionRequest::default();
        assert_eq!(req.user_id, "anonymous");
    }

    #[test]
    fn start_request_accepts_explicit_fields() {
        let req: StartSessionRequest = serde_json::from_value(json!({
            "avatar_url": "https://cdn.example/avatars/1.glb",
            "user_id": "user_0123456789ab"
        }))
        .unwrap();
        assert_eq!(
            req.avatar_url.as_deref(),
            Some("https://cdn.example/avatars/1.glb")
        );
        assert_eq!(req.user_id, "user_0123456789ab");
    }

    #[test]
    fn end_response_serializes_null_feedback() {
        let resp = EndSessionResponse {
            message: "session ended",
            scores: AggregateScores::default(),
            feedback: None,
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert!(json["feedback"].is_null());
        assert_eq!(json["scores"]["final"], 0.0);
    }
}
