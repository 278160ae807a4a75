use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveOnboardingRequest {
    pub knowledge_level: Option<String>,
    #[serde(default)]
    pub goals: Vec<String>,
    pub preferred_session_mins: Option<i32>,
    #[serde(default)]
    pub complete: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingView {
    pub knowledge_level: Option<String>,
    pub goals: Vec<String>,
    pub preferred_session_mins: Option<i32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchOnboardingResponse {
    pub onboarding_completed: bool,
    pub onboarding: OnboardingView,
}

/// Echo of the fields written by a save; `completed` appears only when the
/// request set it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedFields {
    pub knowledge_level: Option<String>,
    pub goals: Vec<String>,
    pub preferred_session_mins: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct SaveOnboardingResponse {
    pub ok: bool,
    pub saved: SavedFields,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_body_yields_defaults() {
        let req: SaveOnboardingRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(req.knowledge_level, None);
        assert!(req.goals.is_empty());
        assert_eq!(req.preferred_session_mins, None);
        assert!(!req.complete);
    }

    #[test]
    fn fields_use_camel_case() {
        let req: SaveOnboardingRequest = serde_json::from_value(json!({
            "knowledgeLevel": "beginner",
            "goals": ["travel", "work"],
            "preferredSessionMins": 15,
            "complete": true
        }))
        .unwrap();
        assert_eq!(req.knowledge_level.as_deref(), Some("beginner"));
        assert_eq!(req.goals, vec!["travel", "work"]);
        assert_eq!(req.preferred_session_mins, Some(15));
        assert!(req.complete);
    }

    #[test]
    fn saved_omits_completed_unless_set() {
        let saved = SavedFields {
            knowledge_level: None,
            goals: vec![],
            preferred_session_mins: None,
            completed: None,
        };
        let json = serde_json::to_value(&saved).unwrap();
        assert!(json.get("completed").is_none());

        let saved = SavedFields {
            completed: Some(true),
            ..saved
        };
        let json = serde_json::to_value(&saved).unwrap();
        assert_eq!(json["completed"], true);
    }
}
