use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// ========================================
/// Request/Response envelopes
/// ========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flow {
    ContentPlan,
    Hashtags,
}

impl Flow {
    pub fn stage(self) -> &'static str {
        match self {
            Flow::ContentPlan => "content_plan",
            Flow::Hashtags => "hashtags",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tx {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instruction {
    pub system: String,
    pub user: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub developer: Option<String>,
}

impl Instruction {
    /// System text with developer notes appended, for providers with a single
    /// system slot.
    pub fn system_with_notes(&self) -> String {
        let mut system = self.system.clone();
        if let Some(dev) = &self.developer {
            system.push_str("\n\nDeveloper notes:\n");
            system.push_str(dev);
        }
        system
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmRequest {
    pub schema_version: String,
    pub flow: Flow,
    pub transaction: Tx,
    pub instruction: Instruction,
}

/// Raw model output for the content plan flow. Records stay untyped until the
/// shape check admits them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentPlanResponse {
    #[serde(default)]
    pub content_plan: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HashtagResponse {
    #[serde(default)]
    pub hashtags: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_content_plan_is_none() {
        let r: ContentPlanResponse = serde_json::from_value(json!({"other": 1})).unwrap();
        assert!(r.content_plan.is_none());
        let r: ContentPlanResponse = serde_json::from_value(json!({"contentPlan": null})).unwrap();
        assert!(r.content_plan.is_none());
    }

    #[test]
    fn content_plan_keeps_arbitrary_records() {
        let r: ContentPlanResponse =
            serde_json::from_value(json!({"contentPlan": [{"month": 3}, "junk"]})).unwrap();
        assert_eq!(r.content_plan.unwrap().len(), 2);
    }

    #[test]
    fn developer_notes_are_appended() {
        let ins = Instruction { system: "sys".into(), user: "u".into(), developer: Some("json only".into()) };
        assert_eq!(ins.system_with_notes(), "sys\n\nDeveloper notes:\njson only");
        let ins = Instruction { developer: None, ..ins };
        assert_eq!(ins.system_with_notes(), "sys");
    }
}
