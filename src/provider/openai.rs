use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use crate::errors::PlanError;
use crate::wire::LlmRequest;
use super::{extract_json_object, Provider};

/// OpenAI chat completions in JSON-object mode.
pub struct OpenAIProvider {
    pub model: String,
    pub api_key: String,
    pub api_base: String,
    pub temperature: f32,
    pub timeout: Duration,
}

#[derive(Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

impl OpenAIProvider {
    fn request_body(&self, req: &LlmRequest) -> Value {
        json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": req.instruction.system_with_notes() },
                { "role": "user", "content": req.instruction.user }
            ],
            "temperature": self.temperature,
            "response_format": { "type": "json_object" }
        })
    }
}

#[async_trait]
impl Provider for OpenAIProvider {
    async fn send(&self, req: &LlmRequest, debug: bool) -> Result<Value> {
        let url = format!("{}/v1/chat/completions", self.api_base.trim_end_matches('/'));
        let client = Client::builder().timeout(self.timeout).build()?;

        let body = self.request_body(req);

        debug!(%url, model = %self.model, flow = req.flow.stage(), "openai_request");
        if debug {
            eprintln!("debug[openai]: POST {url} body:\n{}", serde_json::to_string_pretty(&body)?);
        }

        let resp = client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("openai request failed")?;

        let status = resp.status();
        let text = resp.text().await.context("openai read body failed")?;
        if debug {
            eprintln!("debug[openai]: status {status}, raw body:\n{text}");
        }
        if !status.is_success() {
            return Err(PlanError::Provider(format!("OpenAI API error ({status}): {text}")).into());
        }

        let parsed: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse OpenAI response: {e}\nRaw: {text}"))?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| PlanError::Provider("openai: empty completion".into()))?;

        extract_json_object(&content)
    }
}
