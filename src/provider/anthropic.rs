use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::errors::PlanError;
use crate::wire::LlmRequest;
use super::{extract_json_object, Provider};

pub struct Anthropic {
    pub model: String,
    pub api_key: String,
    pub api_base: String,
    pub api_version: String,
    pub max_tokens: u32,
    pub timeout: Duration,
}

#[derive(Serialize)]
struct MsgRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Msg<'a>>,
    system: &'a str,
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MsgResponse {
    content: Vec<Block>,
}

#[derive(Deserialize)]
struct Block {
    #[serde(default)]
    text: String,
    #[serde(default)]
    r#type: String,
}

impl Anthropic {
    fn request_body<'a>(&'a self, req: &'a LlmRequest, system: &'a str) -> MsgRequest<'a> {
        MsgRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: vec![Msg { role: "user", content: &req.instruction.user }],
            system,
        }
    }
}

#[async_trait]
impl Provider for Anthropic {
    async fn send(&self, req: &LlmRequest, debug: bool) -> Result<Value> {
        let url = format!("{}/v1/messages", self.api_base.trim_end_matches('/'));
        let client = Client::builder().timeout(self.timeout).build()?;
        let system = req.instruction.system_with_notes();
        let body = self.request_body(req, &system);

        debug!(%url, model = %self.model, flow = req.flow.stage(), "anthropic_request");
        if debug {
            eprintln!("debug/anthropic: POST {}", url);
        }

        let resp = client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", &self.api_version)
            .json(&body)
            .send()
            .await
            .context("anthropic request failed")?;

        let status = resp.status();
        let text = resp.text().await.context("anthropic read body failed")?;
        if debug {
            eprintln!("debug/anthropic: status {status}, raw body:\n{}\n", text);
        }
        if !status.is_success() {
            return Err(PlanError::Provider(format!("Anthropic API error ({status}): {text}")).into());
        }

        let parsed: MsgResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("anthropic response parse error: {}", e))?;

        let content = parsed
            .content
            .into_iter()
            .find(|b| b.r#type == "text" && !b.text.is_empty())
            .map(|b| b.text)
            .ok_or_else(|| PlanError::Provider("anthropic: empty content".into()))?;

        extract_json_object(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::{Flow, Instruction, Tx};

    #[test]
    fn request_body_carries_system_and_max_tokens() {
        let prov = Anthropic {
            model: "claude-3-5-sonnet-latest".into(),
            api_key: "k".into(),
            api_base: "https://api.anthropic.com".into(),
            api_version: "2023-06-01".into(),
            max_tokens: 8192,
            timeout: Duration::from_secs(5),
        };
        let req = LlmRequest {
            schema_version: "v1".into(),
            flow: Flow::Hashtags,
            transaction: Tx { id: uuid::Uuid::nil(), timestamp: chrono::Utc::now() },
            instruction: Instruction { system: "sys".into(), user: "tags please".into(), developer: None },
        };
        let system = req.instruction.system_with_notes();
        let v = serde_json::to_value(prov.request_body(&req, &system)).unwrap();
        assert_eq!(v["system"], "sys");
        assert_eq!(v["max_tokens"], 8192);
        assert_eq!(v["messages"].as_array().unwrap().len(), 1);
        assert_eq!(v["messages"][0]["role"], "user");
        assert_eq!(v["messages"][0]["content"], "tags please");
    }
}
