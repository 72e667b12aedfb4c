use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::errors::PlanError;
use crate::wire::{Instruction, LlmRequest};
use super::{extract_json_object, Provider};

pub struct Ollama {
    pub model: String,
    pub url: String,
    pub temperature: f32,
    pub timeout: Duration,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Msg>,
    stream: bool,
    format: &'a str,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
}

#[derive(Serialize)]
struct Msg {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: MsgOut,
}

#[derive(Deserialize)]
struct MsgOut {
    content: String,
}

fn to_messages(ins: &Instruction) -> Vec<Msg> {
    vec![
        Msg { role: "system".into(), content: ins.system_with_notes() },
        Msg { role: "user".into(), content: ins.user.clone() },
    ]
}

#[async_trait]
impl Provider for Ollama {
    async fn send(&self, req: &LlmRequest, debug: bool) -> Result<Value> {
        let url = format!("{}/api/chat", self.url.trim_end_matches('/'));
        let client = Client::builder().timeout(self.timeout).build()?;
        let body = ChatRequest {
            model: &self.model,
            messages: to_messages(&req.instruction),
            stream: false,
            format: "json",
            options: OllamaOptions { temperature: self.temperature },
        };

        debug!(%url, model = %self.model, flow = req.flow.stage(), "ollama_request");
        if debug {
            eprintln!("debug/ollama: POST {}", url);
        }

        let resp = client
            .post(&url)
            .json(&body)
            .send()
            .await
            .context("ollama request failed")?;

        let status = resp.status();
        let text = resp.text().await.context("ollama read body failed")?;
        if debug {
            eprintln!("debug/ollama: status {status}, raw body:\n{}\n", text);
        }
        if !status.is_success() {
            return Err(PlanError::Provider(format!("Ollama error ({status}): {text}")).into());
        }

        // Some proxies return the model text directly instead of the chat envelope.
        let content = match serde_json::from_str::<ChatResponse>(&text) {
            Ok(c) => c.message.content,
            Err(_) => text,
        };

        extract_json_object(&content)
    }
}
