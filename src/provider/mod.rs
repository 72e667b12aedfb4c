use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use crate::cli::ProviderKind;
use crate::config::Config;
use crate::wire::LlmRequest;

pub mod openai;
pub mod anthropic;
pub mod ollama;

/// A hosted model that answers an [`LlmRequest`] with one JSON object.
#[async_trait]
pub trait Provider: Send + Sync {
    async fn send(&self, req: &LlmRequest, debug: bool) -> Result<Value>;
}

pub type DynProvider = Box<dyn Provider + Send + Sync>;

pub fn make_provider(cfg: &Config) -> Result<DynProvider> {
    let timeout = Duration::from_secs(cfg.timeout_secs);
    match cfg.provider {
        ProviderKind::OpenAI => Ok(Box::new(openai::OpenAIProvider {
            model: cfg.model.clone(),
            api_key: api_key("OPENAI_API_KEY")?,
            api_base: cfg.openai_url.clone(),
            temperature: cfg.temperature,
            timeout,
        })),
        ProviderKind::Anthropic => Ok(Box::new(anthropic::Anthropic {
            model: cfg.model.clone(),
            api_key: api_key("ANTHROPIC_API_KEY")?,
            api_base: cfg.anthropic_url.clone(),
            api_version: cfg.anthropic_version.clone(),
            max_tokens: cfg.max_tokens,
            timeout,
        })),
        ProviderKind::Ollama => Ok(Box::new(ollama::Ollama {
            model: cfg.model.clone(),
            url: cfg.ollama_url.clone(),
            temperature: cfg.temperature,
            timeout,
        })),
    }
}

fn api_key(var: &str) -> Result<String> {
    std::env::var(var).map_err(|_| anyhow!("{var} env var is not set"))
}

/// Parses model text into a JSON object, tolerating code fences and prose
/// around the object.
pub fn extract_json_object(text: &str) -> Result<Value> {
    let trimmed = text.trim();
    if let Ok(v @ Value::Object(_)) = serde_json::from_str::<Value>(trimmed) {
        return Ok(v);
    }
    let unfenced = strip_code_fence(trimmed);
    if let Ok(v @ Value::Object(_)) = serde_json::from_str::<Value>(unfenced) {
        return Ok(v);
    }
    if let Some(obj) = first_json_object(unfenced) {
        if let Ok(v) = serde_json::from_str::<Value>(obj) {
            return Ok(v);
        }
    }
    Err(anyhow!(
        "Model did not return a valid JSON object.\n--- content start ---\n{}\n--- content end ---",
        text
    ))
}

fn strip_code_fence(s: &str) -> &str {
    let Some(rest) = s.strip_prefix("```") else { return s };
    let body = match rest.find('\n') {
        Some(nl) => &rest[nl + 1..],
        None => rest,
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// First balanced top-level `{...}` substring. Braces inside string literals
/// are ignored.
fn first_json_object(s: &str) -> Option<&str> {
    let mut start = None;
    let mut depth = 0usize;
    let mut in_str = false;
    let mut escaped = false;

    for (i, b) in s.bytes().enumerate() {
        if in_str {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_str = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' if start.is_some() => in_str = true,
            b'{' => {
                start.get_or_insert(i);
                depth += 1;
            }
            b'}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    return start.map(|st| &s[st..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_object() {
        assert_eq!(extract_json_object(r##" {"hashtags":["#a"]} "##).unwrap(), json!({"hashtags": ["#a"]}));
    }

    #[test]
    fn fenced_object() {
        let text = "```json\n{\"contentPlan\": []}\n```";
        assert_eq!(extract_json_object(text).unwrap(), json!({"contentPlan": []}));
    }

    #[test]
    fn object_inside_prose_with_braces_in_strings() {
        let text = r#"Sure! Here is the plan: {"caption": "use {curly} \"quotes\" }", "n": {"x": 1}} Enjoy."#;
        let v = extract_json_object(text).unwrap();
        assert_eq!(v["caption"], "use {curly} \"quotes\" }");
        assert_eq!(v["n"]["x"], 1);
    }

    #[test]
    fn non_object_is_an_error() {
        assert!(extract_json_object("[1, 2, 3]").is_err());
        assert!(extract_json_object("no json here").is_err());
        assert!(extract_json_object("{\"open\": ").is_err());
    }
}
