use anyhow::{Context, Result};
use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::cli::{Args, ExportFormat, ProviderKind};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub provider: ProviderKind,
    pub model: String,
    pub timeout_secs: u64,
    pub out_dir: String,
    pub export_format: ExportFormat,
    pub max_tokens: u32,
    pub temperature: f32,
    pub openai_url: String,
    pub anthropic_url: String,
    pub anthropic_version: String,
    pub ollama_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderKind::OpenAI,
            model: "gpt-4.1-mini".into(),
            timeout_secs: 300,
            out_dir: ".content-plan".into(),
            export_format: ExportFormat::Markdown,
            max_tokens: 8192,
            temperature: 0.7,
            openai_url: "https://api.openai.com".into(),
            anthropic_url: "https://api.anthropic.com".into(),
            anthropic_version: "2023-06-01".into(),
            ollama_url: "http://localhost:11434".into(),
        }
    }
}

impl Config {
    /// Defaults, overlaid with the TOML file at `path` when given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            None => Ok(Self::default()),
            Some(p) => {
                let raw = fs::read_to_string(p)?;
                toml::from_str(&raw).with_context(|| format!("invalid config file {}", p.display()))
            }
        }
    }

    pub fn apply_args(&mut self, args: &Args) {
        if let Some(p) = args.provider {
            if p != self.provider && args.model.is_none() {
                self.model = default_model(p).into();
            }
            self.provider = p;
        }
        if let Some(m) = &args.model {
            self.model = m.clone();
        }
        if let Some(t) = args.timeout_secs {
            self.timeout_secs = t;
        }
        if let Some(d) = &args.out_dir {
            self.out_dir = d.clone();
        }
        if let Some(f) = args.format {
            self.export_format = f;
        }
    }
}

fn default_model(kind: ProviderKind) -> &'static str {
    match kind {
        ProviderKind::OpenAI => "gpt-4.1-mini",
        ProviderKind::Anthropic => "claude-3-5-sonnet-latest",
        ProviderKind::Ollama => "llama3.1",
    }
}
