use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[value(name = "openai", alias = "open-ai")]
    OpenAI,
    Anthropic,
    Ollama,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[value(alias = "md")]
    Markdown,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Markdown => "md",
            ExportFormat::Json => "json",
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "content_plan_gen", version, about = "Generate a 3-month social media content plan from a business profile")]
pub struct Args {
    /// Business profile (.json, .toml, .yaml)
    #[arg(long, conflicts_with = "sample")]
    pub profile: Option<String>,

    /// Use the built-in sample profile
    #[arg(long, default_value_t = false)]
    pub sample: bool,

    #[arg(long)]
    pub config: Option<String>,

    #[arg(long, value_enum)]
    pub provider: Option<ProviderKind>,

    #[arg(long)]
    pub model: Option<String>,

    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Override the profile's graphics posts per month
    #[arg(long)]
    pub graphics: Option<u32>,

    /// Override the profile's reels per month
    #[arg(long)]
    pub reels: Option<u32>,

    /// Write the plan to this file
    #[arg(long)]
    pub export: Option<String>,

    #[arg(long, value_enum)]
    pub format: Option<ExportFormat>,

    #[arg(long)]
    pub out_dir: Option<String>,

    #[arg(long, default_value_t = false)]
    pub suggest_hashtags: bool,

    /// Print copy-ready plain text instead of the colored view
    #[arg(long, default_value_t = false)]
    pub plain: bool,

    #[arg(long, default_value_t = false)]
    pub save_request: bool,

    #[arg(long, default_value_t = false)]
    pub save_response: bool,

    #[arg(long, default_value_t = false)]
    pub debug: bool,

    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
}
