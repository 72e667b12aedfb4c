use anyhow::Result;
use serde_json::Value;
use tracing::{info, warn};

use crate::errors::PlanError;
use crate::generate::SCHEMA_VERSION;
use crate::plan::ContentPlan;
use crate::profile::{normalize_hashtags, BusinessProfile};
use crate::prompt;
use crate::provider::Provider;
use crate::wire::{Flow, HashtagResponse, Instruction, LlmRequest, Tx};

pub fn request(profile: &BusinessProfile, plan: &ContentPlan, tx: Tx) -> LlmRequest {
    LlmRequest {
        schema_version: SCHEMA_VERSION.into(),
        flow: Flow::Hashtags,
        transaction: tx,
        instruction: Instruction {
            system: prompt::hashtags_system(),
            user: prompt::hashtags_user(profile, plan),
            developer: None,
        },
    }
}

/// Suggested tags, `#`-prefixed and deduplicated, minus the profile's fixed ones.
pub fn parse(raw: &Value, fixed: &[String]) -> Result<Vec<String>> {
    let resp: HashtagResponse = serde_json::from_value(raw.clone())
        .map_err(|e| PlanError::Provider(format!("unexpected hashtag response: {e}")))?;
    let fixed_lower: Vec<String> = fixed.iter().map(|t| t.to_lowercase()).collect();
    Ok(normalize_hashtags(resp.hashtags.iter().map(String::as_str))
        .into_iter()
        .filter(|t| !fixed_lower.contains(&t.to_lowercase()))
        .collect())
}

pub async fn suggest(
    prov: &dyn Provider,
    req: &LlmRequest,
    fixed: &[String],
    debug: bool,
) -> Result<(Vec<String>, Value)> {
    let raw = prov.send(req, debug).await?;
    let tags = parse(&raw, fixed)?;
    info!(tx = %req.transaction.id, count = tags.len(), "hashtags_suggested");
    Ok((tags, raw))
}

/// Optional step: a failed call yields no suggestions instead of an error, so
/// the already generated plan still gets rendered and exported.
pub async fn suggest_or_skip(
    prov: &dyn Provider,
    req: &LlmRequest,
    fixed: &[String],
    debug: bool,
) -> (Vec<String>, Option<Value>) {
    match suggest(prov, req, fixed, debug).await {
        Ok((tags, raw)) => (tags, Some(raw)),
        Err(e) => {
            warn!(tx = %req.transaction.id, error = %e, "hashtags_skipped");
            (Vec::new(), None)
        }
    }
}
