use anyhow::Result;
use chrono::NaiveDate;
use serde_json::Value;
use tracing::{info, warn};

use crate::plan::{ContentPlan, Quota};
use crate::profile::BusinessProfile;
use crate::prompt;
use crate::provider::Provider;
use crate::wire::{ContentPlanResponse, Flow, Instruction, LlmRequest, Tx};

pub const SCHEMA_VERSION: &str = "v1";

pub fn content_plan_request(profile: &BusinessProfile, today: NaiveDate, tx: Tx) -> LlmRequest {
    LlmRequest {
        schema_version: SCHEMA_VERSION.into(),
        flow: Flow::ContentPlan,
        transaction: tx,
        instruction: Instruction {
            system: prompt::content_plan_system(),
            user: prompt::content_plan_user(profile, today),
            developer: Some("Output exactly one JSON object with a 'contentPlan' array; no markdown or code fences.".into()),
        },
    }
}

/// Turns the raw model object into a normalized plan. A missing or malformed
/// `contentPlan` is an empty plan.
pub fn plan_from_response(raw: &Value, quota: Quota) -> ContentPlan {
    let parsed = match serde_json::from_value::<ContentPlanResponse>(raw.clone()) {
        Ok(r) => r,
        Err(e) => {
            warn!(error = %e, "content_plan_unreadable");
            ContentPlanResponse::default()
        }
    };
    ContentPlan::from_candidates(parsed.content_plan.as_deref(), quota)
}

/// One generation round trip. Provider failures propagate unchanged.
pub async fn generate(
    prov: &dyn Provider,
    req: &LlmRequest,
    quota: Quota,
    debug: bool,
) -> Result<(ContentPlan, Value)> {
    let raw = prov.send(req, debug).await?;
    let plan = plan_from_response(&raw, quota);
    info!(
        tx = %req.transaction.id,
        posts = plan.posts.len(),
        rejected = plan.rejected,
        "content_plan_generated"
    );
    Ok((plan, raw))
}
