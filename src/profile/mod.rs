use anyhow::{Context, Result};
use fs_err as fs;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;

use crate::errors::PlanError;
use crate::plan::Quota;

/// Everything the generation prompt needs to know about a business.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BusinessProfile {
    pub business_name: String,
    pub business_type: String,
    pub nature_of_business: String,
    pub content_pillars: String,
    pub events_and_holidays: String,
    pub target_audience: String,
    pub tone_of_voice: String,
    pub services_products: String,
    pub business_location: String,
    pub contact_info: String,
    pub graphics_posts_per_month: u32,
    pub reels_per_month: u32,
    pub seasonal_promotions: String,
    pub fixed_hashtags: String,
}

impl BusinessProfile {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        let profile = match ext.as_str() {
            "json" => serde_json::from_str::<Self>(&raw).map_err(anyhow::Error::from),
            "toml" => toml::from_str::<Self>(&raw).map_err(anyhow::Error::from),
            "yaml" | "yml" => serde_yaml::from_str::<Self>(&raw).map_err(anyhow::Error::from),
            other => return Err(PlanError::Format(format!("profile extension '{other}'")).into()),
        };
        profile.with_context(|| format!("could not read profile {}", path.display()))
    }

    /// Collects every problem rather than stopping at the first.
    pub fn validate(&self) -> Result<(), PlanError> {
        let required = [
            ("businessName", &self.business_name),
            ("natureOfBusiness", &self.nature_of_business),
            ("contentPillars", &self.content_pillars),
            ("targetAudience", &self.target_audience),
            ("toneOfVoice", &self.tone_of_voice),
            ("servicesProducts", &self.services_products),
        ];
        let problems: Vec<String> = required
            .iter()
            .filter(|(_, v)| v.trim().is_empty())
            .map(|(k, _)| format!("{k} is required"))
            .collect();

        if problems.is_empty() {
            Ok(())
        } else {
            Err(PlanError::Profile(problems))
        }
    }

    pub fn quota(&self) -> Quota {
        Quota {
            graphics_per_month: self.graphics_posts_per_month as usize,
            reels_per_month: self.reels_per_month as usize,
        }
    }

    pub fn fixed_hashtags(&self) -> Vec<String> {
        normalize_hashtags(split_tags(&self.fixed_hashtags))
    }

    pub fn sample() -> Self {
        Self {
            business_name: "The Cozy Corner Cafe".into(),
            business_type: "Food & Beverage".into(),
            nature_of_business: "Cafe / Coffee Shop".into(),
            content_pillars: "Community, Quality Coffee, Behind the Scenes, Daily Specials".into(),
            events_and_holidays: "National Coffee Day, Halloween, Start of Fall Semester".into(),
            target_audience: "University students, young professionals, remote workers, and local families. Aged 18-45.".into(),
            tone_of_voice: "Warm, friendly, and slightly witty.".into(),
            services_products: "Espresso drinks, drip coffee, cold brew, tea, croissants, muffins, sandwiches, salads".into(),
            business_location: "Anytown, USA".into(),
            contact_info: "cozycornercafe.example, @cozycornercafe".into(),
            graphics_posts_per_month: 8,
            reels_per_month: 4,
            seasonal_promotions: String::new(),
            fixed_hashtags: "#cozycornercafe #anytowncoffee #specialtycoffee".into(),
        }
    }
}

fn split_tags(s: &str) -> impl Iterator<Item = &str> {
    static SEP: OnceLock<Regex> = OnceLock::new();
    SEP.get_or_init(|| Regex::new(r"[\s,]+").expect("static regex"))
        .split(s)
}

/// `coffee`, `#coffee` and `##Coffee` all become one `#`-prefixed tag;
/// first spelling wins on case-insensitive duplicates.
pub fn normalize_hashtags<'a, I>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for t in tags {
        let bare = t.trim().trim_start_matches('#');
        if bare.is_empty() {
            continue;
        }
        if seen.insert(bare.to_lowercase()) {
            out.push(format!("#{bare}"));
        }
    }
    out
}
