use chrono::{Datelike, NaiveDate};

use crate::plan::ContentPlan;
use crate::profile::BusinessProfile;

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

/// The three calendar months after `today`'s month.
pub fn upcoming_months(today: NaiveDate) -> [&'static str; 3] {
    let m = today.month0() as usize;
    [1, 2, 3].map(|i| MONTH_NAMES[(m + i) % 12])
}

fn post_schema() -> &'static str {
r#"{
  "contentPlan": [
    {
      "month": string,            // calendar month name, e.g. "August"
      "postType": "graphic" | "reel",
      "tags": [string],           // style labels, at least one
      "title": string,
      "content": string,
      "caption": string,
      "visualSuggestion": string,
      "hashtags": [string],       // exactly 3
      "cta": string
    }
  ]
}"#
}

fn post_type_rules() -> &'static str {
r#"REELS:
- 'content' describes 4 slides, one per line, each starting with "Slide X:".
  Slide 1: catchy title (also used as 'title'). Slide 2: one full sentence. Slide 3: one full sentence. Slide 4: one full CTA sentence.
- 'caption' is 3 to 5 sentences, contains a call to action and more than two emojis.
- 'hashtags' has exactly 3 entries: business location as #CityState (e.g. #AnytownUSA), the industry (e.g. #CoffeeShop), the topic of the post (e.g. #PumpkinSpice).
- The caption includes those 3 hashtags.

GRAPHICS:
- 'content' uses a first-person voice (we/our), is conversational, at most 3 sentences, without repetition.
- 'tags' suggests a style such as "Featured Service", "List-Type", "Info Text", or "Event Post" when an event is relevant.
- 'caption' is 3 to 5 sentences, contains a call to action and more than two emojis.
- 'hashtags' has exactly 3 entries: business location, industry, topic of the post.
- The caption includes those 3 hashtags."#
}

pub fn content_plan_system() -> String {
    format!(r#"You are an expert social media content planner.

Return EXACTLY ONE JSON object (no markdown, no prose, no code fences) shaped as:

{schema}

Every field is required and must be non-empty. Text must be clean, professional, human-readable English; avoid stray symbols, character artifacts, or nonsensical text outside the emojis requested for captions.

{rules}"#,
        schema = post_schema(),
        rules = post_type_rules()
    )
}

pub fn content_plan_user(p: &BusinessProfile, today: NaiveDate) -> String {
    let months = upcoming_months(today);
    let mut lines = vec![
        format!("The current date is {}. Plan the three calendar months immediately following it: {}.", today.format("%Y-%m-%d"), months.join(", ")),
        String::new(),
        format!("Business Name: {}", p.business_name),
    ];
    let optional = |label: &str, v: &str| (!v.trim().is_empty()).then(|| format!("{label}: {v}"));
    lines.extend(optional("Business Type", &p.business_type));
    lines.push(format!("Nature of Business: {}", p.nature_of_business));
    lines.push(format!("Content Pillars: {}", p.content_pillars));
    lines.extend(optional("Events & Holidays", &p.events_and_holidays));
    lines.push(format!("Target Audience: {}", p.target_audience));
    lines.push(format!("Tone of Voice: {}", p.tone_of_voice));
    lines.push(format!("Services/Products: {}", p.services_products));
    lines.extend(optional("Business Location", &p.business_location));
    lines.extend(optional("Contact Info", &p.contact_info));
    lines.extend(optional("Seasonal Promotions", &p.seasonal_promotions));
    lines.push(format!("Graphics Posts per Month: {}", p.graphics_posts_per_month));
    lines.push(format!("Reels per Month: {}", p.reels_per_month));
    let fixed = p.fixed_hashtags();
    if !fixed.is_empty() {
        lines.push(format!("Fixed Hashtags: {}", fixed.join(" ")));
    }
    lines.push(String::new());
    lines.push("Align every post with the business's nature, target audience, and tone of voice.".into());
    lines.push(format!(
        "For each of the 3 months create exactly {} graphics posts and exactly {} reels. Do not create more or fewer. If a value is 0, create no posts of that type.",
        p.graphics_posts_per_month, p.reels_per_month
    ));
    lines.join("\n")
}

pub fn hashtags_system() -> String {
    r#"You are a social media expert. Suggest hashtags that increase the reach of the business's posts.

Return EXACTLY ONE JSON object (no markdown, no code fences): { "hashtags": [string] }"#.to_string()
}

pub fn hashtags_user(p: &BusinessProfile, plan: &ContentPlan) -> String {
    let summary: Vec<String> = plan
        .posts
        .iter()
        .map(|post| format!("- [{} / {}] {}", post.month, post.post_type, post.title))
        .collect();
    format!(
        "Business Name: {}\nBusiness Type: {}\nNature of Business: {}\nContent Pillars: {}\nTarget Audience: {}\nTone of Voice: {}\nServices/Products: {}\nGenerated Content Plan:\n{}",
        p.business_name,
        p.business_type,
        p.nature_of_business,
        p.content_pillars,
        p.target_audience,
        p.tone_of_voice,
        p.services_products,
        summary.join("\n")
    )
}
