use anyhow::Result;
use fs_err as fs;
use serde_json::json;
use std::fmt::Write as _;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

use crate::cli::ExportFormat;
use crate::errors::PlanError;
use crate::plan::ContentPlan;

pub const TITLE: &str = "Your 3-Month Content Plan";

fn cell(s: &str) -> String {
    s.trim().replace('|', "\\|").replace("\r\n", "<br>").replace('\n', "<br>")
}

pub fn to_markdown(plan: &ContentPlan, suggested: &[String]) -> String {
    let mut out = format!("# {TITLE}\n\n");
    if !suggested.is_empty() {
        let _ = writeln!(out, "**Suggested hashtags:** {}\n", suggested.join(" "));
    }

    for (month, posts) in plan.months() {
        let _ = writeln!(out, "## {month}\n");
        out.push_str("| Month | Type | Title | Content | Caption | Hashtags |\n");
        out.push_str("|---|---|---|---|---|---|\n");
        for p in &posts {
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} | {} | {} |",
                cell(&p.month),
                p.post_type.as_str().to_uppercase(),
                cell(&p.title),
                cell(&p.content),
                cell(&p.caption),
                cell(&p.hashtags.join(" ")),
            );
        }
        out.push('\n');

        for (i, p) in posts.iter().enumerate() {
            let _ = writeln!(out, "### {}. {} POST: {}\n", i + 1, p.post_type.as_str().to_uppercase(), p.title);
            let _ = writeln!(out, "- **Tags:** {}", p.tags.join(", "));
            let _ = writeln!(out, "- **Visuals:** {}", p.visual_suggestion);
            let _ = writeln!(out, "- **CTA:** {}\n", p.cta);
        }
    }
    out
}

pub fn to_json(plan: &ContentPlan, suggested: &[String]) -> Result<String> {
    let mut doc = json!({ "contentPlan": plan.posts });
    if !suggested.is_empty() {
        doc["suggestedHashtags"] = json!(suggested);
    }
    Ok(serde_json::to_string_pretty(&doc)?)
}

/// Format implied by the file extension, else `fallback`.
pub fn format_for(path: &Path, fallback: ExportFormat) -> ExportFormat {
    match path.extension().and_then(|e| e.to_str()).map(str::to_lowercase).as_deref() {
        Some("md") | Some("markdown") => ExportFormat::Markdown,
        Some("json") => ExportFormat::Json,
        _ => fallback,
    }
}

/// Writes the plan through a temp file in the target directory. Returns bytes written.
pub fn write(plan: &ContentPlan, suggested: &[String], format: ExportFormat, path: &Path) -> Result<u64> {
    if plan.is_empty() {
        return Err(PlanError::EmptyExport.into());
    }
    let data = match format {
        ExportFormat::Markdown => to_markdown(plan, suggested),
        ExportFormat::Json => to_json(plan, suggested)?,
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;
    let tmp = NamedTempFile::new_in(dir)?;
    fs::write(tmp.path(), &data)?;
    tmp.persist(path)?;

    info!(path = %path.display(), format = format.extension(), bytes = data.len(), "plan_exported");
    Ok(data.len() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{Post, PostType};

    fn post(month: &str, kind: PostType, title: &str) -> Post {
        Post {
            month: month.into(),
            post_type: kind,
            tags: vec!["Event Post".into()],
            title: title.into(),
            content: "Slide 1: Hi\nSlide 2: There".into(),
            caption: "Fresh | hot".into(),
            visual_suggestion: "Latte art close-up".into(),
            hashtags: vec!["#AnytownUSA".into(), "#CoffeeShop".into()],
            cta: "Order ahead".into(),
        }
    }

    fn plan() -> ContentPlan {
        ContentPlan {
            posts: vec![
                post("August", PostType::Graphic, "Meet the Roaster"),
                post("August", PostType::Reel, "Cold Brew 101"),
                post("September", PostType::Reel, "Fall Menu"),
            ],
            rejected: 0,
        }
    }

    #[test]
    fn markdown_has_a_section_per_month_with_escaped_cells() {
        let md = to_markdown(&plan(), &[]);
        assert!(md.starts_with("# Your 3-Month Content Plan"));
        assert!(md.contains("## August"));
        assert!(md.contains("## September"));
        assert!(md.contains("| August | REEL | Cold Brew 101 | Slide 1: Hi<br>Slide 2: There | Fresh \\| hot | #AnytownUSA #CoffeeShop |"));
        assert!(md.contains("### 1. GRAPHIC POST: Meet the Roaster"));
        assert!(md.contains("- **CTA:** Order ahead"));
        assert!(!md.contains("Suggested hashtags"));
    }

    #[test]
    fn json_uses_record_keys() {
        let text = to_json(&plan(), &["#fall".to_string()]).unwrap();
        let v: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(v["contentPlan"][1]["postType"], "reel");
        assert_eq!(v["contentPlan"][0]["visualSuggestion"], "Latte art close-up");
        assert_eq!(v["suggestedHashtags"][0], "#fall");
    }

    #[test]
    fn writes_file_and_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("plan.md");
        let n = write(&plan(), &[], ExportFormat::Markdown, &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(n as usize, written.len());
        assert!(written.contains("Fall Menu"));
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(format_for(Path::new("out/plan.JSON"), ExportFormat::Markdown), ExportFormat::Json);
        assert_eq!(format_for(Path::new("plan.md"), ExportFormat::Json), ExportFormat::Markdown);
        assert_eq!(format_for(Path::new("plan.txt"), ExportFormat::Json), ExportFormat::Json);
    }

    #[test]
    fn empty_plan_is_not_exported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.json");
        let err = write(&ContentPlan::default(), &[], ExportFormat::Json, &path).unwrap_err();
        assert!(matches!(err.downcast_ref::<PlanError>(), Some(PlanError::EmptyExport)));
        assert!(!path.exists());
    }
}
