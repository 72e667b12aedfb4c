use colored::Colorize;
use humansize::{format_size, DECIMAL};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

use crate::plan::{ContentPlan, Post, PostType};

/// Spinner shown while a model call is in flight; hidden when `enabled` is false.
pub fn spinner(msg: &str, enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg} ({elapsed})") {
        pb.set_style(style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// The copy-to-clipboard block for one post.
pub fn post_text(post: &Post) -> String {
    let mut text = format!("Title: {}\n\nContent: {}\n\nCaption: {}", post.title, post.content, post.caption);
    if !post.hashtags.is_empty() {
        text.push_str(&format!("\n\nHashtags: {}", post.hashtags.join(" ")));
    }
    text
}

fn badge(kind: PostType) -> colored::ColoredString {
    let label = format!("[{} POST]", kind.as_str().to_uppercase());
    match kind {
        PostType::Graphic => label.green().bold(),
        PostType::Reel => label.magenta().bold(),
    }
}

pub fn show_plan(plan: &ContentPlan) {
    println!("\n=== CONTENT PLAN ===");
    if plan.is_empty() {
        println!("(no posts)");
        return;
    }
    for ((month, posts), (_, counts)) in plan.months().into_iter().zip(plan.counts()) {
        println!(
            "\n{}  {}",
            format!("┃ {month} ").bold().reversed(),
            format!("{} graphics, {} reels", counts.graphics, counts.reels).dimmed()
        );
        for p in posts {
            show_post(p);
        }
    }
    println!();
}

fn show_post(p: &Post) {
    println!("\n{}  {}  {}", badge(p.post_type), p.month.cyan(), p.tags.join(" · ").yellow());
    println!("  {} {}", "Title:".bold(), p.title);
    println!("  {}\n{}", "Content:".bold(), indent(&p.content, 4));
    println!("  {}\n{}", "Caption:".bold(), indent(&p.caption, 4));
    println!("  {} {}", "Visuals:".bold(), p.visual_suggestion);
    println!("  {} {}", "Hashtags:".bold(), p.hashtags.join(" ").blue());
    println!("  {} {}", "CTA:".bold(), p.cta);
}

pub fn print_summary(plan: &ContentPlan, suggested: &[String]) {
    println!("{}", "┏━━━━━━━━━━━━━━━━━━━━━━━━ Summary ━━━━━━━━━━━━━━━━━━━━━━━━┓".bold());
    println!(
        "  {}: {}   {}: {}   {}: {}",
        "Posts".green().bold(), plan.posts.len(),
        "Months".cyan().bold(), plan.counts().len(),
        "Rejected".red().bold(), plan.rejected
    );
    if !suggested.is_empty() {
        println!("  {}: {}", "Suggested hashtags".bold(), suggested.join(" "));
    }
    println!("{}", "┗━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━┛".bold());
}

pub fn print_exported(path: &Path, bytes: u64) {
    println!("{} {} ({})", "Exported".green().bold(), path.display(), format_size(bytes, DECIMAL));
}

fn indent(s: &str, n: usize) -> String {
    let pad = " ".repeat(n);
    s.lines()
        .map(|l| format!("{}{}", pad, l))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(hashtags: Vec<String>) -> Post {
        Post {
            month: "August".into(),
            post_type: PostType::Reel,
            tags: vec!["Info Text".into()],
            title: "T".into(),
            content: "C".into(),
            caption: "Cap".into(),
            visual_suggestion: "V".into(),
            hashtags,
            cta: "Go".into(),
        }
    }

    #[test]
    fn post_text_matches_copy_block() {
        let text = post_text(&post(vec!["#a".into(), "#b".into()]));
        assert_eq!(text, "Title: T\n\nContent: C\n\nCaption: Cap\n\nHashtags: #a #b");
        assert!(!post_text(&post(vec![])).contains("Hashtags"));
    }

    #[test]
    fn indent_pads_each_line() {
        assert_eq!(indent("a\nb", 2), "  a\n  b");
    }
}
