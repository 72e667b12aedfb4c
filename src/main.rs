use anyhow::{anyhow, Result};
use chrono::Utc;
use clap::Parser;
use std::path::Path;
use tracing::info;
use uuid::Uuid;

mod cli;
mod config;
mod errors;
mod export;
mod generate;
mod hashtags;
mod log;
mod plan;
mod profile;
mod prompt;
mod provider;
mod ux;
mod wire;

use profile::BusinessProfile;
use wire::Tx;

fn load_profile(args: &cli::Args) -> Result<BusinessProfile> {
    let mut p = match (&args.profile, args.sample) {
        (Some(path), _) => BusinessProfile::load(Path::new(path))?,
        (None, true) => BusinessProfile::sample(),
        (None, false) => return Err(anyhow!("pass --profile <file> or --sample")),
    };
    if let Some(g) = args.graphics {
        p.graphics_posts_per_month = g;
    }
    if let Some(r) = args.reels {
        p.reels_per_month = r;
    }
    p.validate()?;
    Ok(p)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse();
    log::init_tracing(args.debug);

    let mut cfg = config::Config::load(args.config.as_deref().map(Path::new))?;
    cfg.apply_args(&args);
    let out_dir = Path::new(&cfg.out_dir).to_path_buf();

    let profile = load_profile(&args)?;
    let quota = profile.quota();
    let prov = provider::make_provider(&cfg)?;
    let txid = Uuid::new_v4();
    info!(tx = %txid, provider = ?cfg.provider, model = %cfg.model, ?quota, "generation_start");

    // ===== CONTENT PLAN =====
    let today = Utc::now().date_naive();
    let req = generate::content_plan_request(&profile, today, Tx { id: txid, timestamp: Utc::now() });
    let pb = ux::spinner("Generating content plan", !args.no_progress && !args.debug);
    let outcome = generate::generate(prov.as_ref(), &req, quota, args.debug).await;
    pb.finish_and_clear();

    let (plan, raw) = match outcome {
        Ok(v) => v,
        Err(e) => {
            log::save_stage_or_warn(req.flow.stage(), &req, None, &out_dir, args.save_request, false);
            return Err(e);
        }
    };
    let saved = log::save_stage_or_warn(req.flow.stage(), &req, Some(&raw), &out_dir, args.save_request, args.save_response);
    if let (true, Some(saved)) = (args.debug, &saved) {
        log::print_saved_paths(req.flow.stage(), saved);
    }

    // ===== HASHTAGS =====
    let mut suggested = Vec::new();
    if args.suggest_hashtags && !plan.is_empty() {
        let req = hashtags::request(&profile, &plan, Tx { id: txid, timestamp: Utc::now() });
        let pb = ux::spinner("Suggesting hashtags", !args.no_progress && !args.debug);
        let (tags, raw) = hashtags::suggest_or_skip(prov.as_ref(), &req, &profile.fixed_hashtags(), args.debug).await;
        pb.finish_and_clear();
        let saved = log::save_stage_or_warn(req.flow.stage(), &req, raw.as_ref(), &out_dir, args.save_request, args.save_response);
        if let (true, Some(saved)) = (args.debug, &saved) {
            log::print_saved_paths(req.flow.stage(), saved);
        }
        suggested = tags;
    }

    if args.plain {
        for p in &plan.posts {
            println!("{}\n", ux::post_text(p));
        }
    } else {
        ux::show_plan(&plan);
    }
    ux::print_summary(&plan, &suggested);

    // ===== EXPORT =====
    if let Some(dest) = &args.export {
        let path = Path::new(dest);
        let format = match args.format {
            Some(f) => f,
            None => export::format_for(path, cfg.export_format),
        };
        let bytes = export::write(&plan, &suggested, format, path)?;
        ux::print_exported(path, bytes);
    }

    Ok(())
}
