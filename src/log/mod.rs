//! Diagnostics: tracing to stderr, plus per-transaction request/response
//! artifacts on disk.

use crate::wire::LlmRequest;
use fs_err as fs;
use serde_json::{to_string_pretty, Value};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::warn;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// `RUST_LOG` wins; otherwise `warn`, or `debug` for this crate with `--debug`.
pub fn init_tracing(debug: bool) {
    let fallback = if debug { "warn,content_plan_gen=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub struct SavedPaths {
    pub dir: PathBuf,
    pub request: Option<PathBuf>,
    pub response: Option<PathBuf>,
}

pub fn tx_dir(out_dir: &Path, tx: Uuid) -> PathBuf {
    out_dir.join("tx").join(tx.to_string())
}

pub fn save_stage(
    stage: &str,
    req: &LlmRequest,
    resp: Option<&Value>,
    out_dir: &Path,
    save_request: bool,
    save_response: bool,
) -> anyhow::Result<SavedPaths> {
    let dir = tx_dir(out_dir, req.transaction.id);
    let mut request_path = None;
    let mut response_path = None;

    if save_request || (save_response && resp.is_some()) {
        fs::create_dir_all(&dir)?;
    }

    if save_request {
        let p = dir.join(format!("{stage}.request.json"));
        fs::write(&p, to_string_pretty(req)?)?;
        request_path = Some(p);
    }

    if let (true, Some(resp)) = (save_response, resp) {
        let p = dir.join(format!("{stage}.response.json"));
        fs::write(&p, to_string_pretty(resp)?)?;
        response_path = Some(p);
    }

    Ok(SavedPaths { dir, request: request_path, response: response_path })
}

/// [`save_stage`] that logs and swallows IO failures, so artifact problems never
/// mask the outcome of the model call.
pub fn save_stage_or_warn(
    stage: &str,
    req: &LlmRequest,
    resp: Option<&Value>,
    out_dir: &Path,
    save_request: bool,
    save_response: bool,
) -> Option<SavedPaths> {
    match save_stage(stage, req, resp, out_dir, save_request, save_response) {
        Ok(saved) => Some(saved),
        Err(e) => {
            warn!(stage, error = %e, "artifact_save_failed");
            None
        }
    }
}

pub fn print_saved_paths(stage: &str, saved: &SavedPaths) {
    println!("debug[{stage}]: artifacts directory: {}", saved.dir.display());
    match &saved.request {
        Some(p) => println!("debug[{stage}]: request saved at: {}", p.display()),
        None => println!("debug[{stage}]: request not saved (flag off)"),
    }
    match &saved.response {
        Some(p) => println!("debug[{stage}]: response saved at: {}", p.display()),
        None => println!("debug[{stage}]: response not saved"),
    }
    std::io::stdout().flush().ok();
}
