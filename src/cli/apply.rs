//! Apply command implementation
//!
//! Applies a configuration push from a JSON file. Stands in for the
//! out-of-scope HTTP configuration receiver: the payload is expected to be
//! already valid.

use crate::cli::run::{build_context, load_config};
use crate::cli::ApplyArgs;
use crate::rotation::ConfigPush;
use anyhow::Context;

/// Handle `carousel apply`
pub async fn handle_apply(args: &ApplyArgs) -> anyhow::Result<String> {
    let config = load_config(&args.config)?;
    let ctx = build_context(config, args.store.clone())?;

    let content = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let push: ConfigPush = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", args.file.display()))?;

    let count = push.urls.len();
    ctx.controller.apply_push(push).await;
    // The daemon isn't running here; only the persisted state matters.
    ctx.controller.stop().await;

    Ok(format!(
        "✓ Applied configuration: {} target(s) persisted to {}",
        count,
        ctx.store.path().display()
    ))
}
