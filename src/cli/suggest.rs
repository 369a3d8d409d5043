//! Suggest command implementation

use crate::cli::run::{build_context, load_config};
use crate::cli::SuggestArgs;
use chrono::Timelike;

/// Handle `carousel suggest`
pub async fn handle_suggest(args: &SuggestArgs) -> anyhow::Result<String> {
    let config = load_config(&args.config)?;
    let ctx = build_context(config, args.store.clone())?;

    let snapshot = ctx.controller.snapshot().await;
    if snapshot.targets.is_empty() {
        return Ok("No saved dashboards to prioritize.".to_string());
    }

    ctx.selector.probe_all().await;

    let names: Vec<String> = snapshot
        .targets
        .iter()
        .map(|t| t.display_name().to_string())
        .collect();
    let hour = args.hour.unwrap_or_else(|| chrono::Local::now().hour());

    match ctx.selector.suggest_priority(&names, hour).await {
        Some(ordered) if !ordered.is_empty() => {
            let mut out = format!("Suggested order for {}:00:\n", hour);
            for (i, name) in ordered.iter().enumerate() {
                out.push_str(&format!("  {}. {}\n", i + 1, name));
            }
            Ok(out)
        }
        _ => Ok(
            "No suggestion available (AI disabled, no backend reachable, or the call failed)."
                .to_string(),
        ),
    }
}
