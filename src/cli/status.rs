//! Status command implementation

use crate::cli::output::{format_status_json, format_status_table};
use crate::cli::run::{build_context, load_config};
use crate::cli::StatusArgs;

/// Handle `carousel status`
pub async fn handle_status(args: &StatusArgs) -> anyhow::Result<String> {
    let config = load_config(&args.config)?;
    let ctx = build_context(config, args.store.clone())?;

    let snapshot = ctx.controller.snapshot().await;
    Ok(if args.json {
        format_status_json(&snapshot)
    } else {
        format_status_table(&snapshot)
    })
}
