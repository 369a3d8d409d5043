//! Backends command implementation

use crate::cli::output::{format_probe_json, format_probe_table, ProbeView};
use crate::cli::run::{build_context, load_config};
use crate::cli::ProbeArgs;
use crate::selector::BackendKind;

/// Handle `carousel backends probe`
pub async fn handle_probe(args: &ProbeArgs) -> anyhow::Result<String> {
    let config = load_config(&args.config)?;
    let ctx = build_context(config, args.store.clone())?;

    ctx.selector.probe_all().await;

    let probes: Vec<ProbeView> = BackendKind::ALL
        .iter()
        .map(|&kind| ProbeView {
            backend: kind,
            url: ctx.selector.base_url(kind),
            available: ctx.selector.is_available(kind),
            models: if kind == BackendKind::Ollama {
                ctx.selector.ollama_models()
            } else {
                vec![]
            },
        })
        .collect();

    let active = ctx.selector.active_backend();
    Ok(if args.json {
        format_probe_json(&probes, active)
    } else {
        format_probe_table(&probes, active)
    })
}
