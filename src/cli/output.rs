//! Output formatting helpers for CLI commands

use crate::rotation::RotationSnapshot;
use crate::selector::BackendKind;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde_json::json;

/// View model for backend probe display
#[derive(Debug, Clone, serde::Serialize)]
pub struct ProbeView {
    pub backend: BackendKind,
    pub url: String,
    pub available: bool,
    pub models: Vec<String>,
}

/// Format probe results as a table
pub fn format_probe_table(probes: &[ProbeView], active: Option<BackendKind>) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Backend", "URL", "Status", "Models"]);

    for p in probes {
        let status = if p.available {
            "Available".green().to_string()
        } else {
            "Unavailable".red().to_string()
        };

        table.add_row(vec![
            Cell::new(p.backend),
            Cell::new(&p.url),
            Cell::new(status),
            Cell::new(if p.models.is_empty() {
                "-".to_string()
            } else {
                p.models.join(", ")
            }),
        ]);
    }

    let active_line = match active {
        Some(kind) => format!("Active backend: {}", kind.to_string().green()),
        None => format!("Active backend: {}", "none".yellow()),
    };

    format!("{}\n{}", table, active_line)
}

/// Format probe results as JSON
pub fn format_probe_json(probes: &[ProbeView], active: Option<BackendKind>) -> String {
    serde_json::to_string_pretty(&json!({
        "backends": probes,
        "active": active,
    }))
    .unwrap()
}

/// Format rotation state as a table
pub fn format_status_table(snapshot: &RotationSnapshot) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["", "Name", "URL"]);

    for (i, target) in snapshot.targets.iter().enumerate() {
        let marker = if i == snapshot.current_index { "▶" } else { "" };
        table.add_row(vec![
            Cell::new(marker),
            Cell::new(target.name.as_deref().unwrap_or("-")),
            Cell::new(&target.url),
        ]);
    }

    let rotating = if snapshot.is_rotating {
        "rotating".green().to_string()
    } else {
        "idle".yellow().to_string()
    };

    format!(
        "{}\n{} target(s), {}, interval {}s, AI assist {}",
        table,
        snapshot.targets.len(),
        rotating,
        snapshot.settings.rotation_interval_seconds,
        if snapshot.settings.ai_assist_enabled {
            "on"
        } else {
            "off"
        }
    )
}

/// Format rotation state as JSON
pub fn format_status_json(snapshot: &RotationSnapshot) -> String {
    serde_json::to_string_pretty(snapshot).unwrap()
}
