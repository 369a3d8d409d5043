//! Data model for dashboard rotation.

use serde::{Deserialize, Serialize};

/// One displayable dashboard endpoint.
///
/// Immutable once created; list membership changes by wholesale replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardTarget {
    /// Optional display name; falls back to the URL where a name is needed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub url: String,
}

impl DashboardTarget {
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            name: None,
            url: url.into(),
        }
    }

    /// Display name for prompts and logs.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.url)
    }
}

/// Rotation settings; persisted and replaced wholesale on reconfiguration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RotationSettings {
    pub rotation_interval_seconds: f64,
    pub dark_mode_enabled: bool,
    pub ai_assist_enabled: bool,
    pub alert_threshold: f64,
}

impl Default for RotationSettings {
    fn default() -> Self {
        Self {
            rotation_interval_seconds: 30.0,
            dark_mode_enabled: true,
            ai_assist_enabled: false,
            alert_threshold: 5.0,
        }
    }
}

/// Inbound configuration push, delivered by an external configuration source
/// that has already parsed and validated the payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigPush {
    pub urls: Vec<String>,
    pub rotation_interval: f64,
    pub enable_dark_mode: bool,
    // The push producer spells this with AI upper-cased.
    #[serde(rename = "enableAIDetection")]
    pub enable_ai_detection: bool,
    pub alert_threshold: f64,
}

impl ConfigPush {
    pub fn settings(&self) -> RotationSettings {
        RotationSettings {
            rotation_interval_seconds: self.rotation_interval,
            dark_mode_enabled: self.enable_dark_mode,
            ai_assist_enabled: self.enable_ai_detection,
            alert_threshold: self.alert_threshold,
        }
    }

    pub fn targets(&self) -> Vec<DashboardTarget> {
        self.urls.iter().cloned().map(DashboardTarget::from_url).collect()
    }
}

/// Point-in-time copy of rotation state, for display and inspection.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RotationSnapshot {
    pub targets: Vec<DashboardTarget>,
    pub current_index: usize,
    pub is_rotating: bool,
    pub settings: RotationSettings,
}
