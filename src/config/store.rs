//! Persisted state location configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Persisted state location.
///
/// When no path is configured, the platform data directory is used.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StoreConfig {
    pub path: Option<PathBuf>,
}
