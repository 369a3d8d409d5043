//! Companion read-only surface.
//!
//! Mirrors rotation state into plain persisted key-value pairs consumed by a
//! separate presentation extension: current target URL, rotation-enabled
//! flag, and a capped list of saved dashboard entries. The core refreshes
//! these whenever its state changes; write failures are logged, never fatal.

use crate::rotation::DashboardTarget;
use crate::store::{keys, StateStore};
use std::sync::Arc;

/// Maximum number of saved dashboard entries exposed to the extension.
pub const MAX_SAVED_DASHBOARDS: usize = 5;

#[derive(Clone)]
pub struct ShelfWriter {
    store: Arc<StateStore>,
}

impl ShelfWriter {
    pub fn new(store: Arc<StateStore>) -> Self {
        Self { store }
    }

    /// Refresh every companion key from the given state.
    pub fn on_state_changed(
        &self,
        current_url: Option<&str>,
        rotating: bool,
        targets: &[DashboardTarget],
    ) {
        self.update_current(current_url);
        self.update_rotation(rotating);
        self.update_saved(targets);
    }

    pub fn update_current(&self, url: Option<&str>) {
        let result = match url {
            Some(url) => self.store.set(keys::CURRENT_DASHBOARD_URL, &url),
            None => self.store.remove(keys::CURRENT_DASHBOARD_URL),
        };
        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to write current dashboard to shelf");
        }
    }

    pub fn update_rotation(&self, enabled: bool) {
        if let Err(e) = self.store.set(keys::ROTATION_ENABLED, &enabled) {
            tracing::warn!(error = %e, "Failed to write rotation flag to shelf");
        }
    }

    pub fn update_saved(&self, targets: &[DashboardTarget]) {
        let capped: Vec<&DashboardTarget> =
            targets.iter().take(MAX_SAVED_DASHBOARDS).collect();
        if let Err(e) = self.store.set(keys::SAVED_DASHBOARDS, &capped) {
            tracing::warn!(error = %e, "Failed to write saved dashboards to shelf");
        }
    }

    /// Clear all companion keys.
    pub fn clear(&self) {
        let _ = self.store.remove(keys::CURRENT_DASHBOARD_URL);
        let _ = self.store.set(keys::ROTATION_ENABLED, &false);
        let _ = self.store.remove(keys::SAVED_DASHBOARDS);
    }
}
