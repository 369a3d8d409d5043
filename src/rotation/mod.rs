//! Dashboard rotation state machine.
//!
//! [`RotationController`] owns the ordered target list, the current position,
//! and a self-rescheduling one-shot timer that advances it. State lives
//! behind a single async mutex; the timer is a spawned task guarded by a
//! cancellation token plus a schedule epoch, so a cancelled-but-already-fired
//! tick can never mutate state.

mod types;

pub use types::{ConfigPush, DashboardTarget, RotationSettings, RotationSnapshot};

use crate::selector::BackendSelector;
use crate::shelf::ShelfWriter;
use crate::store::{keys, StateStore};
use chrono::Timelike;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// Next index with wraparound. Requires `len > 0`.
pub(crate) fn next_index(index: usize, len: usize) -> usize {
    (index + 1) % len
}

/// Previous index with wraparound. Requires `len > 0`.
pub(crate) fn prev_index(index: usize, len: usize) -> usize {
    if index == 0 {
        len - 1
    } else {
        index - 1
    }
}

struct RotationInner {
    targets: Vec<DashboardTarget>,
    current_index: usize,
    is_rotating: bool,
    settings: RotationSettings,
    /// Incremented on every arm/cancel; a timer fire carrying a stale epoch
    /// is discarded.
    timer_epoch: u64,
    timer_cancel: Option<CancellationToken>,
}

impl RotationInner {
    fn current_url(&self) -> Option<String> {
        self.targets.get(self.current_index).map(|t| t.url.clone())
    }
}

/// Owns rotation state for the process lifetime.
///
/// Cheap to clone; clones share state. All mutations serialize on one lock.
#[derive(Clone)]
pub struct RotationController {
    inner: Arc<Mutex<RotationInner>>,
    store: Arc<StateStore>,
    shelf: ShelfWriter,
}

impl RotationController {
    /// Create the controller from persisted state, or empty defaults when
    /// nothing (or nothing decodable) is stored.
    pub fn load(store: Arc<StateStore>) -> Self {
        let targets: Vec<DashboardTarget> = store.get(keys::TARGETS).unwrap_or_default();
        let settings: RotationSettings = store.get(keys::SETTINGS).unwrap_or_default();

        tracing::debug!(
            targets = targets.len(),
            interval = settings.rotation_interval_seconds,
            "Loaded rotation state"
        );

        Self {
            inner: Arc::new(Mutex::new(RotationInner {
                targets,
                current_index: 0,
                is_rotating: false,
                settings,
                timer_epoch: 0,
                timer_cancel: None,
            })),
            shelf: ShelfWriter::new(store.clone()),
            store,
        }
    }

    /// Replace targets and settings wholesale.
    ///
    /// Resets the position to 0 and persists. Starts rotation if the new list
    /// is non-empty and rotation is idle; an empty list stops rotation but
    /// raises no error. A running rotation is re-armed so the new interval
    /// takes effect immediately.
    pub async fn reconfigure(&self, targets: Vec<DashboardTarget>, settings: RotationSettings) {
        let mut inner = self.inner.lock().await;

        inner.targets = targets;
        inner.settings = settings;
        inner.current_index = 0;

        if inner.targets.is_empty() {
            inner.is_rotating = false;
            self.cancel_timer_locked(&mut inner);
        } else if inner.is_rotating {
            self.arm_timer_locked(&mut inner);
        } else {
            inner.is_rotating = true;
            self.arm_timer_locked(&mut inner);
        }

        tracing::info!(
            targets = inner.targets.len(),
            rotating = inner.is_rotating,
            interval = inner.settings.rotation_interval_seconds,
            "Reconfigured rotation"
        );

        self.persist_locked(&inner);
    }

    /// Apply an inbound configuration push (already parsed and validated by
    /// the external configuration source).
    pub async fn apply_push(&self, push: ConfigPush) {
        self.reconfigure(push.targets(), push.settings()).await;
    }

    /// Start rotating. No-op on an empty target list.
    pub async fn start(&self) {
        let mut inner = self.inner.lock().await;
        if inner.targets.is_empty() {
            return;
        }
        inner.is_rotating = true;
        self.arm_timer_locked(&mut inner);
        self.shelf.update_rotation(true);
        tracing::info!(
            interval = inner.settings.rotation_interval_seconds,
            "Rotation started"
        );
    }

    /// Stop rotating and cancel any pending advance. Idempotent.
    pub async fn stop(&self) {
        let mut inner = self.inner.lock().await;
        inner.is_rotating = false;
        self.cancel_timer_locked(&mut inner);
        self.shelf.update_rotation(false);
        tracing::info!("Rotation stopped");
    }

    /// Advance to the next target with wraparound. No-op when empty.
    ///
    /// Manual navigation resets the rotation clock: a pending advance is
    /// cancelled and re-armed for a full interval starting now.
    pub async fn next(&self) {
        let mut inner = self.inner.lock().await;
        if inner.targets.is_empty() {
            return;
        }
        inner.current_index = next_index(inner.current_index, inner.targets.len());
        self.after_navigation_locked(&mut inner);
    }

    /// Retreat to the previous target with wraparound. No-op when empty.
    pub async fn previous(&self) {
        let mut inner = self.inner.lock().await;
        if inner.targets.is_empty() {
            return;
        }
        inner.current_index = prev_index(inner.current_index, inner.targets.len());
        self.after_navigation_locked(&mut inner);
    }

    /// The target at the current position, or none when the list is empty.
    pub async fn current_target(&self) -> Option<DashboardTarget> {
        let inner = self.inner.lock().await;
        inner.targets.get(inner.current_index).cloned()
    }

    /// Point-in-time copy of the full rotation state.
    pub async fn snapshot(&self) -> RotationSnapshot {
        let inner = self.inner.lock().await;
        RotationSnapshot {
            targets: inner.targets.clone(),
            current_index: inner.current_index,
            is_rotating: inner.is_rotating,
            settings: inner.settings.clone(),
        }
    }

    /// Reorder targets to match an AI-suggested name ordering.
    ///
    /// Suggested names that match no target are ignored; targets the
    /// suggestion never mentions keep their relative order at the tail.
    /// Resets the position to 0 and persists. Returns false when nothing
    /// matched and state was left untouched.
    pub async fn apply_suggestion(&self, names: &[String]) -> bool {
        let mut inner = self.inner.lock().await;
        if inner.targets.is_empty() || names.is_empty() {
            return false;
        }

        let mut remaining = inner.targets.clone();
        let mut reordered = Vec::with_capacity(remaining.len());
        for name in names {
            let name = name.trim();
            let position = remaining
                .iter()
                .position(|t| t.display_name().eq_ignore_ascii_case(name) || t.url == name);
            if let Some(pos) = position {
                reordered.push(remaining.remove(pos));
            }
        }

        if reordered.is_empty() {
            return false;
        }
        reordered.extend(remaining);

        inner.targets = reordered;
        inner.current_index = 0;
        if inner.is_rotating {
            self.arm_timer_locked(&mut inner);
        }
        self.persist_locked(&inner);

        tracing::info!(first = %inner.targets[0].display_name(), "Applied priority suggestion");
        true
    }

    /// Ask the selector to reorder targets by priority for the current hour
    /// and apply the result. Best-effort: does nothing when AI assistance is
    /// off, no backend is active, or no suggestion matches.
    pub async fn refresh_priority(&self, selector: &BackendSelector) -> bool {
        let (names, enabled) = {
            let inner = self.inner.lock().await;
            let names: Vec<String> = inner
                .targets
                .iter()
                .map(|t| t.display_name().to_string())
                .collect();
            (names, inner.settings.ai_assist_enabled)
        };

        if !enabled || names.is_empty() {
            return false;
        }

        let hour = chrono::Local::now().hour();
        match selector.suggest_priority(&names, hour).await {
            Some(suggested) => self.apply_suggestion(&suggested).await,
            None => false,
        }
    }

    fn after_navigation_locked(&self, inner: &mut RotationInner) {
        if inner.is_rotating {
            self.arm_timer_locked(inner);
        }
        self.persist_locked(inner);
        tracing::debug!(
            index = inner.current_index,
            url = inner.current_url().as_deref().unwrap_or(""),
            "Navigated to target"
        );
    }

    /// Cancel any pending advance and arm a fresh one-shot for a full
    /// interval. The one-shot re-arms itself on fire, so interval changes
    /// take effect on the very next tick.
    fn arm_timer_locked(&self, inner: &mut RotationInner) {
        self.cancel_timer_locked(inner);

        let epoch = inner.timer_epoch;
        let token = CancellationToken::new();
        inner.timer_cancel = Some(token.clone());

        let interval = Duration::from_secs_f64(inner.settings.rotation_interval_seconds.max(0.0));
        let controller = self.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(interval) => {
                    controller.advance_from_timer(epoch).await;
                }
            }
        });
    }

    fn cancel_timer_locked(&self, inner: &mut RotationInner) {
        if let Some(token) = inner.timer_cancel.take() {
            token.cancel();
        }
        inner.timer_epoch += 1;
    }

    /// Timer fire path. A stale epoch means the schedule was cancelled or
    /// replaced after this tick was spawned; such fires are discarded.
    async fn advance_from_timer(&self, epoch: u64) {
        let mut inner = self.inner.lock().await;
        if !inner.is_rotating || epoch != inner.timer_epoch || inner.targets.is_empty() {
            return;
        }

        inner.current_index = next_index(inner.current_index, inner.targets.len());
        self.arm_timer_locked(&mut inner);
        self.persist_locked(&inner);

        tracing::info!(
            index = inner.current_index,
            url = inner.current_url().as_deref().unwrap_or(""),
            "Rotated to next target"
        );
    }

    /// Persist targets and settings, then refresh the companion surface.
    fn persist_locked(&self, inner: &RotationInner) {
        if let Err(e) = self.store.set(keys::TARGETS, &inner.targets) {
            tracing::warn!(error = %e, "Failed to persist targets");
        }
        if let Err(e) = self.store.set(keys::SETTINGS, &inner.settings) {
            tracing::warn!(error = %e, "Failed to persist settings");
        }
        self.shelf.on_state_changed(
            inner.current_url().as_deref(),
            inner.is_rotating,
            &inner.targets,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_next_index_wraps() {
        assert_eq!(next_index(0, 3), 1);
        assert_eq!(next_index(1, 3), 2);
        assert_eq!(next_index(2, 3), 0);
    }

    #[test]
    fn test_prev_index_wraps() {
        assert_eq!(prev_index(0, 3), 2);
        assert_eq!(prev_index(2, 3), 1);
        assert_eq!(prev_index(0, 1), 0);
    }

    proptest! {
        /// next then previous restores the index, and vice versa.
        #[test]
        fn prop_wraparound_inverse_law(len in 1usize..64, index in 0usize..64) {
            let index = index % len;
            prop_assert_eq!(prev_index(next_index(index, len), len), index);
            prop_assert_eq!(next_index(prev_index(index, len), len), index);
        }

        /// Indices stay within bounds for any non-empty list.
        #[test]
        fn prop_indices_in_bounds(len in 1usize..64, index in 0usize..64) {
            let index = index % len;
            prop_assert!(next_index(index, len) < len);
            prop_assert!(prev_index(index, len) < len);
        }
    }
}
