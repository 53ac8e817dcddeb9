// ── Coordinator state ──
//
// The committed outcome of the latest refresh cycle. Published as one
// value through a `watch` channel so readers never see a half-applied
// cycle.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::CoreError;
use crate::model::{Availability, FieldSpec, Snapshot, SnapshotValue};

/// Health of the coordinator.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, strum::Display, strum::IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Health {
    /// No cycle has completed yet.
    #[default]
    Uninitialized,
    /// The last cycle succeeded.
    Healthy,
    /// The last cycle failed.
    Degraded,
}

#[derive(Debug, Clone, Default)]
pub struct CoordinatorState {
    pub health: Health,
    /// Last good snapshot. Kept across failed cycles.
    pub snapshot: Option<Arc<Snapshot>>,
    pub last_error: Option<CoreError>,
    /// Set by an authentication failure, cleared by the next success.
    pub reauth_required: bool,
    pub last_success: Option<DateTime<Utc>>,
    /// Completed cycles, successful or not.
    pub cycles: u64,
    pub consecutive_failures: u32,
}

impl CoordinatorState {
    pub fn last_update_success(&self) -> bool {
        self.health == Health::Healthy
    }

    /// Healthy and the last snapshot reports the device running.
    pub fn is_device_running(&self) -> bool {
        self.last_update_success()
            && self
                .snapshot
                .as_ref()
                .is_some_and(|snapshot| snapshot.status_running())
    }

    /// Whether `key` may be shown right now. Unknown keys never are, and
    /// neither are keys the last cycle did not read.
    pub fn is_available(&self, key: &str) -> bool {
        let Some(spec) = FieldSpec::lookup(key) else {
            return false;
        };
        if self
            .snapshot
            .as_ref()
            .is_some_and(|snapshot| snapshot.is_carried(key))
        {
            return false;
        }
        match spec.availability {
            Availability::Healthy | Availability::Always => self.last_update_success(),
            Availability::Running => self.is_device_running(),
        }
    }

    /// The current value of `key`, only while it is available.
    pub fn value(&self, key: &str) -> Option<&SnapshotValue> {
        if !self.is_available(key) {
            return None;
        }
        self.snapshot.as_deref()?.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(health: Health, running: bool) -> CoordinatorState {
        let snapshot: Snapshot = [
            ("status_running".to_owned(), SnapshotValue::Bool(running)),
            ("fanspeed".to_owned(), SnapshotValue::Int(2150)),
            ("network_name".to_owned(), SnapshotValue::from("MyNet")),
        ]
        .into_iter()
        .collect();

        CoordinatorState {
            health,
            snapshot: Some(Arc::new(snapshot)),
            ..CoordinatorState::default()
        }
    }

    #[test]
    fn running_fields_follow_device_state() {
        let running = state_with(Health::Healthy, true);
        assert!(running.is_device_running());
        assert_eq!(running.value("fanspeed"), Some(&SnapshotValue::Int(2150)));

        let idle = state_with(Health::Healthy, false);
        assert!(!idle.is_device_running());
        assert!(!idle.is_available("fanspeed"));
        assert_eq!(idle.value("fanspeed"), None);
        assert_eq!(idle.value("network_name"), Some(&SnapshotValue::from("MyNet")));
    }

    #[test]
    fn degraded_hides_everything() {
        let degraded = state_with(Health::Degraded, true);
        assert!(!degraded.is_device_running());
        assert!(!degraded.is_available("network_name"));
        assert!(!degraded.is_available("status"));
        assert!(degraded.snapshot.is_some());
    }

    #[test]
    fn carried_keys_are_unavailable() {
        let previous: Snapshot = [("hashrate_5s".to_owned(), SnapshotValue::Float(80.0))]
            .into_iter()
            .collect();
        let current: Snapshot = [
            ("status_running".to_owned(), SnapshotValue::Bool(true)),
            ("fanspeed".to_owned(), SnapshotValue::Int(2150)),
        ]
        .into_iter()
        .collect();
        let state = CoordinatorState {
            health: Health::Healthy,
            snapshot: Some(Arc::new(current.carry_forward(&previous))),
            ..CoordinatorState::default()
        };

        assert!(state.is_device_running());
        assert!(state.is_available("fanspeed"));
        assert!(!state.is_available("hashrate_5s"));
        assert_eq!(state.value("hashrate_5s"), None);
    }

    #[test]
    fn unknown_keys_are_unavailable() {
        let state = state_with(Health::Healthy, true);
        assert!(!state.is_available("does_not_exist"));
        assert_eq!(state.value("does_not_exist"), None);
    }

    #[test]
    fn uninitialized_has_nothing() {
        let state = CoordinatorState::default();
        assert_eq!(state.health, Health::Uninitialized);
        assert!(!state.is_available("status"));
        assert!(!state.is_device_running());
    }
}
