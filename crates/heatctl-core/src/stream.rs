// ── State stream ──
//
// Async counterpart to callback subscriptions, backed by the
// coordinator's `watch` channel.

use tokio::sync::watch;

use crate::state::CoordinatorState;

/// A receiver of committed coordinator state.
pub struct StateStream {
    current: CoordinatorState,
    receiver: watch::Receiver<CoordinatorState>,
}

impl StateStream {
    pub(crate) fn new(mut receiver: watch::Receiver<CoordinatorState>) -> Self {
        let current = receiver.borrow_and_update().clone();
        Self { current, receiver }
    }

    /// State captured at creation or at the last [`changed`](Self::changed).
    pub fn current(&self) -> &CoordinatorState {
        &self.current
    }

    /// Latest committed state.
    pub fn latest(&self) -> CoordinatorState {
        self.receiver.borrow().clone()
    }

    /// Wait for the next published state.
    /// Returns `None` once the coordinator has been dropped.
    pub async fn changed(&mut self) -> Option<&CoordinatorState> {
        self.receiver.changed().await.ok()?;
        self.current = self.receiver.borrow_and_update().clone();
        Some(&self.current)
    }
}
