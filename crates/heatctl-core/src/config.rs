// ── Runtime coordinator configuration ──
//
// Describes *which* device to poll and how often. Never touches disk:
// the CLI builds a `CoordinatorConfig` from its profile and hands it in.

use std::time::Duration;

use heatctl_api::{DEFAULT_TIMEOUT, TransportConfig};

/// Default interval between scheduled refresh cycles.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Configuration for coordinating a single heater.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinatorConfig {
    /// Device address (`192.168.1.40`, `heater.local:8080` or a full URL).
    pub host: String,
    /// Interval between scheduled refreshes. `Duration::ZERO` disables the
    /// timer; cycles then only run on demand.
    pub poll_interval: Duration,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl CoordinatorConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig::default().with_timeout(self.timeout)
    }
}
