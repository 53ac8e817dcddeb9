//! Polling coordinator for 21energy heaters, sitting between `heatctl-api`
//! and consumers such as the `heatctl` CLI.
//!
//! - **[`Coordinator`]** -- owns one device: [`start()`](Coordinator::start)
//!   fetches the identity, runs the first refresh cycle and spawns the poll
//!   timer. Every cycle either publishes a new [`Snapshot`] or marks the
//!   coordinator [`Degraded`](Health::Degraded), then notifies subscribers.
//!
//! - **[`Snapshot`]** -- flat keyed values built from one cycle's readings
//!   by the static field table ([`FIELDS`]). Whether a field may be shown
//!   depends on its [`Availability`] and the current [`CoordinatorState`].
//!
//! - **[`Command`]** -- mutations (power target, enable flag), each
//!   followed by a forced refresh.

pub mod builder;
pub mod command;
pub mod config;
pub mod convert;
pub mod coordinator;
pub mod error;
pub mod model;
pub mod state;
pub mod stream;
pub mod subscription;

// ── Primary re-exports ──────────────────────────────────────────────
pub use builder::SnapshotBuilder;
pub use command::Command;
pub use config::{CoordinatorConfig, DEFAULT_POLL_INTERVAL};
pub use coordinator::Coordinator;
pub use error::CoreError;
pub use state::{CoordinatorState, Health};
pub use stream::StateStream;
pub use subscription::Subscription;

pub use model::{
    ALWAYS_AVAILABLE, Availability, DeviceInfo, FIELDS, FieldSpec, Readings, Snapshot,
    SnapshotValue,
};

// Types consumers need without depending on `heatctl-api` directly.
pub use heatctl_api::{ErrorKind, PowerTarget};
