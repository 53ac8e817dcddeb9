// ── Domain model ──
//
// Typed readings gathered in one refresh cycle, the flat snapshot they
// project into, and the static field table that ties the two together.

pub mod device;
pub mod fields;
pub mod readings;
pub mod snapshot;

// ── Re-exports ──────────────────────────────────────────────────────

pub use device::DeviceInfo;
pub use fields::{ALWAYS_AVAILABLE, Availability, FIELDS, FieldSpec};
pub use readings::{
    Hashrate, NetworkInfo, PoolEndpoint, PoolInfo, PowerSummary, Readings, SummaryReadings,
};
pub use snapshot::{Snapshot, SnapshotValue};
