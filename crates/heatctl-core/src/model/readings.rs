// ── Typed readings ──
//
// Everything one refresh cycle learns from the device, already reshaped
// from wire models but before projection onto snapshot keys.

use serde::Serialize;
use serde_json::Number;

use super::snapshot::SnapshotValue;

/// All readings fetched in one refresh cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Readings {
    pub operational: bool,
    pub fan_speed: i64,
    pub power_target: SnapshotValue,
    /// Power target in watts with the unit suffix removed.
    pub power_target_watt: String,
    pub temperature: f64,
    pub network: NetworkInfo,
    pub pool: PoolInfo,
    pub summary: SummaryReadings,
}

impl Readings {
    /// Running means operational AND the control loop is engaged.
    pub fn status_running(&self) -> bool {
        self.operational && self.summary.tuner_engaged
    }
}

/// Network link as exposed to consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkInfo {
    /// Interface name with its trailing index removed (`wlan0` → `wlan`).
    pub interface_type: String,
    pub ssid: String,
    pub quality: Number,
    pub max_quality: Number,
    pub signal_level: Number,
}

impl NetworkInfo {
    /// Link quality rendered as `"{quality}/{max}"`.
    pub fn quality_ratio(&self) -> String {
        format!("{}/{}", self.quality, self.max_quality)
    }
}

/// Primary and fallback mining pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoolInfo {
    pub primary: PoolEndpoint,
    pub fallback: PoolEndpoint,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoolEndpoint {
    pub url: String,
    pub username: String,
}

impl PoolEndpoint {
    /// `"{username}\n{url}"`, the form shown for each pool field.
    pub fn label(&self) -> String {
        format!("{}\n{}", self.username, self.url)
    }
}

/// The parts of the status summary that map to fields.
///
/// Every member is optional: the device drops whole sections while the
/// control loop is idle.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryReadings {
    pub found_blocks: Option<SnapshotValue>,
    pub pool_status: Option<SnapshotValue>,
    pub power: Option<PowerSummary>,
    pub hashrate: Option<Hashrate>,
    /// Whether the summary carried a `tunerStatus` key.
    pub tuner_engaged: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerSummary {
    pub limit_w: SnapshotValue,
    pub approx_consumption_w: SnapshotValue,
}

/// Hashrate averages in MH/s.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hashrate {
    pub mhs_5s: SnapshotValue,
    pub mhs_1m: SnapshotValue,
    pub mhs_5m: SnapshotValue,
    pub mhs_15m: SnapshotValue,
    pub mhs_24h: SnapshotValue,
    pub mhs_av: SnapshotValue,
}
