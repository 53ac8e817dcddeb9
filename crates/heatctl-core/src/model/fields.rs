// ── Field table ──
//
// Declarative description of every field a snapshot can hold: its key,
// when it may be shown, display hints, and how to pull it out of one
// cycle's readings. Built once; lookups go through a static index.

use std::collections::HashMap;
use std::sync::LazyLock;

use super::readings::Readings;
use super::snapshot::SnapshotValue;

/// When a field may be shown to consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Availability {
    /// Whenever the last cycle succeeded (status flags).
    Healthy,
    /// Whenever the last cycle succeeded, even while the device is idle
    /// (network and pool descriptors).
    Always,
    /// Only while the last cycle succeeded and the device is running.
    Running,
}

/// One entry of the field table.
#[derive(Debug)]
pub struct FieldSpec {
    pub key: &'static str,
    pub availability: Availability,
    /// Display unit, if the value has one.
    pub unit: Option<&'static str>,
    /// Suggested number of decimals when rendering.
    pub precision: Option<usize>,
    /// Hidden from default listings.
    pub advanced: bool,
    extract: fn(&Readings) -> Option<SnapshotValue>,
}

impl FieldSpec {
    const fn new(
        key: &'static str,
        availability: Availability,
        extract: fn(&Readings) -> Option<SnapshotValue>,
    ) -> Self {
        Self {
            key,
            availability,
            unit: None,
            precision: None,
            advanced: false,
            extract,
        }
    }

    const fn unit(mut self, unit: &'static str, precision: usize) -> Self {
        self.unit = Some(unit);
        self.precision = Some(precision);
        self
    }

    const fn precision(mut self, precision: usize) -> Self {
        self.precision = Some(precision);
        self
    }

    const fn advanced(mut self) -> Self {
        self.advanced = true;
        self
    }

    /// Run this field's extractor. `None` when the source was absent.
    pub fn extract(&self, readings: &Readings) -> Option<SnapshotValue> {
        (self.extract)(readings)
    }

    /// Look up a field by key.
    pub fn lookup(key: &str) -> Option<&'static Self> {
        INDEX.get(key).copied()
    }
}

/// Keys shown whenever the last cycle succeeded, regardless of whether the
/// device is running.
pub const ALWAYS_AVAILABLE: [&str; 4] = ["network_name", "network_quality", "pool_1", "pool_2"];

/// Every field, in display order.
pub static FIELDS: &[FieldSpec] = &[
    // ── Status ──────────────────────────────────────────────────────
    FieldSpec::new("status", Availability::Healthy, |r| {
        Some(r.operational.into())
    }),
    FieldSpec::new("connected", Availability::Healthy, |r| {
        Some(r.operational.into())
    }),
    FieldSpec::new("status_running", Availability::Healthy, |r| {
        Some(r.status_running().into())
    }),
    FieldSpec::new("enable", Availability::Running, |r| {
        Some(r.status_running().into())
    }),
    // ── Heater ──────────────────────────────────────────────────────
    FieldSpec::new("fanspeed", Availability::Running, |r| {
        Some(r.fan_speed.into())
    }),
    FieldSpec::new("powertarget", Availability::Running, |r| {
        Some(r.power_target.clone())
    }),
    FieldSpec::new("powertarget_watt", Availability::Running, |r| {
        Some(r.power_target_watt.as_str().into())
    })
    .unit("W", 0),
    FieldSpec::new("status_temperature", Availability::Running, |r| {
        Some(r.temperature.into())
    })
    .unit("°C", 1),
    // ── Network ─────────────────────────────────────────────────────
    FieldSpec::new("network_type", Availability::Running, |r| {
        Some(r.network.interface_type.as_str().into())
    }),
    FieldSpec::new("network_name", Availability::Always, |r| {
        Some(r.network.ssid.as_str().into())
    }),
    FieldSpec::new("network_quality", Availability::Always, |r| {
        Some(r.network.quality_ratio().into())
    }),
    FieldSpec::new("network_signal_level", Availability::Running, |r| {
        Some(SnapshotValue::from_number(&r.network.signal_level))
    })
    .unit("dBm", 0),
    // ── Pools ───────────────────────────────────────────────────────
    FieldSpec::new("pool_1", Availability::Always, |r| {
        Some(r.pool.primary.label().into())
    }),
    FieldSpec::new("pool_2", Availability::Always, |r| {
        Some(r.pool.fallback.label().into())
    })
    .advanced(),
    // ── Summary ─────────────────────────────────────────────────────
    FieldSpec::new("foundblocks", Availability::Running, |r| {
        r.summary.found_blocks.clone()
    })
    .advanced(),
    FieldSpec::new("poolstatus", Availability::Running, |r| {
        r.summary.pool_status.clone()
    }),
    FieldSpec::new("power_limit", Availability::Running, |r| {
        r.summary.power.as_ref().map(|p| p.limit_w.clone())
    })
    .unit("W", 0)
    .advanced(),
    FieldSpec::new("power_consumption", Availability::Running, |r| {
        r.summary
            .power
            .as_ref()
            .map(|p| p.approx_consumption_w.clone())
    })
    .unit("W", 0),
    FieldSpec::new("hashrate_5s", Availability::Running, |r| {
        r.summary.hashrate.as_ref().map(|h| h.mhs_5s.clone())
    })
    .precision(2)
    .advanced(),
    FieldSpec::new("hashrate_1m", Availability::Running, |r| {
        r.summary.hashrate.as_ref().map(|h| h.mhs_1m.clone())
    })
    .precision(2),
    FieldSpec::new("hashrate_5m", Availability::Running, |r| {
        r.summary.hashrate.as_ref().map(|h| h.mhs_5m.clone())
    })
    .precision(2)
    .advanced(),
    FieldSpec::new("hashrate_15m", Availability::Running, |r| {
        r.summary.hashrate.as_ref().map(|h| h.mhs_15m.clone())
    })
    .precision(2)
    .advanced(),
    FieldSpec::new("hashrate_24h", Availability::Running, |r| {
        r.summary.hashrate.as_ref().map(|h| h.mhs_24h.clone())
    })
    .precision(2)
    .advanced(),
    FieldSpec::new("hashrate_av", Availability::Running, |r| {
        r.summary.hashrate.as_ref().map(|h| h.mhs_av.clone())
    })
    .precision(2)
    .advanced(),
];

static INDEX: LazyLock<HashMap<&'static str, &'static FieldSpec>> =
    LazyLock::new(|| FIELDS.iter().map(|spec| (spec.key, spec)).collect());
