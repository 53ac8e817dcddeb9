// ── API-to-domain conversions ──
//
// Reshapes the raw wire models of one cycle into typed readings. Pure
// functions only; the builder decides what to fetch.

use heatctl_api::{NetworkStatus, PoolConfig};
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::model::{
    Hashrate, NetworkInfo, PoolEndpoint, PoolInfo, PowerSummary, SnapshotValue, SummaryReadings,
};

/// Interface name with its trailing index removed (`wlan0` → `wlan`).
pub(crate) fn interface_type(name: &str) -> String {
    name.trim_end_matches(|c: char| c.is_ascii_digit()).to_owned()
}

/// `"1200W"` → `"1200"`.
pub(crate) fn strip_watt_suffix(raw: &str) -> String {
    raw.replace('W', "").trim().to_owned()
}

impl From<NetworkStatus> for NetworkInfo {
    fn from(raw: NetworkStatus) -> Self {
        Self {
            interface_type: interface_type(&raw.interface),
            ssid: raw.essid,
            quality: raw.min_quality,
            max_quality: raw.max_quality,
            signal_level: raw.signal_level,
        }
    }
}

impl From<PoolConfig> for PoolInfo {
    fn from(raw: PoolConfig) -> Self {
        Self {
            primary: PoolEndpoint {
                url: raw.pool_url_1,
                username: raw.username_1,
            },
            fallback: PoolEndpoint {
                url: raw.pool_url_2,
                username: raw.username_2,
            },
        }
    }
}

/// Project the raw status summary onto the keys that map to fields.
///
/// Unknown keys are ignored. A `power` or `realHashrate` section that is
/// present but lacks one of its values is rejected as malformed.
pub(crate) fn summary_readings(raw: &Map<String, Value>) -> Result<SummaryReadings, CoreError> {
    let mut summary = SummaryReadings {
        tuner_engaged: raw.contains_key("tunerStatus"),
        ..SummaryReadings::default()
    };

    for (key, value) in raw {
        match key.as_str() {
            "foundBlocks" => summary.found_blocks = SnapshotValue::from_json(value),
            "poolStatus" => summary.pool_status = SnapshotValue::from_json(value),
            "power" => {
                summary.power = Some(PowerSummary {
                    limit_w: required(value, "power", "limitW")?,
                    approx_consumption_w: required(value, "power", "approxConsumptionW")?,
                });
            }
            "realHashrate" => {
                summary.hashrate = Some(Hashrate {
                    mhs_5s: required(value, "realHashrate", "mhs5S")?,
                    mhs_1m: required(value, "realHashrate", "mhs1M")?,
                    mhs_5m: required(value, "realHashrate", "mhs5M")?,
                    mhs_15m: required(value, "realHashrate", "mhs15M")?,
                    mhs_24h: required(value, "realHashrate", "mhs24H")?,
                    mhs_av: required(value, "realHashrate", "mhsAv")?,
                });
            }
            _ => {}
        }
    }

    Ok(summary)
}

fn required(section: &Value, name: &str, key: &str) -> Result<SnapshotValue, CoreError> {
    section
        .get(key)
        .and_then(SnapshotValue::from_json)
        .ok_or_else(|| CoreError::Generic {
            message: format!("malformed status summary: {name}.{key} missing"),
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use heatctl_api::ErrorKind;

    use super::*;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn interface_type_strips_trailing_index() {
        assert_eq!(interface_type("wlan0"), "wlan");
        assert_eq!(interface_type("eth12"), "eth");
        assert_eq!(interface_type("br-lan"), "br-lan");
        assert_eq!(interface_type("wl0a1"), "wl0a");
    }

    #[test]
    fn watt_suffix_is_removed() {
        assert_eq!(strip_watt_suffix("1200W"), "1200");
        assert_eq!(strip_watt_suffix(" 800 W "), "800");
        assert_eq!(strip_watt_suffix("950"), "950");
    }

    #[test]
    fn network_reshaping() {
        let raw: NetworkStatus = serde_json::from_value(json!({
            "interface": "wlan0",
            "essid": "MyNet",
            "min_quality": 40,
            "maxQuality": 70,
            "signalLevel": -55
        }))
        .unwrap();

        let info = NetworkInfo::from(raw);
        assert_eq!(info.interface_type, "wlan");
        assert_eq!(info.ssid, "MyNet");
        assert_eq!(info.quality_ratio(), "40/70");
    }

    #[test]
    fn pool_reshaping() {
        let raw: PoolConfig = serde_json::from_value(json!({
            "poolUrl1": "pool.example:3333",
            "username1": "worker1",
            "poolUrl2": "backup.example:3333",
            "username2": "worker2"
        }))
        .unwrap();

        let pool = PoolInfo::from(raw);
        assert_eq!(pool.primary.label(), "worker1\npool.example:3333");
        assert_eq!(pool.fallback.label(), "worker2\nbackup.example:3333");
    }

    #[test]
    fn summary_projection_keeps_known_keys() {
        let raw = object(json!({
            "foundBlocks": 0,
            "poolStatus": "Alive",
            "tunerStatus": "Stable",
            "uptime": 1234,
            "power": { "limitW": 1500, "approxConsumptionW": 1320.5 },
            "realHashrate": {
                "mhs5S": 81_000.5, "mhs1M": 80_900.1, "mhs5M": 80_800.0,
                "mhs15M": 80_700.0, "mhs24H": 80_000.0, "mhsAv": 80_500.0
            }
        }));

        let summary = summary_readings(&raw).unwrap();
        assert!(summary.tuner_engaged);
        assert_eq!(summary.found_blocks, Some(SnapshotValue::Int(0)));
        assert_eq!(summary.pool_status, Some(SnapshotValue::Text("Alive".into())));

        let power = summary.power.unwrap();
        assert_eq!(power.limit_w, SnapshotValue::Int(1500));
        assert_eq!(power.approx_consumption_w, SnapshotValue::Float(1320.5));

        let hashrate = summary.hashrate.unwrap();
        assert_eq!(hashrate.mhs_5s, SnapshotValue::Float(81_000.5));
        assert_eq!(hashrate.mhs_av, SnapshotValue::Float(80_500.0));
    }

    #[test]
    fn idle_summary_has_no_sections() {
        let summary = summary_readings(&object(json!({ "poolStatus": "Dead" }))).unwrap();
        assert!(!summary.tuner_engaged);
        assert!(summary.power.is_none());
        assert!(summary.hashrate.is_none());
        assert!(summary.found_blocks.is_none());
    }

    #[test]
    fn incomplete_section_is_malformed() {
        let raw = object(json!({ "power": { "limitW": 1500 } }));
        let err = summary_readings(&raw).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Generic);
        assert!(err.to_string().contains("power.approxConsumptionW"));
    }
}
