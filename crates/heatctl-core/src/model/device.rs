// ── Device identity ──

use std::fmt;

use heatctl_api::DeviceIdentity;
use serde::Serialize;

pub const MANUFACTURER: &str = "21energy";

/// Identity of the coordinated heater, fetched once at start-up.
///
/// `product_id` is the stable key: every field exposed for this device is
/// addressed as `{product_id}_{field}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    pub product_id: String,
    pub model: String,
    pub firmware: String,
    pub paired: bool,
}

impl DeviceInfo {
    pub fn manufacturer(&self) -> &'static str {
        MANUFACTURER
    }

    /// Human-facing device name, e.g. `"21energy Heater S1"`.
    pub fn display_name(&self) -> String {
        format!("{MANUFACTURER} {}", self.model)
    }

    /// Stable identifier for one field of this device.
    pub fn entity_id(&self, field: &str) -> String {
        format!("{}_{field}", self.product_id)
    }
}

impl From<DeviceIdentity> for DeviceInfo {
    fn from(identity: DeviceIdentity) -> Self {
        Self {
            product_id: identity.product_id,
            model: identity.model,
            firmware: identity.version,
            paired: identity.is_paired,
        }
    }
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_name(), self.product_id)
    }
}
