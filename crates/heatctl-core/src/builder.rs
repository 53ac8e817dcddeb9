// ── Snapshot builder ──
//
// One refresh cycle's worth of device I/O. All reads are issued
// concurrently; the first failure aborts the cycle with its own kind.

use heatctl_api::DeviceClient;
use tracing::trace;

use crate::convert;
use crate::error::CoreError;
use crate::model::{Readings, Snapshot, SnapshotValue};

/// Fetches and assembles one snapshot.
pub struct SnapshotBuilder<'a> {
    client: &'a DeviceClient,
}

impl<'a> SnapshotBuilder<'a> {
    pub fn new(client: &'a DeviceClient) -> Self {
        Self { client }
    }

    /// Fetch every reading of one cycle.
    pub async fn fetch(&self) -> Result<Readings, CoreError> {
        let client = self.client;
        let (
            operational,
            fan_speed,
            power_target,
            power_target_watt,
            temperature,
            network,
            pool,
            summary,
        ) = tokio::try_join!(
            client.get_operational(),
            client.get_fan_speed(),
            client.get_power_target(),
            client.get_power_target_watt(),
            client.get_temperature(),
            client.get_network_status(),
            client.get_pool_config(),
            client.get_summary(),
        )?;
        trace!(summary_keys = summary.len(), "cycle reads complete");

        Ok(Readings {
            operational,
            fan_speed,
            power_target: SnapshotValue::from_payload(power_target),
            power_target_watt: convert::strip_watt_suffix(&power_target_watt),
            temperature,
            network: network.into(),
            pool: pool.into(),
            summary: convert::summary_readings(&summary)?,
        })
    }

    /// Fetch one cycle and project it onto the field table.
    pub async fn build(&self) -> Result<Snapshot, CoreError> {
        let readings = self.fetch().await?;
        Ok(Snapshot::from_readings(&readings))
    }
}
