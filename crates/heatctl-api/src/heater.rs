// Heater endpoints
//
// Readings under `heater/...` plus the two mutating commands.

use serde_json::{Map, Value, json};
use tracing::debug;

use crate::client::DeviceClient;
use crate::error::Error;
use crate::models::{NetworkStatus, Payload, PoolConfig, PowerTarget};

impl DeviceClient {
    /// Current fan speed, truncated to an integer.
    ///
    /// `GET heater/status/fan` → numeric string such as `"2150.0"`
    #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
    pub async fn get_fan_speed(&self) -> Result<i64, Error> {
        let value = self.get_number("heater/status/fan").await?;
        Ok(value.trunc() as i64)
    }

    /// Raw power target level as reported by the device.
    ///
    /// `GET heater/powerTarget`
    pub async fn get_power_target(&self) -> Result<Payload, Error> {
        self.get("heater/powerTarget").await
    }

    /// Power target in watts, as the device renders it (e.g. `"1200W"`).
    ///
    /// `GET heater/powerTarget/watt`
    pub async fn get_power_target_watt(&self) -> Result<String, Error> {
        Ok(self.get("heater/powerTarget/watt").await?.to_text())
    }

    /// Current temperature reading.
    ///
    /// `GET heater/status/temperature`
    pub async fn get_temperature(&self) -> Result<f64, Error> {
        self.get_number("heater/status/temperature").await
    }

    /// Raw status summary object.
    ///
    /// `GET heater/status/summary`
    ///
    /// Returned untouched: the set of keys varies with firmware and with
    /// whether the control loop is engaged.
    pub async fn get_summary(&self) -> Result<Map<String, Value>, Error> {
        self.get_as("heater/status/summary").await
    }

    /// `GET heater/networkStatus`
    pub async fn get_network_status(&self) -> Result<NetworkStatus, Error> {
        self.get_as("heater/networkStatus").await
    }

    /// `GET heater/poolConfig`
    pub async fn get_pool_config(&self) -> Result<PoolConfig, Error> {
        self.get_as("heater/poolConfig").await
    }

    /// Set the power target level.
    ///
    /// `POST heater/powerTarget/{level}`
    pub async fn set_power_target(&self, target: PowerTarget) -> Result<(), Error> {
        debug!(%target, "setting power target");
        self.post(&format!("heater/powerTarget/{target}"), None).await?;
        Ok(())
    }

    /// Enable or disable the heater.
    ///
    /// `POST heater/enable` with `{"enabled": bool}`
    pub async fn set_enabled(&self, enabled: bool) -> Result<(), Error> {
        debug!(enabled, "setting heater enable flag");
        self.post("heater/enable", Some(&json!({ "enabled": enabled })))
            .await?;
        Ok(())
    }

    async fn get_number(&self, path: &str) -> Result<f64, Error> {
        let payload = self.get(path).await?;
        payload.as_f64().ok_or_else(|| Error::UnexpectedPayload {
            path: path.to_owned(),
            message: format!("expected a number, got {}", payload.to_text()),
        })
    }
}
