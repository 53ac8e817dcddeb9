// System endpoints
//
// Device-level status and identity.

use serde_json::Value;
use tracing::debug;

use crate::client::DeviceClient;
use crate::error::Error;
use crate::models::{DeviceIdentity, Payload};

impl DeviceClient {
    /// Whether the device reports itself operational.
    ///
    /// `GET status` → `{"operational": bool}`
    ///
    /// JSON labelled `text/plain` is parsed like any other body. Anything
    /// other than a literal `true` (missing key, unparseable text,
    /// non-boolean value) reads as not operational.
    pub async fn get_operational(&self) -> Result<bool, Error> {
        let body = match self.get("status").await? {
            Payload::Json(value) => value,
            Payload::Text(text) => serde_json::from_str(&text).unwrap_or(Value::Null),
        };
        Ok(body
            .get("operational")
            .and_then(Value::as_bool)
            .unwrap_or(false))
    }

    /// Fetch the device identity and remember it for
    /// [`identity`](Self::identity).
    ///
    /// `GET status/system` → `{model, isPaired, productId, version}`
    pub async fn get_system(&self) -> Result<DeviceIdentity, Error> {
        let identity: DeviceIdentity = self.get_as("status/system").await?;
        debug!(product_id = %identity.product_id, model = %identity.model, "fetched device identity");
        self.cache_identity(&identity);
        Ok(identity)
    }
}
