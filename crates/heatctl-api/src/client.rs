// 21control HTTP client
//
// Wraps `reqwest::Client` with device URL construction, status
// classification and content-type aware body decoding. Endpoint methods
// live in `system.rs` and `heater.rs` as inherent impls so this module
// stays focused on transport mechanics.

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use reqwest::Method;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::{DeviceIdentity, Payload};
use crate::transport::TransportConfig;

/// Path prefix of the control API on the device.
pub const API_PREFIX: &str = "/21control/";

const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// HTTP client for one heater's 21control API.
///
/// Every call is bounded by the configured timeout and returns either a
/// decoded [`Payload`] or a classified [`Error`]. Apart from the cached
/// device identity, the client holds no state between calls.
pub struct DeviceClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
    identity: ArcSwapOption<DeviceIdentity>,
}

impl DeviceClient {
    /// Create a client for the device at `host` (`"192.168.1.40"`,
    /// `"heater.local:8080"` or a full `http://` URL).
    pub fn new(host: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let base_url = Self::base_url_for(host)?;
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url, transport.timeout))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    ///
    /// `base_url` must already point at the API root (see
    /// [`base_url_for`](Self::base_url_for)).
    pub fn with_client(http: reqwest::Client, base_url: Url, timeout: Duration) -> Self {
        Self {
            http,
            base_url,
            timeout,
            identity: ArcSwapOption::empty(),
        }
    }

    /// Resolve the API root URL for a host string.
    pub fn base_url_for(host: &str) -> Result<Url, Error> {
        let host = host.trim().trim_end_matches('/');
        let root = if host.contains("://") {
            host.to_owned()
        } else {
            format!("http://{host}")
        };
        let mut url = Url::parse(&root)?;
        url.set_path(API_PREFIX);
        Ok(url)
    }

    /// The API root URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The per-call timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The identity returned by the most recent
    /// [`get_system`](Self::get_system) call, if any.
    pub fn identity(&self) -> Option<Arc<DeviceIdentity>> {
        self.identity.load_full()
    }

    pub(crate) fn cache_identity(&self, identity: &DeviceIdentity) {
        self.identity.store(Some(Arc::new(identity.clone())));
    }

    // ── Request helpers ──────────────────────────────────────────────

    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Perform one request against `path` (relative to the API root).
    ///
    /// Status handling: 401/403 map to [`Error::Authentication`], 404 to
    /// [`Error::UnsupportedEndpoint`], any other non-2xx to
    /// [`Error::Http`]. The body is parsed as JSON only when the response
    /// declares a JSON content type; if that parse fails the raw text is
    /// returned instead.
    pub async fn call(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Payload, Error> {
        let url = self.endpoint(path)?;
        debug!(%method, %url, "device request");

        let mut request = self.http.request(method.clone(), url).timeout(self.timeout);
        if method == Method::POST {
            request = request.header(CONTENT_TYPE, JSON_CONTENT_TYPE);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let resp = request.send().await.map_err(|e| self.transport_error(e))?;

        let status = resp.status();
        match status.as_u16() {
            401 | 403 => {
                return Err(Error::Authentication {
                    status: status.as_u16(),
                });
            }
            404 => {
                return Err(Error::UnsupportedEndpoint {
                    path: path.to_owned(),
                });
            }
            _ if !status.is_success() => {
                return Err(Error::Http {
                    status: status.as_u16(),
                    reason: status.canonical_reason().unwrap_or("Unknown").to_owned(),
                });
            }
            _ => {}
        }

        let declared_json = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("application/json"));

        let text = resp.text().await.map_err(|e| self.transport_error(e))?;
        let payload = decode_body(text, declared_json);
        trace!(path, ?payload, "device response");
        Ok(payload)
    }

    pub(crate) async fn get(&self, path: &str) -> Result<Payload, Error> {
        self.call(Method::GET, path, None).await
    }

    pub(crate) async fn post(&self, path: &str, body: Option<&Value>) -> Result<Payload, Error> {
        self.call(Method::POST, path, body).await
    }

    /// GET `path` and deserialize the body into `T`.
    ///
    /// Accepts JSON served with a non-JSON content type as well, since
    /// some firmware builds label every response `text/plain`.
    pub(crate) async fn get_as<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        match self.get(path).await? {
            Payload::Json(value) => {
                let body = value.to_string();
                serde_json::from_value(value).map_err(|e| Error::Deserialization {
                    message: format!("{path}: {e}"),
                    body,
                })
            }
            Payload::Text(body) => {
                serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                    message: format!("{path}: {e}"),
                    body,
                })
            }
        }
    }

    fn transport_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout: self.timeout,
            }
        } else {
            Error::Transport(err)
        }
    }
}

fn decode_body(text: String, declared_json: bool) -> Payload {
    if !declared_json {
        return Payload::Text(text);
    }
    match serde_json::from_str(&text) {
        Ok(value) => Payload::Json(value),
        Err(e) => {
            debug!(error = %e, "body declared as JSON failed to parse, keeping text");
            Payload::Text(text)
        }
    }
}
