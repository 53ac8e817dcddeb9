// Wire models for the 21control API
//
// Field names follow the device's JSON. Reshaping into snapshot fields
// happens in heatctl-core.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::error::Error;

// ── Payload ─────────────────────────────────────────────────────────

/// A decoded response body.
///
/// The device answers some endpoints with JSON and others with a bare
/// `text/plain` value, so callers receive whichever form the response
/// declared.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Text(String),
}

impl Payload {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(v) => Some(v),
            Self::Text(_) => None,
        }
    }

    /// Convert into a JSON value; text bodies become JSON strings.
    pub fn into_json(self) -> Value {
        match self {
            Self::Json(v) => v,
            Self::Text(s) => Value::String(s),
        }
    }

    /// Interpret the body as a number, parsing string forms like `"812.5"`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Json(Value::Number(n)) => n.as_f64(),
            Self::Json(Value::String(s)) | Self::Text(s) => s.trim().parse().ok(),
            Self::Json(_) => None,
        }
    }

    /// Render the body as text. JSON strings lose their quotes.
    pub fn to_text(&self) -> String {
        match self {
            Self::Json(Value::String(s)) | Self::Text(s) => s.clone(),
            Self::Json(v) => v.to_string(),
        }
    }
}

// ── System ──────────────────────────────────────────────────────────

/// Immutable device identity from `GET status/system`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceIdentity {
    pub product_id: String,
    pub model: String,
    pub version: String,
    pub is_paired: bool,
}

// ── Heater ──────────────────────────────────────────────────────────

/// `GET heater/networkStatus`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkStatus {
    pub interface: String,
    pub essid: String,
    pub min_quality: Number,
    #[serde(rename = "maxQuality")]
    pub max_quality: Number,
    #[serde(rename = "signalLevel")]
    pub signal_level: Number,
}

/// `GET heater/poolConfig`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    #[serde(rename = "poolUrl1")]
    pub pool_url_1: String,
    #[serde(rename = "username1")]
    pub username_1: String,
    #[serde(rename = "poolUrl2")]
    pub pool_url_2: String,
    #[serde(rename = "username2")]
    pub username_2: String,
}

// ── Commands ────────────────────────────────────────────────────────

/// A validated power target level (`0..=4`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct PowerTarget(u8);

impl PowerTarget {
    pub const MIN: u8 = 0;
    pub const MAX: u8 = 4;

    pub fn new(level: i64) -> Result<Self, Error> {
        u8::try_from(level)
            .ok()
            .filter(|l| (Self::MIN..=Self::MAX).contains(l))
            .map(Self)
            .ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "power target must be between {} and {}, but was {level}",
                    Self::MIN,
                    Self::MAX
                ))
            })
    }

    pub fn level(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for PowerTarget {
    type Error = Error;

    fn try_from(level: i64) -> Result<Self, Self::Error> {
        Self::new(level)
    }
}

impl fmt::Display for PowerTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
