use std::time::Duration;

use thiserror::Error;

/// Top-level error type for the `heatctl-api` crate.
///
/// Every variant belongs to exactly one [`ErrorKind`]; consumers that
/// only care about the coarse classification should match on
/// [`Error::kind`] instead of the variants.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The device rejected the request (HTTP 401 or 403).
    #[error("Invalid credentials (HTTP {status})")]
    Authentication { status: u16 },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, reset, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The request did not complete within the per-call timeout.
    #[error("Request timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    // ── Device ──────────────────────────────────────────────────────
    /// The endpoint does not exist on this device (HTTP 404).
    #[error("Endpoint '{path}' not available -- device firmware is likely outdated")]
    UnsupportedEndpoint { path: String },

    /// Any other non-success HTTP status.
    #[error("HTTP {status}: {reason}")]
    Http { status: u16, reason: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// The payload decoded but did not have the expected shape.
    #[error("Unexpected payload from '{path}': {message}")]
    UnexpectedPayload { path: String, message: String },

    // ── Input ───────────────────────────────────────────────────────
    /// A command argument was rejected before any request was made.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// Credentials or authorization rejected; retrying will not help.
    Authentication,
    /// Timeout, DNS or transport failure; the next poll may succeed.
    Communication,
    /// The endpoint is missing on the device.
    UnsupportedEndpoint,
    /// Anything else, including malformed payloads.
    Generic,
    /// Caller input rejected locally.
    Validation,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Authentication { .. } => ErrorKind::Authentication,
            Self::Timeout { .. } => ErrorKind::Communication,
            Self::Transport(e) if e.is_builder() || e.is_decode() => ErrorKind::Generic,
            Self::Transport(_) => ErrorKind::Communication,
            Self::UnsupportedEndpoint { .. } => ErrorKind::UnsupportedEndpoint,
            Self::InvalidArgument(_) => ErrorKind::Validation,
            Self::InvalidUrl(_)
            | Self::Http { .. }
            | Self::Deserialization { .. }
            | Self::UnexpectedPayload { .. } => ErrorKind::Generic,
        }
    }

    /// Returns `true` if this is a transient error worth retrying on the
    /// next poll.
    pub fn is_transient(&self) -> bool {
        self.kind() == ErrorKind::Communication
    }

    /// Returns `true` if the device rejected our credentials.
    pub fn is_auth_failure(&self) -> bool {
        self.kind() == ErrorKind::Authentication
    }
}
