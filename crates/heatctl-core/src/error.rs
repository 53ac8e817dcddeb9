// ── Core error types ──
//
// Errors surfaced by the coordinator. Every API failure is translated
// exactly once, in the `From<heatctl_api::Error>` impl below, so the rest
// of the crate only ever deals with these variants and their `ErrorKind`.

use std::time::Duration;

use heatctl_api::ErrorKind;
use thiserror::Error;

/// Unified error type for the core crate.
///
/// `Clone` so the last failure can live in the coordinator state and be
/// handed to every caller that joined the same refresh cycle.
#[derive(Debug, Clone, Error)]
pub enum CoreError {
    // ── Device errors ────────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    #[error("Cannot reach device: {message}")]
    Communication { message: String },

    #[error("Device did not answer within {}s", timeout.as_secs())]
    Timeout { timeout: Duration },

    #[error("Endpoint '{path}' not available -- device firmware is likely outdated")]
    UnsupportedEndpoint { path: String },

    #[error("Device error: {message}")]
    Generic { message: String },

    // ── Caller errors ────────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Authentication { .. } => ErrorKind::Authentication,
            Self::Communication { .. } | Self::Timeout { .. } => ErrorKind::Communication,
            Self::UnsupportedEndpoint { .. } => ErrorKind::UnsupportedEndpoint,
            Self::ValidationFailed { .. } => ErrorKind::Validation,
            Self::Generic { .. } | Self::Config { .. } => ErrorKind::Generic,
        }
    }

    /// `true` when credentials were rejected and the host should start a
    /// re-authentication flow.
    pub fn requires_reauth(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<heatctl_api::Error> for CoreError {
    fn from(err: heatctl_api::Error) -> Self {
        use heatctl_api::Error as Api;

        match err {
            Api::Authentication { status } => Self::Authentication {
                message: format!("device rejected the request (HTTP {status})"),
            },
            Api::Timeout { timeout } => Self::Timeout { timeout },
            Api::UnsupportedEndpoint { path } => Self::UnsupportedEndpoint { path },
            Api::InvalidArgument(message) => Self::ValidationFailed { message },
            Api::InvalidUrl(e) => Self::Config {
                message: format!("invalid device address: {e}"),
            },
            other if other.kind() == ErrorKind::Communication => Self::Communication {
                message: other.to_string(),
            },
            other => Self::Generic {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_keep_their_kind() {
        let cases = [
            heatctl_api::Error::Authentication { status: 401 },
            heatctl_api::Error::Timeout {
                timeout: Duration::from_secs(10),
            },
            heatctl_api::Error::UnsupportedEndpoint {
                path: "heater/status/summary".into(),
            },
            heatctl_api::Error::Http {
                status: 502,
                reason: "Bad Gateway".into(),
            },
            heatctl_api::Error::UnexpectedPayload {
                path: "heater/status/fan".into(),
                message: "expected a number".into(),
            },
            heatctl_api::Error::InvalidArgument("out of range".into()),
        ];

        for api in cases {
            let expected = api.kind();
            let core = CoreError::from(api);
            assert_eq!(core.kind(), expected, "{core}");
        }
    }

    #[test]
    fn only_authentication_requires_reauth() {
        let auth = CoreError::from(heatctl_api::Error::Authentication { status: 403 });
        assert!(auth.requires_reauth());

        let timeout = CoreError::from(heatctl_api::Error::Timeout {
            timeout: Duration::from_secs(1),
        });
        assert!(!timeout.requires_reauth());
        assert!(matches!(timeout, CoreError::Timeout { .. }));
        assert_eq!(timeout.kind(), ErrorKind::Communication);
    }

    #[test]
    fn unsupported_endpoint_keeps_path() {
        let err = CoreError::from(heatctl_api::Error::UnsupportedEndpoint {
            path: "heater/networkStatus".into(),
        });
        assert!(err.to_string().contains("heater/networkStatus"));
    }
}
