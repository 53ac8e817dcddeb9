//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text and distinct exit codes.

use miette::Diagnostic;
use thiserror::Error;

use heatctl_config::ConfigError;
use heatctl_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const UNSUPPORTED: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the heater")]
    #[diagnostic(
        code(heatctl::connection_failed),
        help(
            "Check that the heater is powered and on the same network.\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { reason: String },

    #[error("Heater did not answer within {seconds}s")]
    #[diagnostic(
        code(heatctl::timeout),
        help("Increase the timeout with --timeout or check the heater's network link.")
    )]
    Timeout { seconds: u64 },

    // ── Authentication ───────────────────────────────────────────────
    #[error("The heater rejected the request")]
    #[diagnostic(
        code(heatctl::auth_failed),
        help("{message}\nThe device must be re-paired before it can be controlled.")
    )]
    AuthFailed { message: String },

    // ── Device ───────────────────────────────────────────────────────
    #[error("Endpoint '{path}' is not available on this heater")]
    #[diagnostic(
        code(heatctl::unsupported),
        help("The device firmware is likely outdated. Update it from the 21energy app.")
    )]
    Unsupported { path: String },

    #[error("Device error: {message}")]
    #[diagnostic(code(heatctl::device))]
    Device { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(heatctl::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(heatctl::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: heatctl config init --host <HOST> --name {name}"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No heater configured")]
    #[diagnostic(
        code(heatctl::no_config),
        help(
            "Create a profile with: heatctl config init --host <HOST>\n\
             Or pass --host / set HEATCTL_HOST.\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(heatctl::config))]
    Config(ConfigError),

    // ── Serialization ────────────────────────────────────────────────
    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(heatctl::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    #[diagnostic(code(heatctl::yaml))]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to render TOML: {0}")]
    #[diagnostic(code(heatctl::toml))]
    Toml(#[from] toml::ser::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::Unsupported { .. } => exit_code::UNSUPPORTED,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Communication { message } => Self::ConnectionFailed { reason: message },
            CoreError::Timeout { timeout } => Self::Timeout {
                seconds: timeout.as_secs(),
            },
            CoreError::Authentication { message } => Self::AuthFailed { message },
            CoreError::UnsupportedEndpoint { path } => Self::Unsupported { path },
            CoreError::ValidationFailed { message } => Self::Validation {
                field: "input".into(),
                reason: message,
            },
            CoreError::Config { message } => Self::Validation {
                field: "host".into(),
                reason: message,
            },
            CoreError::Generic { message } => Self::Device { message },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(other),
        }
    }
}
