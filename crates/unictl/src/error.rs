//! CLI error types with miette diagnostics.
//!
//! Maps library errors into user-facing errors with actionable help text
//! and a distinct exit code per failure class.

use miette::Diagnostic;
use thiserror::Error;

use unictl_api::Error as ApiError;
use unictl_config::{ConfigError, StoreError};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const API: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach controller at {url}")]
    #[diagnostic(
        code(unictl::connection_failed),
        help(
            "Check that the controller is running and reachable.\n\
             URL: {url}"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: ApiError,
    },

    #[error("TLS setup failed: {message}")]
    #[diagnostic(
        code(unictl::tls),
        help("Check ca_cert in your settings, or set insecure = true for a self-signed controller.")
    )]
    Tls { message: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed")]
    #[diagnostic(
        code(unictl::auth_failed),
        help("Verify the username and password stored in {auth_file}.")
    )]
    AuthFailed {
        auth_file: String,
        #[source]
        source: ApiError,
    },

    // ── Credential file ──────────────────────────────────────────────
    #[error("Credential file not found: {path}")]
    #[diagnostic(
        code(unictl::no_credentials),
        help(
            "Create it with your controller login, readable only by you:\n  \
             {{\"username\": \"admin\", \"password\": \"...\", \"controller_host\": \"unifi.lan\"}}\n\
             then run: chmod 600 {path}"
        )
    )]
    CredentialsNotFound { path: String },

    #[error("Refusing to use credential file")]
    #[diagnostic(code(unictl::insecure_credentials), help("Run: chmod 600 {path}"))]
    InsecureCredentials {
        path: String,
        #[source]
        source: StoreError,
    },

    #[error("Cannot access credential file")]
    #[diagnostic(code(unictl::credential_store))]
    CredentialStore(#[source] StoreError),

    // ── Controller responses ─────────────────────────────────────────
    #[error("Controller rejected the request ({code}): {message}")]
    #[diagnostic(code(unictl::api_error))]
    Api { code: String, message: String },

    #[error("Controller request failed")]
    #[diagnostic(code(unictl::request_failed))]
    Request(#[source] ApiError),

    #[error("{failed} of {total} wireless networks could not be updated")]
    #[diagnostic(
        code(unictl::partial_failure),
        help("Earlier changes were kept. Re-run with -v to see each failure.")
    )]
    PartialFailure { failed: usize, total: usize },

    #[error("Could not render output: {message}")]
    #[diagnostic(code(unictl::render))]
    Render { message: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(unictl::validation))]
    Validation { field: String, reason: String },

    #[error("Could not load settings")]
    #[diagnostic(
        code(unictl::config),
        help("Check the settings file and any UNICTL_* environment variables.")
    )]
    Config(#[source] ConfigError),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::Tls { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::CredentialsNotFound { .. } => exit_code::NOT_FOUND,
            Self::InsecureCredentials { .. } => exit_code::PERMISSION,
            Self::CredentialStore(StoreError::PermissionDenied { .. }) => exit_code::PERMISSION,
            Self::Api { .. } => exit_code::API,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Classify a controller error, attaching the controller URL to
    /// connection failures and the credential file to auth failures.
    pub fn from_api(err: ApiError, url: &str, auth_file: &str) -> Self {
        let unreachable = matches!(
            err,
            ApiError::Transport(_) | ApiError::Authentication { source: Some(_), .. }
        );
        if unreachable {
            return Self::ConnectionFailed {
                url: url.to_owned(),
                source: err,
            };
        }
        if err.is_auth_failure() {
            return Self::AuthFailed {
                auth_file: auth_file.to_owned(),
                source: err,
            };
        }
        match err {
            ApiError::Api { code, message } => Self::Api { code, message },
            ApiError::Tls(message) => Self::Tls { message },
            other => Self::Request(other),
        }
    }
}

// ── Library error mapping ────────────────────────────────────────────

impl From<StoreError> for CliError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { path } => Self::CredentialsNotFound {
                path: path.display().to_string(),
            },
            StoreError::InsecurePermissions { ref path, .. } => Self::InsecureCredentials {
                path: path.display().to_string(),
                source: err,
            },
            other => Self::CredentialStore(other),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(other),
        }
    }
}
