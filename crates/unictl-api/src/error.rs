use reqwest::StatusCode;
use thiserror::Error;

/// Top-level error type for the `unictl-api` crate.
///
/// Every request either yields its decoded payload or exactly one of these
/// classes. Only an expired session is recovered internally (by logging in
/// again once); everything else reaches the caller unchanged.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The login handshake was rejected or could not be completed.
    ///
    /// Carries the HTTP status when the controller answered, or the
    /// transport error when it never did.
    #[error("Authentication failed: {message}")]
    Authentication {
        message: String,
        status: Option<StatusCode>,
        #[source]
        source: Option<reqwest::Error>,
    },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or HTTP client construction failed.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Controller responses ────────────────────────────────────────
    /// HTTP 200 with a well-formed envelope whose `meta.rc` is not `"ok"`.
    #[error("Controller API error (rc={code}): {message}")]
    Api { code: String, message: String },

    /// Any status other than 200 that is not a recoverable session expiry.
    #[error("Unexpected HTTP status {status}")]
    Http {
        status: StatusCode,
        code: Option<String>,
        message: Option<String>,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// Response body was not a valid envelope, or its payload did not
    /// match the expected shape. The raw body is kept for debugging.
    #[error("Deserialization error: {message}")]
    Decode { message: String, body: String },

    /// A request body could not be serialized to JSON.
    #[error("Failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),
}

impl Error {
    /// Returns `true` if the controller refused our identity, either at
    /// login or with a 401 that survived the single re-login.
    pub fn is_auth_failure(&self) -> bool {
        match self {
            Self::Authentication { .. } => true,
            Self::Http { status, .. } => *status == StatusCode::UNAUTHORIZED,
            _ => false,
        }
    }

    /// Returns `true` if this is a transient network error worth retrying
    /// at a higher level. The request pipeline itself never does.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Authentication {
                source: Some(e), ..
            } => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// The HTTP status attached to this error, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Authentication { status, .. } => *status,
            Self::Transport(e) => e.status(),
            _ => None,
        }
    }

    pub(crate) fn decode(err: &serde_json::Error, body: &str) -> Self {
        let preview: String = body.chars().take(200).collect();
        Self::Decode {
            message: format!("{err} (body preview: {preview:?})"),
            body: body.to_owned(),
        }
    }
}
