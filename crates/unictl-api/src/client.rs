// Controller HTTP client and request pipeline
//
// Wraps `reqwest::Client` with URL construction, session cookie handling,
// envelope decoding, and the single re-login on session expiry. Endpoint
// accessors (stations, wlans) and the login handshake are inherent methods
// in separate files to keep this module focused on transport mechanics.

use std::fmt;

use reqwest::Method;
use reqwest::StatusCode;
use reqwest::header::{COOKIE, REFERER, SET_COOKIE};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace, warn};
use url::Url;

use crate::cookies::SessionCookies;
use crate::error::Error;
use crate::models::Envelope;
use crate::retry::{Attempt, Verdict};
use crate::session::Session;
use crate::transport::TransportConfig;

/// Port the standalone controller serves its HTTPS API on.
pub const DEFAULT_PORT: u16 = 8443;

/// `https://{host}:{port}` for a controller host.
pub fn controller_url(host: &str, port: u16) -> Result<Url, Error> {
    Url::parse(&format!("https://{host}:{port}")).map_err(Error::InvalidUrl)
}

// ── Request description ──────────────────────────────────────────────

/// One logical API call. Kept as data so the pipeline can rebuild and
/// resend it after re-authenticating.
#[derive(Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    body: Option<serde_json::Value>,
    referer: Option<String>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            body: None,
            referer: None,
        }
    }

    /// A POST with a JSON body.
    pub fn post(path: impl Into<String>, body: &impl Serialize) -> Result<Self, Error> {
        let body = serde_json::to_value(body).map_err(Error::Encode)?;
        Ok(Self {
            method: Method::POST,
            path: path.into(),
            body: Some(body),
            referer: None,
        })
    }

    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }
}

// Bodies may carry the password, so only the shape is printed.
impl fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiRequest")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("has_body", &self.body.is_some())
            .field("referer", &self.referer)
            .finish()
    }
}

// ── Client ───────────────────────────────────────────────────────────

/// HTTP client for one controller session.
///
/// Owns the [`Session`] it authenticates as. Every operation that may touch
/// the session cookies takes `&mut self`, so a client is driven by a single
/// caller at a time; concurrent work needs independent clients.
pub struct Client {
    http: reqwest::Client,
    base_url: Url,
    session: Session,
}

impl Client {
    /// Build a client for `https://{host}:8443`, where `host` comes from the
    /// session's credential.
    pub fn new(session: Session, transport: &TransportConfig) -> Result<Self, Error> {
        let base_url = controller_url(session.credential().controller_host(), DEFAULT_PORT)?;
        Self::with_base_url(session, base_url, transport)
    }

    /// Build a client against an explicit controller root URL.
    pub fn with_base_url(
        session: Session,
        base_url: Url,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url, session))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url, session: Session) -> Self {
        Self {
            http,
            base_url,
            session,
        }
    }

    /// The controller root URL, e.g. `https://controller:8443`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub(crate) fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Every live cookie currently held, ready to be persisted.
    pub fn snapshot_cookies(&self) -> SessionCookies {
        self.session.cookies().snapshot()
    }

    /// Give the session back, e.g. to write it to the credential store.
    pub fn into_session(self) -> Session {
        self.session
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// `{base}{path}`. `path` must start with `/`.
    pub(crate) fn endpoint_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}{path}")).map_err(Error::InvalidUrl)
    }

    /// `/api/s/{site}/{suffix}`: most endpoints are site-scoped.
    pub(crate) fn site_path(site: &str, suffix: &str) -> String {
        format!("/api/s/{site}/{suffix}")
    }

    // ── Request helpers ──────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&mut self, path: &str) -> Result<T, Error> {
        self.execute(&ApiRequest::get(path)).await
    }

    pub(crate) async fn post<T: DeserializeOwned>(
        &mut self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, Error> {
        let request = ApiRequest::post(path, body)?;
        self.execute(&request).await
    }

    /// Run one logical API call and return its decoded `data` payload.
    ///
    /// A 401 carrying `api.err.LoginRequired` on the first attempt triggers
    /// one [`login`](Self::login) and one resend of the same request. Every
    /// other failure, and any failure on the resend, is returned as is.
    /// At most two HTTP attempts are made per call.
    pub async fn execute<T: DeserializeOwned>(&mut self, request: &ApiRequest) -> Result<T, Error> {
        let mut attempt = Attempt::Fresh;
        loop {
            debug!(method = %request.method, path = %request.path, ?attempt, "sending request");

            let (status, body) = self.dispatch(request).await?;
            let envelope = Envelope::decode(&body)?;

            match attempt.classify(status, &envelope.meta) {
                Verdict::Success => return envelope.into_payload(&body),
                Verdict::Reauthenticate => {
                    warn!(path = %request.path, "controller session expired, logging in again");
                    self.login().await?;
                    attempt = Attempt::RetriedOnce;
                }
                Verdict::Fail(err) => {
                    debug!(path = %request.path, %status, error = %err, "request failed");
                    return Err(err);
                }
            }
        }
    }

    /// Send a request with the session cookies attached, capture any
    /// cookies the controller sets, and read the whole body.
    pub(crate) async fn dispatch(
        &mut self,
        request: &ApiRequest,
    ) -> Result<(StatusCode, String), Error> {
        let url = self.endpoint_url(&request.path)?;

        let mut builder = self.http.request(request.method.clone(), url.clone());
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }
        if let Some(ref referer) = request.referer {
            builder = builder.header(REFERER, referer);
        }
        if let Some(cookie) = self.session.cookies().header_for(&url) {
            builder = builder.header(COOKIE, cookie);
        }

        let resp = builder.send().await.map_err(Error::Transport)?;
        let status = resp.status();

        let captured = self
            .session
            .cookies_mut()
            .capture(&url, resp.headers().get_all(SET_COOKIE).iter());
        if captured > 0 {
            trace!(captured, "stored cookies from response");
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        trace!(%status, len = body.len(), "response received");
        Ok((status, body))
    }
}
