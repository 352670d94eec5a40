// Authentication handshake
//
// Cookie-based session login/logout. The login response sets the session
// cookie through ordinary `Set-Cookie` headers, which the pipeline captures
// into the session; nothing is read from the body.

use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde_json::json;
use tracing::debug;

use crate::client::{ApiRequest, Client};
use crate::error::Error;

pub(crate) const LOGIN_PATH: &str = "/api/login";
pub(crate) const LOGOUT_PATH: &str = "/api/logout";

impl Client {
    /// Log in with the session's credential.
    ///
    /// `POST /api/login` with `{"username", "password"}` and a `Referer` of
    /// the controller's login page. Succeeds only on HTTP 200. Never retries;
    /// calling it again performs a fresh handshake and may replace the
    /// stored cookies.
    pub async fn login(&mut self) -> Result<(), Error> {
        let credential = self.session().credential();
        let body = json!({
            "username": credential.username(),
            "password": credential.password().expose_secret(),
        });
        let referer = self.endpoint_url("/login")?;
        let request = ApiRequest::post(LOGIN_PATH, &body)?.with_referer(referer.as_str());

        debug!(url = %self.base_url(), username = credential.username(), "logging in");

        let (status, body) = self.dispatch(&request).await.map_err(|err| match err {
            Error::Transport(source) => Error::Authentication {
                message: format!("login request failed: {source}"),
                status: None,
                source: Some(source),
            },
            other => other,
        })?;

        if status != StatusCode::OK {
            let preview: String = body.chars().take(200).collect();
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status}): {preview}"),
                status: Some(status),
                source: None,
            });
        }

        debug!(cookies = self.session().cookies().len(), "login successful");
        Ok(())
    }

    /// End the current session.
    ///
    /// `POST /api/logout`. Local cookies are dropped whatever the controller
    /// answers; only a transport failure is reported.
    pub async fn logout(&mut self) -> Result<(), Error> {
        debug!(url = %self.base_url(), "logging out");

        let request = ApiRequest::post(LOGOUT_PATH, &json!({}))?;
        let result = self.dispatch(&request).await;
        self.session_mut().cookies_mut().clear();

        let (status, _) = result?;
        debug!(%status, "logout complete");
        Ok(())
    }
}
