//! Command dispatch: loads the stored session, runs the handler, stores the
//! session again.

pub mod session;
pub mod stations;
pub mod wlans;

use tracing::{debug, info, warn};

use unictl_api::{Client, Error as ApiError};
use unictl_config::{CredentialStore, FileCredentialStore, Settings, load_settings};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

// ── Controller context ──────────────────────────────────────────────

/// Everything a controller-bound handler needs.
pub struct Context {
    pub client: Client,
    pub site: String,
    auth_file: String,
}

impl Context {
    /// Wrap a controller error with the URL and credential file it concerns.
    pub fn api_error(&self, err: ApiError) -> CliError {
        CliError::from_api(err, self.client.base_url().as_str(), &self.auth_file)
    }

    /// Log in up front when the stored session has never held a cookie.
    async fn ensure_logged_in(&mut self) -> Result<(), CliError> {
        if !self.client.session().cookies().is_empty() {
            return Ok(());
        }
        info!("no stored session, logging in");
        self.client.login().await.map_err(|e| self.api_error(e))
    }
}

// ── Dispatch ────────────────────────────────────────────────────────

/// Dispatch a controller-bound command to the appropriate handler.
///
/// The session is written back to the credential file whatever the
/// handler's outcome; a failed write is only logged.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    let settings = resolve_settings(global)?;
    let store = FileCredentialStore::new(&settings.auth_file);
    let session = store.load()?;

    let base_url = settings.base_url(session.credential())?;
    let auth_file = settings.auth_file.display().to_string();
    let url_text = base_url.to_string();
    let client = Client::with_base_url(session, base_url, &settings.transport())
        .map_err(|e| CliError::from_api(e, &url_text, &auth_file))?;

    let mut ctx = Context {
        client,
        site: settings.site,
        auth_file,
    };
    debug!(base_url = %ctx.client.base_url(), site = %ctx.site, "controller context ready");

    let result = run(cmd, &mut ctx, global).await;

    if let Err(e) = store.save(ctx.client.session()) {
        warn!(path = %store.path().display(), error = %e, "failed to store session");
    }
    result
}

async fn run(cmd: Command, ctx: &mut Context, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Login => session::login(ctx, global).await,
        Command::Logout => session::logout(ctx, global).await,
        cmd => {
            ctx.ensure_logged_in().await?;
            match cmd {
                Command::Stations => stations::list(ctx, global).await,
                Command::Wlans => wlans::list(ctx, global).await,
                Command::GuestWlan { state } => wlans::toggle_guest(ctx, state, global).await,
                // Completions never reach dispatch; login/logout matched above
                Command::Login | Command::Logout | Command::Completions(_) => unreachable!(),
            }
        }
    }
}

/// Settings file and environment, then `--site` / `--auth-file`.
fn resolve_settings(global: &GlobalOpts) -> Result<Settings, CliError> {
    let mut settings = load_settings(global.config.as_deref())?;

    if let Some(ref site) = global.site {
        if site.trim().is_empty() {
            return Err(CliError::Validation {
                field: "site".into(),
                reason: "must not be empty".into(),
            });
        }
        settings.site.clone_from(site);
    }
    if let Some(ref path) = global.auth_file {
        settings.auth_file.clone_from(path);
    }
    Ok(settings)
}
