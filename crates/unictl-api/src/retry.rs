// Re-authentication state machine
//
// A logical call starts `Fresh`. The only transition is to `RetriedOnce`,
// taken after a successful re-login; from there every outcome is terminal.
// `classify` is pure so the "at most one retry" rule can be tested without
// a server.

use reqwest::StatusCode;

use crate::error::Error;
use crate::models::Meta;

/// Message the controller sends with a 401 when the session cookie is
/// missing or has expired.
pub(crate) const LOGIN_REQUIRED: &str = "api.err.LoginRequired";

/// Where a logical call is in its retry budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Attempt {
    Fresh,
    RetriedOnce,
}

/// What the pipeline should do with a decoded response.
#[derive(Debug)]
pub(crate) enum Verdict {
    Success,
    Reauthenticate,
    Fail(Error),
}

impl Attempt {
    pub(crate) fn classify(self, status: StatusCode, meta: &Meta) -> Verdict {
        if status == StatusCode::OK {
            if meta.is_ok() {
                return Verdict::Success;
            }
            return Verdict::Fail(Error::Api {
                code: meta.rc.clone(),
                message: meta.msg.clone().unwrap_or_default(),
            });
        }

        if status == StatusCode::UNAUTHORIZED
            && self == Self::Fresh
            && meta.msg.as_deref() == Some(LOGIN_REQUIRED)
        {
            return Verdict::Reauthenticate;
        }

        Verdict::Fail(Error::Http {
            status,
            code: Some(meta.rc.clone()),
            message: meta.msg.clone(),
        })
    }
}
