use crate::cookies::SessionCookies;
use crate::credential::Credential;

/// One authenticated identity: the account plus the cookies proving it.
///
/// Created at startup from the credential store, mutated in place by login
/// and by every response that sets cookies, and handed back to the store at
/// shutdown via [`Client::into_session`](crate::Client::into_session).
#[derive(Debug, Clone)]
pub struct Session {
    credential: Credential,
    cookies: SessionCookies,
}

impl Session {
    pub fn new(credential: Credential, cookies: SessionCookies) -> Self {
        Self {
            credential,
            cookies,
        }
    }

    /// A session that has never logged in.
    pub fn fresh(credential: Credential) -> Self {
        Self::new(credential, SessionCookies::new())
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn cookies(&self) -> &SessionCookies {
        &self.cookies
    }

    pub(crate) fn cookies_mut(&mut self) -> &mut SessionCookies {
        &mut self.cookies
    }

    pub fn into_parts(self) -> (Credential, SessionCookies) {
        (self.credential, self.cookies)
    }
}
