// Session cookie set
//
// The controller identifies a logged-in session purely by cookies. The
// session owns them as a plain value: every response is captured into it,
// every request reads its `Cookie` header out of it, and the credential
// store persists a snapshot of it between runs. Storage, matching and
// expiry follow RFC 6265 via `cookie_store`.

use std::convert::Infallible;

use cookie_store::{CookieStore, RawCookie};
use reqwest::header::HeaderValue;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::trace;
use url::Url;

/// One stored cookie with its domain, path and expiry scope.
pub type SessionCookie = cookie_store::Cookie<'static>;

/// Cookies held by a [`Session`](crate::Session).
///
/// A cookie is identified by `(name, domain, path)`. A newer `Set-Cookie`
/// with the same identity replaces the stored one in place; one that is
/// already expired (e.g. `Max-Age=0`) deletes it. Expired cookies are never
/// sent, counted or persisted.
#[derive(Debug, Clone, Default)]
pub struct SessionCookies {
    store: CookieStore,
}

impl SessionCookies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live cookies.
    pub fn len(&self) -> usize {
        self.store.iter_unexpired().count()
    }

    pub fn is_empty(&self) -> bool {
        self.store.iter_unexpired().next().is_none()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SessionCookie> {
        self.store.iter_unexpired()
    }

    /// First live cookie called `name`, whatever its scope.
    pub fn get(&self, name: &str) -> Option<&SessionCookie> {
        self.iter().find(|c| c.name() == name)
    }

    /// Store a cookie as if `url` had answered with `Set-Cookie: {set_cookie}`.
    ///
    /// Returns `false` when the header does not parse or the cookie is not
    /// allowed for `url` (e.g. a `Domain` the host does not belong to).
    pub fn insert_set_cookie(&mut self, set_cookie: &str, url: &Url) -> bool {
        match RawCookie::parse(set_cookie.to_owned()) {
            Ok(raw) => self.insert_raw(&raw, url),
            Err(e) => {
                trace!(error = %e, "unparseable Set-Cookie ignored");
                false
            }
        }
    }

    fn insert_raw(&mut self, raw: &RawCookie<'_>, url: &Url) -> bool {
        match self.store.insert_raw(raw, url) {
            Ok(action) => {
                trace!(name = raw.name(), ?action, "cookie stored");
                true
            }
            Err(e) => {
                trace!(name = raw.name(), error = %e, "cookie rejected");
                false
            }
        }
    }

    /// Store every `Set-Cookie` header of a response received from `url`.
    ///
    /// Returns how many cookies were accepted.
    pub(crate) fn capture<'a>(
        &mut self,
        url: &Url,
        set_cookies: impl Iterator<Item = &'a HeaderValue>,
    ) -> usize {
        set_cookies
            .filter_map(|value| value.to_str().ok())
            .filter(|value| self.insert_set_cookie(value, url))
            .count()
    }

    /// Build the `Cookie` header value for a request to `url`, if any
    /// stored cookie applies to it.
    pub fn header_for(&self, url: &Url) -> Option<String> {
        let pairs: Vec<String> = self
            .store
            .get_request_values(url)
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        (!pairs.is_empty()).then(|| pairs.join("; "))
    }

    /// Copy of the set without cookies that have already expired.
    pub fn snapshot(&self) -> Self {
        let live = self.store.iter_unexpired().cloned().map(Ok::<_, Infallible>);
        Self {
            store: CookieStore::from_cookies(live, false).unwrap_or_default(),
        }
    }

    pub fn clear(&mut self) {
        self.store.clear();
    }
}

// Persisted as a plain array of live cookies.
impl Serialize for SessionCookies {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.store.iter_unexpired())
    }
}

impl<'de> Deserialize<'de> for SessionCookies {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let cookies = Vec::<SessionCookie>::deserialize(deserializer)?;
        let store = CookieStore::from_cookies(cookies.into_iter().map(Ok::<_, Infallible>), false)
            .unwrap_or_default();
        Ok(Self { store })
    }
}
