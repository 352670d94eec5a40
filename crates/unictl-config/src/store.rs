//! Credential persistence.
//!
//! A store hands out a [`Session`] (credential plus the cookies saved by the
//! previous run) at startup and takes it back at shutdown. The file-backed
//! store refuses to read a file that group or other users can access.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tempfile::NamedTempFile;
use tracing::debug;

use unictl_api::{Credential, Session, SessionCookies};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("credential file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("permission denied accessing credential file {}", path.display())]
    PermissionDenied { path: PathBuf },

    #[error(
        "security check failed on {}: mode is {mode:04o}; it should not be accessible by group/other",
        path.display()
    )]
    InsecurePermissions { path: PathBuf, mode: u32 },

    #[error("bad credential file {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    fn io(path: &Path, source: io::Error) -> Self {
        let path = path.to_path_buf();
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound { path },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            _ => Self::Io { path, source },
        }
    }
}

// ── Store interface ─────────────────────────────────────────────────

/// Loads and saves the credential plus session cookies.
pub trait CredentialStore {
    fn load(&self) -> Result<Session, StoreError>;

    /// Persist the credential and a snapshot of the session's live cookies.
    fn save(&self, session: &Session) -> Result<(), StoreError>;
}

// ── On-disk record ──────────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
struct AuthRecord {
    username: String,
    password: String,
    controller_host: String,
    #[serde(default)]
    cookies: SessionCookies,
}

impl AuthRecord {
    fn from_session(session: &Session) -> Self {
        let credential = session.credential();
        Self {
            username: credential.username().to_owned(),
            password: credential.password().expose_secret().to_owned(),
            controller_host: credential.controller_host().to_owned(),
            cookies: session.cookies().snapshot(),
        }
    }

    fn into_session(self) -> Session {
        let credential = Credential::new(
            self.username,
            SecretString::from(self.password),
            self.controller_host,
        );
        Session::new(credential, self.cookies)
    }
}

// ── File store ──────────────────────────────────────────────────────

/// JSON credential file, readable and writable by its owner only.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Session, StoreError> {
        let metadata = fs::metadata(&self.path).map_err(|e| StoreError::io(&self.path, e))?;
        check_permissions(&self.path, &metadata)?;

        let raw = fs::read_to_string(&self.path).map_err(|e| StoreError::io(&self.path, e))?;
        let record: AuthRecord =
            serde_json::from_str(&raw).map_err(|source| StoreError::Malformed {
                path: self.path.clone(),
                source,
            })?;

        debug!(
            path = %self.path.display(),
            cookies = record.cookies.len(),
            "loaded credentials"
        );
        Ok(record.into_session())
    }

    fn save(&self, session: &Session) -> Result<(), StoreError> {
        let record = AuthRecord::from_session(session);
        let raw = serde_json::to_vec_pretty(&record).map_err(|source| StoreError::Malformed {
            path: self.path.clone(),
            source,
        })?;

        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;

        // Uniquely named sibling, renamed over the real file once complete.
        let temp = write_private_temp(parent, &raw).map_err(|e| StoreError::io(parent, e))?;
        temp.persist(&self.path).map_err(|e| StoreError::io(&self.path, e.error))?;

        debug!(
            path = %self.path.display(),
            cookies = record.cookies.len(),
            "saved credentials"
        );
        Ok(())
    }
}

#[cfg(unix)]
fn check_permissions(path: &Path, metadata: &fs::Metadata) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;

    let mode = metadata.permissions().mode() & 0o7777;
    if mode & 0o077 != 0 {
        return Err(StoreError::InsecurePermissions {
            path: path.to_path_buf(),
            mode,
        });
    }
    Ok(())
}

#[cfg(not(unix))]
fn check_permissions(_path: &Path, _metadata: &fs::Metadata) -> Result<(), StoreError> {
    Ok(())
}

fn write_private_temp(dir: &Path, contents: &[u8]) -> io::Result<NamedTempFile> {
    let mut temp = NamedTempFile::new_in(dir)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        temp.as_file().set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    temp.write_all(contents)?;
    temp.as_file().sync_all()?;
    Ok(temp)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use pretty_assertions::assert_eq;
    use url::Url;

    fn controller() -> Url {
        Url::parse("https://unifi.lan:8443/api/login").unwrap()
    }

    fn sample_session() -> Session {
        let credential = Credential::new(
            "admin",
            SecretString::from("hunter2".to_string()),
            "unifi.lan",
        );
        let mut cookies = SessionCookies::new();
        assert!(cookies.insert_set_cookie("unifises=abc; Path=/", &controller()));
        Session::new(credential, cookies)
    }

    fn write_private(path: &Path, contents: &[u8]) {
        let dir = path.parent().unwrap();
        write_private_temp(dir, contents).unwrap().persist(path).unwrap();
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join(".unifi-auth"));

        store.save(&sample_session()).unwrap();
        let loaded = store.load().unwrap();

        assert_eq!(loaded.credential().username(), "admin");
        assert_eq!(loaded.credential().password().expose_secret(), "hunter2");
        assert_eq!(loaded.credential().controller_host(), "unifi.lan");
        assert_eq!(loaded.cookies().len(), 1);
        assert_eq!(
            loaded.cookies().header_for(&controller()).as_deref(),
            Some("unifises=abc")
        );
    }

    #[test]
    fn loads_file_without_cookies() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("auth.json");
        write_private(
            &path,
            br#"{"username":"u","password":"p","controller_host":"10.0.0.2"}"#,
        );

        let session = FileCredentialStore::new(&path).load().unwrap();
        assert!(session.cookies().is_empty());
        assert_eq!(session.credential().controller_host(), "10.0.0.2");
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("absent"));
        assert!(matches!(store.load(), Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn malformed_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("auth.json");
        write_private(&path, b"username = 'toml?'");

        let result = FileCredentialStore::new(&path).load();
        assert!(matches!(result, Err(StoreError::Malformed { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn group_or_other_access_fails_security_check() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join(".unifi-auth"));
        store.save(&sample_session()).unwrap();

        for mode in [0o640, 0o604, 0o644] {
            fs::set_permissions(store.path(), fs::Permissions::from_mode(mode)).unwrap();
            match store.load() {
                Err(StoreError::InsecurePermissions { mode: got, .. }) => assert_eq!(got, mode),
                other => panic!("expected InsecurePermissions for {mode:o}, got: {other:?}"),
            }
        }
    }

    #[cfg(unix)]
    #[test]
    fn saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("nested").join(".unifi-auth"));
        store.save(&sample_session()).unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }

    #[test]
    fn repeated_saves_leave_only_the_credential_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".unifi-auth");
        let first = FileCredentialStore::new(&path);
        let second = FileCredentialStore::new(&path);

        first.save(&sample_session()).unwrap();
        second.save(&sample_session()).unwrap();
        first.save(&sample_session()).unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from(".unifi-auth")]);
        assert_eq!(second.load().unwrap().cookies().len(), 1);
    }
}
