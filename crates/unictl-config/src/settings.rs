//! Runtime settings: defaults, TOML file, then `UNICTL_*` environment.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::{BaseDirs, ProjectDirs};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use unictl_api::{Credential, DEFAULT_PORT, TlsMode, TransportConfig};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Settings ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    /// Credential + session cookie file.
    pub auth_file: PathBuf,

    /// Site name the commands operate on.
    pub site: String,

    /// Accept the controller's self-signed certificate.
    pub insecure: bool,

    /// CA certificate to trust when `insecure` is off.
    pub ca_cert: Option<PathBuf>,

    /// Overall request timeout. Unset means none.
    pub timeout_secs: Option<u64>,

    /// Controller HTTPS port.
    pub port: u16,

    /// Full controller root URL, replacing `https://{host}:{port}`
    /// (reverse proxies, test servers).
    pub controller_url: Option<Url>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auth_file: default_auth_file(),
            site: "default".into(),
            insecure: true,
            ca_cert: None,
            timeout_secs: None,
            port: DEFAULT_PORT,
            controller_url: None,
        }
    }
}

impl Settings {
    /// Transport derived from the TLS and timeout settings.
    pub fn transport(&self) -> TransportConfig {
        let tls = if self.insecure {
            TlsMode::DangerAcceptInvalid
        } else if let Some(ref ca_path) = self.ca_cert {
            TlsMode::CustomCa(ca_path.clone())
        } else {
            TlsMode::System
        };

        let transport = TransportConfig::default().with_tls(tls);
        match self.timeout_secs {
            Some(secs) => transport.with_timeout(Duration::from_secs(secs)),
            None => transport,
        }
    }

    /// Controller root URL: the configured override, otherwise
    /// `https://{host}:{port}` for the credential's controller.
    pub fn base_url(&self, credential: &Credential) -> Result<Url, ConfigError> {
        if let Some(ref url) = self.controller_url {
            return Ok(url.clone());
        }
        unictl_api::controller_url(credential.controller_host(), self.port).map_err(|e| {
            ConfigError::Validation {
                field: "controller_host".into(),
                reason: format!("'{}': {e}", credential.controller_host()),
            }
        })
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.site.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "site".into(),
                reason: "must not be empty".into(),
            });
        }
        if self.port == 0 {
            return Err(ConfigError::Validation {
                field: "port".into(),
                reason: "must be between 1 and 65535".into(),
            });
        }
        Ok(self)
    }
}

// ── Paths ───────────────────────────────────────────────────────────

/// `$HOME/.unifi-auth`, or `.unifi-auth` in the working directory when no
/// home directory can be determined.
pub fn default_auth_file() -> PathBuf {
    BaseDirs::new().map_or_else(
        || PathBuf::from(".unifi-auth"),
        |dirs| dirs.home_dir().join(".unifi-auth"),
    )
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "unictl", "unictl").map_or_else(
        || PathBuf::from("unictl.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Loading ─────────────────────────────────────────────────────────

/// Load settings from defaults, the TOML file (`path` or [`config_path`]),
/// and `UNICTL_*` environment variables, in increasing priority. A missing
/// file is not an error.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);

    let settings: Settings = Figment::new()
        .merge(Serialized::defaults(Settings::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("UNICTL_"))
        .extract()?;

    settings.validate()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use figment::Jail;
    use pretty_assertions::assert_eq;
    use secrecy::SecretString;

    #[test]
    fn defaults_apply_without_file() {
        Jail::expect_with(|_jail| {
            let settings = load_settings(Some(Path::new("absent.toml"))).unwrap();
            assert_eq!(settings.site, "default");
            assert!(settings.insecure);
            assert_eq!(settings.port, 8443);
            assert_eq!(settings.timeout_secs, None);
            assert!(settings.auth_file.ends_with(".unifi-auth"));
            Ok(())
        });
    }

    #[test]
    fn file_then_env_override_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                    site = "branch"
                    auth_file = "/srv/unictl/auth.json"
                    timeout_secs = 15
                "#,
            )?;
            jail.set_env("UNICTL_SITE", "lab");
            jail.set_env("UNICTL_INSECURE", "false");

            let settings = load_settings(Some(Path::new("config.toml"))).unwrap();
            assert_eq!(settings.site, "lab");
            assert_eq!(settings.auth_file, PathBuf::from("/srv/unictl/auth.json"));
            assert_eq!(settings.timeout_secs, Some(15));
            assert!(!settings.insecure);
            Ok(())
        });
    }

    #[test]
    fn zero_port_is_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "port = 0")?;
            let result = load_settings(Some(Path::new("config.toml")));
            assert!(matches!(result, Err(ConfigError::Validation { ref field, .. }) if field == "port"));
            Ok(())
        });
    }

    #[test]
    fn blank_site_is_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "site = \"  \"")?;
            let result = load_settings(Some(Path::new("config.toml")));
            assert!(matches!(result, Err(ConfigError::Validation { ref field, .. }) if field == "site"));
            Ok(())
        });
    }

    #[test]
    fn transport_follows_tls_settings() {
        let mut settings = Settings::default();
        assert_eq!(settings.transport().tls, TlsMode::DangerAcceptInvalid);

        settings.insecure = false;
        assert_eq!(settings.transport().tls, TlsMode::System);

        settings.ca_cert = Some(PathBuf::from("/etc/unifi-ca.pem"));
        settings.timeout_secs = Some(5);
        let transport = settings.transport();
        assert_eq!(transport.tls, TlsMode::CustomCa(PathBuf::from("/etc/unifi-ca.pem")));
        assert_eq!(transport.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn base_url_uses_configured_port() {
        let credential = Credential::new("u", SecretString::from("p".to_string()), "unifi.lan");
        let settings = Settings {
            port: 9443,
            ..Settings::default()
        };
        let url = settings.base_url(&credential).unwrap();
        assert_eq!(url.as_str(), "https://unifi.lan:9443/");
    }

    #[test]
    fn controller_url_override_wins() {
        Jail::expect_with(|jail| {
            jail.set_env("UNICTL_CONTROLLER_URL", "http://127.0.0.1:8080");
            let settings = load_settings(Some(Path::new("absent.toml"))).unwrap();
            let credential =
                Credential::new("u", SecretString::from("p".to_string()), "unifi.lan");
            let url = settings.base_url(&credential).unwrap();
            assert_eq!(url.as_str(), "http://127.0.0.1:8080/");
            Ok(())
        });
    }
}
