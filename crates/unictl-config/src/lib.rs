//! Settings and credential persistence for unictl.
//!
//! Figment-layered settings (defaults, TOML, `UNICTL_*` env) and the
//! owner-only credential file that carries the session cookies between runs.

pub mod settings;
pub mod store;

pub use settings::{ConfigError, Settings, config_path, default_auth_file, load_settings};
pub use store::{CredentialStore, FileCredentialStore, StoreError};
