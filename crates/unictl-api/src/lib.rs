// unictl-api: Async Rust client for the UniFi controller's cookie-session API

pub mod auth;
pub mod client;
pub mod cookies;
pub mod credential;
pub mod error;
pub mod models;
mod retry;
pub mod session;
pub mod stations;
pub mod transport;
pub mod wlans;

pub use client::{ApiRequest, Client, DEFAULT_PORT, controller_url};
pub use cookies::{SessionCookie, SessionCookies};
pub use credential::Credential;
pub use error::Error;
pub use models::{Envelope, Meta, Station, WirelessNetwork};
pub use session::Session;
pub use transport::{TlsMode, TransportConfig};
