// Controller response types
//
// Every non-login response is wrapped in the `Envelope`. Record fields use
// `#[serde(default)]` liberally because the controller is inconsistent about
// field presence across firmware versions.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::Error;

// ── Response Envelope ────────────────────────────────────────────────

/// Standard controller response envelope.
///
/// ```json
/// { "meta": { "rc": "ok", "msg": "optional" }, "data": [...] }
/// ```
///
/// `data` is only meaningful when `meta.rc == "ok"`. The pipeline first
/// decodes it as raw JSON and only converts it to the caller's type once
/// the call is known to have succeeded.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    pub meta: Meta,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Metadata from the envelope. `rc == "ok"` means success.
#[derive(Debug, Clone, Deserialize)]
pub struct Meta {
    pub rc: String,
    #[serde(default)]
    pub msg: Option<String>,
}

impl Meta {
    pub const RC_OK: &'static str = "ok";

    pub fn is_ok(&self) -> bool {
        self.rc == Self::RC_OK
    }
}

impl Envelope {
    /// Decode a raw response body. Anything that is not JSON with a
    /// `meta.rc` field is a [`Error::Decode`].
    pub fn decode(body: &str) -> Result<Self, Error> {
        serde_json::from_str(body).map_err(|e| Error::decode(&e, body))
    }

    /// Convert the raw payload into the caller's expected shape.
    pub fn into_payload<T: DeserializeOwned>(self, body: &str) -> Result<T, Error> {
        serde_json::from_value(self.data).map_err(|e| Error::decode(&e, body))
    }
}

// ── Station ──────────────────────────────────────────────────────────

/// Connected client (station) from `stat/sta`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub is_wired: bool,
    #[serde(default)]
    pub mac: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
    /// Sent as Unix seconds.
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub last_seen: Option<DateTime<Utc>>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Station {
    /// Best human-readable label: alias, then hostname, then MAC.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.hostname.as_deref())
            .or(self.mac.as_deref())
            .unwrap_or(&self.id)
    }
}

// ── Wireless network ─────────────────────────────────────────────────

/// WLAN configuration from `list/wlanconf`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WirelessNetwork {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub security: Option<String>,
    #[serde(default)]
    pub wpa_mode: Option<String>,
    #[serde(default)]
    pub is_guest: bool,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
