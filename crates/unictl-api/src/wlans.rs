// Wireless network (WLAN configuration) endpoints
//
// Listing goes through `list/wlanconf`; updates are posted to
// `upd/wlanconf/{id}` with only the fields being changed.

use serde_json::json;
use tracing::debug;

use crate::client::Client;
use crate::error::Error;
use crate::models::WirelessNetwork;

impl Client {
    /// List the wireless network configurations of a site.
    ///
    /// `GET /api/s/{site}/list/wlanconf`
    pub async fn list_wireless_networks(
        &mut self,
        site: &str,
    ) -> Result<Vec<WirelessNetwork>, Error> {
        debug!(site, "listing wireless networks");
        self.get(&Self::site_path(site, "list/wlanconf")).await
    }

    /// Enable or disable one wireless network.
    ///
    /// `POST /api/s/{site}/upd/wlanconf/{id}` with `{"_id": id, "enabled": bool}`
    pub async fn set_wireless_network_enabled(
        &mut self,
        site: &str,
        id: &str,
        enabled: bool,
    ) -> Result<(), Error> {
        debug!(site, id, enabled, "updating wireless network");
        let path = Self::site_path(site, &format!("upd/wlanconf/{id}"));
        let _: serde_json::Value = self
            .post(
                &path,
                &json!({
                    "_id": id,
                    "enabled": enabled,
                }),
            )
            .await?;
        Ok(())
    }
}
