// Station (client) endpoints

use tracing::debug;

use crate::client::Client;
use crate::error::Error;
use crate::models::Station;

impl Client {
    /// List all currently connected stations of a site.
    ///
    /// `GET /api/s/{site}/stat/sta`
    pub async fn list_stations(&mut self, site: &str) -> Result<Vec<Station>, Error> {
        debug!(site, "listing connected stations");
        self.get(&Self::site_path(site, "stat/sta")).await
    }
}
