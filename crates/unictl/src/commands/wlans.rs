//! Wireless network command handlers.

use tabled::Tabled;
use tracing::{info, warn};

use unictl_api::WirelessNetwork;

use crate::cli::{GlobalOpts, Switch};
use crate::error::CliError;
use crate::output::{self, or_dash};

use super::Context;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct WlanRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "SSID")]
    name: String,
    #[tabled(rename = "Enabled")]
    enabled: &'static str,
    #[tabled(rename = "Guest")]
    guest: &'static str,
    #[tabled(rename = "Security")]
    security: String,
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

impl From<&WirelessNetwork> for WlanRow {
    fn from(w: &WirelessNetwork) -> Self {
        let security = match (w.security.as_deref(), w.wpa_mode.as_deref()) {
            (Some(sec), Some(mode)) => format!("{sec} ({mode})"),
            (sec, _) => or_dash(sec),
        };
        Self {
            id: w.id.clone(),
            name: w.name.clone(),
            enabled: yes_no(w.enabled),
            guest: yes_no(w.is_guest),
            security,
        }
    }
}

fn render(global: &GlobalOpts, wlans: &[WirelessNetwork]) -> Result<(), CliError> {
    let out = output::render_list(
        &global.output,
        wlans,
        |w| WlanRow::from(w),
        |w| w.id.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn list(ctx: &mut Context, global: &GlobalOpts) -> Result<(), CliError> {
    info!(site = %ctx.site, "fetching wireless networks");
    let wlans = ctx
        .client
        .list_wireless_networks(&ctx.site)
        .await
        .map_err(|e| ctx.api_error(e))?;
    render(global, &wlans)
}

/// Set every guest network to `state`. A failure on one network is logged
/// and the rest are still attempted; changes already made are kept.
pub async fn toggle_guest(
    ctx: &mut Context,
    state: Switch,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let enabled = state.enabled();

    info!(site = %ctx.site, "fetching wireless networks");
    let guests: Vec<WirelessNetwork> = ctx
        .client
        .list_wireless_networks(&ctx.site)
        .await
        .map_err(|e| ctx.api_error(e))?
        .into_iter()
        .filter(|w| w.is_guest)
        .collect();

    if guests.is_empty() {
        warn!(site = %ctx.site, "no guest wireless networks found");
        return Ok(());
    }

    let total = guests.len();
    let mut updated = Vec::with_capacity(total);
    for mut wlan in guests {
        match ctx
            .client
            .set_wireless_network_enabled(&ctx.site, &wlan.id, enabled)
            .await
        {
            Ok(()) => {
                info!(name = %wlan.name, enabled, "wireless network updated");
                wlan.enabled = enabled;
                updated.push(wlan);
            }
            Err(e) => {
                warn!(
                    name = %wlan.name,
                    id = %wlan.id,
                    error = %e,
                    "failed to update wireless network"
                );
            }
        }
    }

    render(global, &updated)?;

    let failed = total - updated.len();
    if failed > 0 {
        return Err(CliError::PartialFailure { failed, total });
    }
    Ok(())
}
