//! Station (client) command handlers.

use tabled::Tabled;
use tracing::info;

use unictl_api::Station;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output::{self, or_dash};

use super::Context;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct StationRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Type")]
    kind: &'static str,
    #[tabled(rename = "Last Seen")]
    last_seen: String,
}

impl From<&Station> for StationRow {
    fn from(s: &Station) -> Self {
        Self {
            name: s.display_name().to_owned(),
            mac: or_dash(s.mac.as_deref()),
            ip: or_dash(s.ip.as_deref()),
            kind: if s.is_wired { "wired" } else { "wireless" },
            last_seen: s
                .last_seen
                .map_or_else(|| "-".into(), |t| t.format("%Y-%m-%d %H:%M:%S").to_string()),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn list(ctx: &mut Context, global: &GlobalOpts) -> Result<(), CliError> {
    info!(site = %ctx.site, "fetching stations");
    let stations = ctx
        .client
        .list_stations(&ctx.site)
        .await
        .map_err(|e| ctx.api_error(e))?;

    let out = output::render_list(
        &global.output,
        &stations,
        |s| StationRow::from(s),
        |s| s.mac.clone().unwrap_or_else(|| s.id.clone()),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
