//! Explicit login / logout.

use tracing::info;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::Context;

pub async fn login(ctx: &mut Context, global: &GlobalOpts) -> Result<(), CliError> {
    ctx.client.login().await.map_err(|e| ctx.api_error(e))?;
    info!(cookies = ctx.client.session().cookies().len(), "logged in");
    output::print_output(
        &format!("Logged in to {}", ctx.client.base_url()),
        global.quiet,
    );
    Ok(())
}

pub async fn logout(ctx: &mut Context, global: &GlobalOpts) -> Result<(), CliError> {
    if ctx.client.session().cookies().is_empty() {
        output::print_output("No stored session", global.quiet);
        return Ok(());
    }
    ctx.client.logout().await.map_err(|e| ctx.api_error(e))?;
    output::print_output("Logged out", global.quiet);
    Ok(())
}
