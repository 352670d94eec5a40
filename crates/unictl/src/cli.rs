//! Clap derive structures for the `unictl` CLI.

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// unictl -- inspect and toggle a UniFi controller
#[derive(Debug, Parser)]
#[command(
    name = "unictl",
    version,
    about = "Inspect stations and toggle wireless networks on a UniFi controller",
    long_about = "Talks to a standalone UniFi Network controller over its session API.\n\n\
        Credentials and the session cookies are kept in an owner-only file\n\
        (default: ~/.unifi-auth), so a session survives between runs and\n\
        expired sessions are renewed automatically.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Settings file (defaults to the platform config dir)
    #[arg(long, env = "UNICTL_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Credential and session file (overrides settings)
    #[arg(long, global = true)]
    pub auth_file: Option<PathBuf>,

    /// Site name (overrides settings)
    #[arg(long, short = 's', global = true)]
    pub site: Option<String>,

    /// Output format
    #[arg(long, short = 'o', value_enum, default_value = "table", global = true)]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one identifier per line (scripting)
    Plain,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List connected stations (clients)
    #[command(alias = "sta", alias = "clients")]
    Stations,

    /// List wireless networks
    #[command(alias = "wlan")]
    Wlans,

    /// Enable or disable every guest wireless network
    GuestWlan {
        /// on|true|yes to enable, off|false|no to disable
        #[arg(value_name = "on|off")]
        state: Switch,
    },

    /// Log in now and store the new session cookies
    Login,

    /// End the controller session and forget its cookies
    Logout,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

/// Requested on/off state of a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Switch {
    On,
    Off,
}

impl Switch {
    pub fn enabled(self) -> bool {
        self == Self::On
    }
}

impl FromStr for Switch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "on" | "true" | "yes" => Ok(Self::On),
            "off" | "false" | "no" => Ok(Self::Off),
            other => Err(format!(
                "expected on, true, yes, off, false or no, got '{other}'"
            )),
        }
    }
}
