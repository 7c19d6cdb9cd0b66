//! Clap derive structures for the `fleetwire` CLI.
//!
//! This file is included by `build.rs` for man page generation, so it must
//! only depend on `clap` and `clap_complete`.

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// fleetwire -- enroll a router into the managed VPN fleet
#[derive(Debug, Parser)]
#[command(
    name = "fleetwire",
    version,
    about = "Provision this router into the managed VPN fleet",
    long_about = "Provisions an OpenWrt router into the managed VPN fleet:\n\
        verifies preconditions, enrolls the device by its hardware address,\n\
        configures the mesh overlay and firewall, installs the proxy client,\n\
        and locks SSH down to key-only access.\n\n\
        Runs strictly in order and stops at the first failure.",
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
    /// Enrollment service host (overrides FLEETWIRE_API_HOST)
    #[arg(long, global = true)]
    pub api_host: Option<String>,

    /// Interface whose hardware address identifies the device
    #[arg(
        long,
        short = 'i',
        env = "FLEETWIRE_INTERFACE",
        default_value = "br-lan",
        global = true
    )]
    pub interface: String,

    /// Release repository (owner/name) for the VPN client packages
    #[arg(
        long,
        env = "FLEETWIRE_VPN_REPO",
        default_value = "yichya/luci-app-xray",
        global = true
    )]
    pub vpn_repo: String,

    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = 10, global = true)]
    pub timeout: u64,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "FLEETWIRE_INSECURE", global = true)]
    pub insecure: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the full provisioning sequence on this router
    Setup,

    /// Re-fetch the proxy connection string and rewrite the profile
    Proxy,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
