//! Command-line flags. Each one overrides the matching config key.

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "deeper-mcp",
    version,
    about = "MCP server for Deeper network devices: DPN routing, tunnels, filtering, access control and sharing",
    long_about = None
)]
pub struct Cli {
    /// Config file (default: platform config dir, deeper-mcp/config.toml)
    #[arg(long, short = 'c', env = "DEEPER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Device host or base URL (overrides device.base_url)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Login username (overrides device.username)
    #[arg(long, short = 'u')]
    pub username: Option<String>,

    /// Request timeout in seconds (overrides device.timeout_secs)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Print the effective configuration and exit
    #[arg(long)]
    pub print_config: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}
