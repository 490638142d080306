mod cli;
mod error;
mod mcp;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use deeper_api::SystemPing;
use deeper_config::Config;
use deeper_core::ToolDispatcher;

use crate::cli::Cli;
use crate::error::McpError;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.log_json);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

/// Logs go to stderr; stdout carries the protocol.
fn init_tracing(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(cli: Cli) -> Result<(), McpError> {
    let config = load_config(&cli)?;

    if cli.print_config {
        print!("{}", config.render()?);
        return Ok(());
    }

    let client = config.device_client()?;
    info!(
        base_url = %client.base_url(),
        version = env!("CARGO_PKG_VERSION"),
        "{} listening on stdio",
        mcp::SERVER_NAME
    );

    let dispatcher = ToolDispatcher::new(client, SystemPing::default(), config.login_defaults());
    mcp::run_stdio(dispatcher).await?;
    Ok(())
}

/// Config file and environment, then command-line overrides.
fn load_config(cli: &Cli) -> Result<Config, McpError> {
    let mut config = deeper_config::load_config(cli.config.as_deref())?;
    if let Some(ref url) = cli.base_url {
        config.device.base_url.clone_from(url);
    }
    if let Some(ref username) = cli.username {
        config.device.username.clone_from(username);
    }
    if let Some(timeout) = cli.timeout {
        config.device.timeout_secs = timeout;
    }
    config.validate()?;
    Ok(config)
}
