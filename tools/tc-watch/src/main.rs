//! tc-watch: counter contract operator tool
//!
//! ```text
//! tc-watch address --code <HEX> --sender <ADDR> --owner <ADDR>
//! tc-watch body --to <ADDR> increment 5
//! tc-watch --testnet watch <ADDR> --probe state
//! ```

mod cli;
mod commands;
mod render;

use anyhow::Result;
use clap::Parser;
use tc_telemetry::{init_logging, TelemetryConfig};

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&TelemetryConfig::for_service("tc-watch"))?;

    match &cli.command {
        Command::Address(args) => println!("{}", commands::derive_address(args, cli.testnet)?),
        Command::Body(args) => println!("{}", commands::encode_body(args, cli.testnet)?),
        Command::Watch(args) => commands::watch(args, cli.testnet).await?,
    }
    Ok(())
}
