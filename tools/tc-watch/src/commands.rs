//! Subcommand implementations.
//!
//! `address` and `body` are pure and return the text to print. `watch` drives
//! a [`StateMonitor`] against the HTTP ledger until Ctrl-C.

use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};
use tc_01_cell_codec::{Cell, FriendlyFlags};
use tc_02_address_deriver::state_init_hash;
use tc_03_message_protocol::{ContractConfig, Operation, OutboundMessage, TransferRequest};
use tc_04_state_monitor::{
    BalanceProbe, FullStateProbe, HttpLedgerClient, HttpLedgerConfig, LatestSenderProbe,
    LedgerQuery, MonitorConfig, MonitorStats, StateMonitor, StateProbe, StorageProbe,
};
use tracing::{info, warn};

use crate::cli::{AddressArgs, BodyArgs, ProbeKind, WatchArgs};
use crate::render::Render;

fn network_flags(testnet: bool, bounceable: bool) -> FriendlyFlags {
    FriendlyFlags {
        bounceable,
        test_only: testnet,
        url_safe: true,
    }
}

/// Derive the deploy address and state init for `args`.
pub fn derive_address(args: &AddressArgs, testnet: bool) -> Result<String> {
    let code = Cell::from_boc_hex(&args.code)
        .context("contract code is not a valid hex bag of cells")?;
    let config = ContractConfig {
        number: args.number,
        address: args.sender,
        owner_address: args.owner,
    };
    let (address, state_init) = config
        .deploy(code, args.workchain)
        .context("failed to build initial storage")?;
    let state_init_boc = state_init
        .to_cell()
        .context("failed to build state init cell")?
        .to_boc_base64();

    Ok([
        format!("raw:             {}", address.to_raw_string()),
        format!("bounceable:      {}", address.to_friendly(network_flags(testnet, true))),
        format!("non-bounceable:  {}", address.to_friendly(network_flags(testnet, false))),
        format!("state init hash: {}", hex::encode(state_init_hash(&state_init))),
        format!("state init:      {state_init_boc}"),
    ]
    .join("\n"))
}

/// Encode the body for `args`, plus a deep link when a destination is given.
pub fn encode_body(args: &BodyArgs, testnet: bool) -> Result<String> {
    let operation = Operation::from(&args.op);
    let body = operation.encode().context("failed to encode body")?;

    let op_code = operation
        .op_code()
        .map_or_else(|| "none".to_string(), |code| code.to_string());
    let mut lines = vec![
        format!("op:        {} (op code {op_code})", operation.name()),
        format!("body:      {}", body.to_boc_base64()),
        format!("body hash: {}", body.hash_hex()),
    ];

    if let Some(destination) = args.to {
        let message = OutboundMessage::new(destination, args.value, &operation)
            .context("failed to build message")?;
        let link = TransferRequest::from_message(&message, args.text.clone(), testnet)
            .to_deep_link()
            .context("failed to render deep link")?;
        lines.push(format!("link:      {link}"));
    }
    Ok(lines.join("\n"))
}

/// Watch a contract until Ctrl-C.
pub async fn watch(args: &WatchArgs, testnet: bool) -> Result<()> {
    let mut ledger_config = HttpLedgerConfig::public(testnet);
    if let Some(endpoint) = &args.endpoint {
        ledger_config.endpoint = endpoint.trim_end_matches('/').to_string();
    }
    let monitor_config = MonitorConfig {
        poll_interval_ms: args.interval_ms,
        strict_decoding: !args.lenient,
        require_active_account: !args.skip_account_check,
        ..MonitorConfig::default()
    };
    monitor_config
        .validate()
        .map_err(anyhow::Error::msg)
        .context("invalid monitor configuration")?;

    let ledger = Arc::new(
        HttpLedgerClient::new(&ledger_config).context("failed to build ledger client")?,
    );
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("[tc-watch] Cannot listen for Ctrl-C: {}", e);
        }
    };
    let print = |line: String| println!("{line}");
    let address = args.address;

    let stats = match args.probe {
        ProbeKind::Sender => {
            let monitor = StateMonitor::new(monitor_config, ledger, LatestSenderProbe, address);
            run_monitor(monitor, shutdown, testnet, print).await?
        }
        ProbeKind::Storage => {
            let monitor = StateMonitor::new(monitor_config, ledger, StorageProbe, address);
            run_monitor(monitor, shutdown, testnet, print).await?
        }
        ProbeKind::Balance => {
            let monitor = StateMonitor::new(monitor_config, ledger, BalanceProbe, address);
            run_monitor(monitor, shutdown, testnet, print).await?
        }
        ProbeKind::State => {
            let monitor = StateMonitor::new(monitor_config, ledger, FullStateProbe, address);
            run_monitor(monitor, shutdown, testnet, print).await?
        }
    };

    info!(
        "[tc-watch] Done: {} ticks, {} updates, {} unchanged, {} failures ({} transient)",
        stats.ticks, stats.updates, stats.unchanged, stats.failures, stats.transient_failures
    );
    Ok(())
}

/// Forward every notification to `emit` until `shutdown` resolves or the
/// monitor stops on its own.
pub async fn run_monitor<L, P, F, E>(
    monitor: StateMonitor<L, P>,
    shutdown: F,
    testnet: bool,
    mut emit: E,
) -> Result<MonitorStats>
where
    L: LedgerQuery + 'static,
    P: StateProbe,
    P::Value: Render,
    F: Future<Output = ()>,
    E: FnMut(String),
{
    let (handle, mut changes) = monitor.spawn();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("[tc-watch] Shutdown requested");
                break;
            }
            change = changes.recv() => match change {
                Some(change) => emit(format!("{} {}", change.checkpoint, change.current.render(testnet))),
                None => break,
            },
        }
    }

    handle.shutdown().await.context("monitor task failed")
}
