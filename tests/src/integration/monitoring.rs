//! # Monitoring Flows
//!
//! Runs [`StateMonitor`](tc_04_state_monitor::StateMonitor) against the
//! sandbox while wallets mutate the contract, checking that every observable
//! change produces exactly one notification.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use tc_01_cell_codec::{Address, Builder, Cell};
    use tc_03_message_protocol::{to_nano, ContractConfig, ContractState, Operation, OutboundMessage};
    use tc_04_state_monitor::{
        AccountStatus, FullStateProbe, LatestSenderProbe, MonitorConfig, MonitorError,
        StateMonitor, TickOutcome,
    };
    use tokio::time::timeout;

    use crate::sandbox::{SandboxLedger, SandboxWallet};

    fn code() -> Cell {
        let mut builder = Builder::new();
        builder.store_uint(0xdead_beef, 32).unwrap();
        builder.end_cell()
    }

    fn deploy_message(init: &SandboxWallet, owner: &SandboxWallet) -> OutboundMessage {
        let config = ContractConfig {
            number: 0,
            address: init.address(),
            owner_address: owner.address(),
        };
        OutboundMessage::deploy(&config, code(), 0, to_nano("0.05").unwrap()).unwrap()
    }

    fn increment(contract: Address, amount: u32) -> OutboundMessage {
        OutboundMessage::new(contract, to_nano("0.05").unwrap(), &Operation::Increment { amount })
            .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_monitor_waits_for_deploy_then_tracks_sender() {
        let ledger = Arc::new(SandboxLedger::new());
        let init = ledger.treasury("initWallet");
        let owner = ledger.treasury("ownerWallet");
        let sender = ledger.treasury("sender");
        let deploy = deploy_message(&init, &owner);
        let contract = deploy.destination;

        let config = MonitorConfig {
            require_active_account: true,
            ..MonitorConfig::for_testing()
        };
        let monitor = StateMonitor::new(config, Arc::clone(&ledger), LatestSenderProbe, contract);
        let (handle, mut changes) = monitor.spawn();

        // Ticks at 0, 100 and 200 ms find no account.
        tokio::time::sleep(Duration::from_millis(250)).await;
        init.send(deploy).unwrap();

        let first = changes.recv().await.unwrap();
        assert_eq!(first.previous, None);
        assert_eq!(first.current, Some(init.address()));

        sender.send(increment(contract, 5)).unwrap();
        let second = changes.recv().await.unwrap();
        assert_eq!(second.previous, Some(Some(init.address())));
        assert_eq!(second.current, Some(sender.address()));
        assert!(second.checkpoint > first.checkpoint);

        let stats = handle.shutdown().await.unwrap();
        assert_eq!(stats.failures, 3);
        assert_eq!(stats.transient_failures, 3);
        assert_eq!(stats.updates, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_same_sender_twice_is_not_reported() {
        let ledger = Arc::new(SandboxLedger::new());
        let init = ledger.treasury("initWallet");
        let owner = ledger.treasury("ownerWallet");
        let sender = ledger.treasury("sender");
        let deploy = deploy_message(&init, &owner);
        let contract = deploy.destination;
        init.send(deploy).unwrap();

        let monitor = StateMonitor::new(
            MonitorConfig::for_testing(),
            Arc::clone(&ledger),
            LatestSenderProbe,
            contract,
        );
        let (handle, mut changes) = monitor.spawn();
        assert_eq!(changes.recv().await.unwrap().current, Some(init.address()));

        sender.send(increment(contract, 1)).unwrap();
        assert_eq!(changes.recv().await.unwrap().current, Some(sender.address()));

        // Counter changes, sender does not.
        sender.send(increment(contract, 1)).unwrap();
        let quiet = timeout(Duration::from_millis(500), changes.recv()).await;
        assert!(quiet.is_err(), "unexpected notification: {quiet:?}");

        let stats = handle.shutdown().await.unwrap();
        assert_eq!(stats.updates, 2);
        assert!(stats.unchanged >= 4);
    }

    #[tokio::test]
    async fn test_full_state_ticks_follow_ledger() {
        let ledger = Arc::new(SandboxLedger::new());
        let init = ledger.treasury("initWallet");
        let owner = ledger.treasury("ownerWallet");
        let sender = ledger.treasury("sender");
        let deploy = deploy_message(&init, &owner);
        let contract = deploy.destination;

        let mut monitor = StateMonitor::new(
            MonitorConfig::default(),
            Arc::clone(&ledger),
            FullStateProbe,
            contract,
        );

        match monitor.tick().await {
            TickOutcome::Failed(MonitorError::AccountInactive(status)) => {
                assert_eq!(status, AccountStatus::NonExistent)
            }
            other => panic!("expected inactive account, got {other:?}"),
        }

        init.send(deploy).unwrap();
        let TickOutcome::Updated(change) = monitor.tick().await else {
            panic!("expected first update");
        };
        assert_eq!(
            change.current,
            ContractState {
                counter: 0,
                recent_sender: init.address(),
                owner_address: owner.address(),
                balance: to_nano("0.05").unwrap(),
            }
        );

        assert!(monitor.tick().await.is_unchanged());

        sender.send(increment(contract, 7)).unwrap();
        let TickOutcome::Updated(change) = monitor.tick().await else {
            panic!("expected update after increment");
        };
        assert_eq!(change.current.counter, 7);
        assert_eq!(change.current.recent_sender, sender.address());
        assert_eq!(change.current.balance, to_nano("0.1").unwrap());
        assert_eq!(change.previous.map(|state| state.counter), Some(0));
    }

    #[tokio::test]
    async fn test_failed_withdraw_leaves_state_unchanged() {
        let ledger = Arc::new(SandboxLedger::new());
        let init = ledger.treasury("initWallet");
        let owner = ledger.treasury("ownerWallet");
        let sender = ledger.treasury("sender");
        let deploy = deploy_message(&init, &owner);
        let contract = deploy.destination;
        init.send(deploy).unwrap();

        let mut monitor = StateMonitor::new(
            MonitorConfig::default(),
            Arc::clone(&ledger),
            FullStateProbe,
            contract,
        );
        assert!(monitor.tick().await.is_updated());

        let withdraw = OutboundMessage::new(
            contract,
            to_nano("0.5").unwrap(),
            &Operation::Withdraw {
                amount: to_nano("1").unwrap(),
            },
        )
        .unwrap();
        let txs = sender.send(withdraw).unwrap();
        assert_eq!(txs[0].outcome.exit_code, 103);

        assert!(monitor.tick().await.is_unchanged());
        assert_eq!(monitor.stats().failures, 0);
    }
}
