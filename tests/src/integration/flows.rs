//! # Contract Flows
//!
//! Drives the counter contract through the sandbox the way a wallet would:
//! messages are built with tc-03, addressed with tc-02, and the resulting
//! state is read back through getters and decoded.
//!
//! ## Flows Tested:
//!
//! 1. **Deploy**: derived address matches the address the ledger creates
//! 2. **Increment**: counter and most recent sender change
//! 3. **Deposit / empty body**: value is kept or refunded
//! 4. **Withdraw**: owner succeeds, others get 103, overdraft gets 104

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tc_01_cell_codec::{Address, Builder, Cell, FriendlyFlags};
    use tc_02_address_deriver::{derive_address, StateInit};
    use tc_03_message_protocol::{
        decode_balance, decode_latest_sender, decode_storage_result, to_nano, ContractConfig,
        ContractStorage, ExitCondition, Operation, OutboundMessage, StackReader,
        TransferRequest, GETTER_BALANCE, GETTER_LATEST_SENDER, GETTER_STORAGE_DATA,
    };
    use tc_04_state_monitor::{AccountStatus, LedgerQuery, SubmissionChannel};

    use crate::sandbox::{SandboxLedger, SandboxWallet, EXIT_CELL_UNDERFLOW};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    struct Fixture {
        ledger: Arc<SandboxLedger>,
        init: SandboxWallet,
        owner: SandboxWallet,
        contract: Address,
    }

    fn code() -> Cell {
        let mut builder = Builder::new();
        builder.store_uint(0xdead_beef, 32).unwrap();
        builder.end_cell()
    }

    fn config(init: &SandboxWallet, owner: &SandboxWallet) -> ContractConfig {
        ContractConfig {
            number: 0,
            address: init.address(),
            owner_address: owner.address(),
        }
    }

    /// Deploy the contract from `initWallet` with 0.05 attached.
    fn deployed() -> Fixture {
        let ledger = Arc::new(SandboxLedger::new());
        let init = ledger.treasury("initWallet");
        let owner = ledger.treasury("ownerWallet");
        let deploy =
            OutboundMessage::deploy(&config(&init, &owner), code(), 0, to_nano("0.05").unwrap())
                .unwrap();
        let contract = deploy.destination;
        let txs = init.send(deploy).unwrap();
        assert!(txs[0].outcome.success);
        Fixture {
            ledger,
            init,
            owner,
            contract,
        }
    }

    async fn getter(fixture: &Fixture, method: &str) -> StackReader {
        let checkpoint = fixture.ledger.latest_checkpoint().await.unwrap();
        fixture
            .ledger
            .run_getter(checkpoint, &fixture.contract, method)
            .await
            .unwrap()
            .into_reader(method)
            .unwrap()
    }

    async fn storage(fixture: &Fixture) -> ContractStorage {
        decode_storage_result(&mut getter(fixture, GETTER_STORAGE_DATA).await).unwrap()
    }

    async fn balance(fixture: &Fixture) -> u64 {
        decode_balance(&mut getter(fixture, GETTER_BALANCE).await).unwrap()
    }

    fn message(fixture: &Fixture, value: &str, operation: Operation) -> OutboundMessage {
        OutboundMessage::new(fixture.contract, to_nano(value).unwrap(), &operation).unwrap()
    }

    // =============================================================================
    // DEPLOY
    // =============================================================================

    #[tokio::test]
    async fn test_deploy_lands_at_derived_address() {
        let ledger = Arc::new(SandboxLedger::new());
        let init = ledger.treasury("initWallet");
        let owner = ledger.treasury("ownerWallet");
        let config = config(&init, &owner);

        let data = config.to_data_cell().unwrap();
        let expected = derive_address(0, &code(), &data);
        let deploy = OutboundMessage::deploy(&config, code(), 0, 50_000_000).unwrap();
        assert_eq!(deploy.destination, expected);
        assert_eq!(deploy.state_init, Some(StateInit::new(code(), data)));

        let checkpoint = ledger.latest_checkpoint().await.unwrap();
        assert_eq!(
            ledger.account_status(checkpoint, &expected).await.unwrap(),
            AccountStatus::NonExistent
        );

        init.send(deploy).unwrap();
        let checkpoint = ledger.latest_checkpoint().await.unwrap();
        assert_eq!(
            ledger.account_status(checkpoint, &expected).await.unwrap(),
            AccountStatus::Active
        );
    }

    #[tokio::test]
    async fn test_initial_storage_matches_config() {
        let fixture = deployed();
        let storage = storage(&fixture).await;
        assert_eq!(storage.counter, 0);
        assert_eq!(storage.recent_sender, fixture.init.address());
        assert_eq!(storage.owner_address, fixture.owner.address());
    }

    #[test]
    fn test_deploy_code_survives_hex_boc() {
        let hex = code().to_boc_hex();
        let parsed = Cell::from_boc_hex(&hex).unwrap();
        let ledger = Arc::new(SandboxLedger::new());
        let init = ledger.treasury("initWallet");
        let owner = ledger.treasury("ownerWallet");
        let config = config(&init, &owner);
        assert_eq!(
            config.deploy(parsed, 0).unwrap().0,
            config.deploy(code(), 0).unwrap().0
        );
    }

    // =============================================================================
    // INCREMENT
    // =============================================================================

    #[tokio::test]
    async fn test_increment_updates_most_recent_sender() {
        let fixture = deployed();
        let sender = fixture.ledger.treasury("sender");

        let txs = sender
            .send(message(&fixture, "0.05", Operation::Increment { amount: 5 }))
            .unwrap();
        assert_eq!(txs[0].from, sender.address());
        assert_eq!(txs[0].to, fixture.contract);
        assert!(txs[0].outcome.success);
        assert_eq!(txs[0].operation, Some(Operation::Increment { amount: 5 }));

        let storage = storage(&fixture).await;
        assert_eq!(storage.recent_sender, sender.address());
        assert_eq!(storage.counter, 5);

        let latest = decode_latest_sender(&mut getter(&fixture, GETTER_LATEST_SENDER).await);
        assert_eq!(latest.unwrap(), Some(sender.address()));
    }

    #[tokio::test]
    async fn test_increments_accumulate() {
        let fixture = deployed();
        let sender = fixture.ledger.treasury("sender");
        for amount in [1, 2, 3] {
            sender
                .send(message(&fixture, "0.05", Operation::Increment { amount }))
                .unwrap();
        }
        assert_eq!(storage(&fixture).await.counter, 6);
    }

    #[tokio::test]
    async fn test_truncated_increment_fails_with_underflow() {
        let fixture = deployed();
        let sender = fixture.ledger.treasury("sender");
        let mut body = Builder::new();
        body.store_uint(1, 32).unwrap();
        body.store_uint(5, 16).unwrap();
        let raw = Operation::RawTransfer {
            body: body.end_cell(),
        };

        let txs = sender.send(message(&fixture, "0.05", raw)).unwrap();
        assert_eq!(txs[0].outcome.exit_code, EXIT_CELL_UNDERFLOW);
        assert_eq!(
            txs[0].outcome.condition(),
            ExitCondition::LedgerRejected(EXIT_CELL_UNDERFLOW)
        );
        assert_eq!(storage(&fixture).await.counter, 0);
    }

    // =============================================================================
    // DEPOSIT
    // =============================================================================

    #[tokio::test]
    async fn test_deposit_is_credited() {
        let fixture = deployed();
        let sender = fixture.ledger.treasury("sender");

        let txs = sender
            .send(message(&fixture, "5", Operation::Deposit))
            .unwrap();
        assert!(txs[0].outcome.success);
        assert!(balance(&fixture).await > to_nano("4.99").unwrap());
    }

    #[tokio::test]
    async fn test_empty_body_is_refunded() {
        let fixture = deployed();
        let sender = fixture.ledger.treasury("sender");
        let before = balance(&fixture).await;

        let txs = sender
            .send(message(&fixture, "5", Operation::NoOpDeposit))
            .unwrap();
        assert_eq!(txs.len(), 2);
        assert_eq!(txs[1].from, fixture.contract);
        assert_eq!(txs[1].to, sender.address());
        assert_eq!(txs[1].value, to_nano("5").unwrap());
        assert!(txs[1].outcome.success);
        assert_eq!(balance(&fixture).await, before);
    }

    #[tokio::test]
    async fn test_submission_channel_receipt() {
        let fixture = deployed();
        let sender = fixture.ledger.treasury("sender");
        let message = message(&fixture, "1", Operation::Deposit);
        let body_hash = message.body.hash();

        let receipt = sender.submit(message).await.unwrap();
        assert_eq!(receipt.destination, fixture.contract);
        assert_eq!(receipt.value, to_nano("1").unwrap());
        assert_eq!(receipt.body_hash, body_hash);
    }

    // =============================================================================
    // WITHDRAW
    // =============================================================================

    #[tokio::test]
    async fn test_owner_withdraws() {
        let fixture = deployed();
        let sender = fixture.ledger.treasury("sender");
        sender
            .send(message(&fixture, "5", Operation::Deposit))
            .unwrap();

        let txs = fixture
            .owner
            .send(message(
                &fixture,
                "0.05",
                Operation::Withdraw {
                    amount: to_nano("1").unwrap(),
                },
            ))
            .unwrap();

        assert!(txs[0].outcome.success);
        let payout = &txs[1];
        assert_eq!(payout.from, fixture.contract);
        assert_eq!(payout.to, fixture.owner.address());
        assert_eq!(payout.value, to_nano("1").unwrap());
        assert!(payout.outcome.success);
    }

    #[tokio::test]
    async fn test_non_owner_withdraw_is_unauthorized() {
        let fixture = deployed();
        let sender = fixture.ledger.treasury("sender");
        sender
            .send(message(&fixture, "5", Operation::Deposit))
            .unwrap();
        let before = balance(&fixture).await;

        let txs = sender
            .send(message(
                &fixture,
                "0.5",
                Operation::Withdraw {
                    amount: to_nano("1").unwrap(),
                },
            ))
            .unwrap();

        assert!(!txs[0].outcome.success);
        assert_eq!(txs[0].outcome.exit_code, 103);
        assert_eq!(txs[0].outcome.condition(), ExitCondition::Unauthorized);
        assert_eq!(balance(&fixture).await, before);
    }

    #[tokio::test]
    async fn test_withdraw_without_balance_is_rejected() {
        let fixture = deployed();

        let txs = fixture
            .owner
            .send(message(
                &fixture,
                "0.5",
                Operation::Withdraw {
                    amount: to_nano("1").unwrap(),
                },
            ))
            .unwrap();

        assert!(!txs[0].outcome.success);
        assert_eq!(txs[0].outcome.exit_code, 104);
        assert_eq!(
            txs[0].outcome.condition(),
            ExitCondition::InsufficientBalance
        );
        // The attached value bounces back to the owner.
        assert_eq!(txs[1].to, fixture.owner.address());
        assert_eq!(txs[1].value, to_nano("0.5").unwrap());
    }

    // =============================================================================
    // DEEP LINK
    // =============================================================================

    #[test]
    fn test_deep_link_targets_test_only_address() {
        let fixture = deployed();
        let message = message(&fixture, "0.05", Operation::Increment { amount: 1 });
        let link = TransferRequest::from_message(&message, Some("hi".to_string()), true)
            .to_deep_link()
            .unwrap();

        let friendly = fixture.contract.to_friendly(FriendlyFlags::testnet());
        assert_eq!(link.host_str(), Some("test.tonhub.com"));
        assert_eq!(link.path(), format!("/transfer/{friendly}"));

        let parsed = Address::parse_friendly(&friendly).unwrap();
        assert!(parsed.test_only);
        assert_eq!(parsed.address, fixture.contract);

        let bin = link
            .query_pairs()
            .find(|(key, _)| key == "bin")
            .map(|(_, value)| value.into_owned())
            .unwrap();
        let body = Cell::from_boc_base64(&bin).unwrap();
        assert_eq!(
            Operation::decode(&body).unwrap(),
            Operation::Increment { amount: 1 }
        );
    }
}
