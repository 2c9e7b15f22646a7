//! # Sandbox Ledger
//!
//! In-process ledger that executes the counter contract, so flows can be
//! exercised end to end without a network.
//!
//! Every executed message advances the checkpoint by one. Getters always
//! read the latest state.
//!
//! ## Contract Rules
//!
//! | Body | Effect | Exit code |
//! |------|--------|-----------|
//! | empty | value refunded to the sender | 0 |
//! | `increment(n)` | counter += n, recent sender = caller | 0 |
//! | `deposit` | value credited | 0 |
//! | `withdraw(a)`, caller is not the owner | value bounced | 103 |
//! | `withdraw(a)`, balance < a | value bounced | 104 |
//! | `withdraw(a)` | `a` sent to the owner | 0 |
//! | unknown op code | value bounced | 65535 |
//! | truncated body | value bounced | 9 |

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use tc_01_cell_codec::{Address, Builder, Cell};
use tc_02_address_deriver::state_init_hash;
use tc_03_message_protocol::{
    decode_storage_cell, ContractStorage, DecodeMode, ExecutionOutcome, Operation,
    OutboundMessage, ProtocolError, StackEntry, EXIT_INSUFFICIENT_BALANCE, EXIT_UNAUTHORIZED,
    GETTER_BALANCE, GETTER_LATEST_SENDER, GETTER_STORAGE_DATA, NANO_PER_UNIT,
};
use tc_04_state_monitor::{
    AccountStatus, CheckpointId, GetterResult, LedgerQuery, MonitorError, SubmissionChannel,
    SubmissionReceipt,
};
use tracing::debug;

/// TVM cell underflow.
pub const EXIT_CELL_UNDERFLOW: i32 = 9;
/// Getter not defined by the contract.
pub const EXIT_METHOD_NOT_FOUND: i32 = 11;
/// Getter run against an account without code.
pub const EXIT_NO_CODE: i32 = -13;
/// Op code not handled by the contract.
pub const EXIT_UNKNOWN_OP: i32 = 0xffff;

/// Starting balance of every treasury wallet.
pub const TREASURY_BALANCE: u64 = 1_000_000 * NANO_PER_UNIT;

/// One executed message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    /// Checkpoint the message executed at.
    pub checkpoint: CheckpointId,
    /// Sender.
    pub from: Address,
    /// Recipient.
    pub to: Address,
    /// Value carried.
    pub value: u64,
    /// Decoded body, when the recipient is the contract and the body parses.
    pub operation: Option<Operation>,
    /// Compute-phase result.
    pub outcome: ExecutionOutcome,
}

#[derive(Clone, Debug)]
struct Account {
    code: Option<Cell>,
    storage: Option<ContractStorage>,
    balance: u64,
}

impl Account {
    fn status(&self) -> AccountStatus {
        if self.code.is_some() {
            AccountStatus::Active
        } else {
            AccountStatus::Uninit
        }
    }
}

#[derive(Default)]
struct SandboxState {
    seqno: u64,
    contracts: HashMap<Address, Account>,
    wallets: HashMap<Address, u64>,
    transactions: Vec<Transaction>,
}

/// Ledger that runs the counter contract in memory.
pub struct SandboxLedger {
    state: Mutex<SandboxState>,
}

impl Default for SandboxLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl SandboxLedger {
    /// Empty ledger at checkpoint 0.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SandboxState::default()),
        }
    }

    /// Funded wallet whose address is derived from `name`.
    pub fn treasury(self: &Arc<Self>, name: &str) -> SandboxWallet {
        let hash: [u8; 32] = Sha256::digest(format!("treasury:{name}").as_bytes()).into();
        let address = Address::new(Address::BASECHAIN, hash);
        self.state
            .lock()
            .wallets
            .entry(address)
            .or_insert(TREASURY_BALANCE);
        SandboxWallet {
            ledger: Arc::clone(self),
            address,
        }
    }

    /// Balance of a contract or wallet, in nanounits.
    pub fn balance_of(&self, address: &Address) -> u64 {
        let state = self.state.lock();
        state
            .contracts
            .get(address)
            .map(|account| account.balance)
            .or_else(|| state.wallets.get(address).copied())
            .unwrap_or(0)
    }

    /// Current contract storage, if deployed.
    pub fn storage_of(&self, address: &Address) -> Option<ContractStorage> {
        self.state
            .lock()
            .contracts
            .get(address)
            .and_then(|account| account.storage)
    }

    /// Every transaction so far, oldest first.
    pub fn transactions(&self) -> Vec<Transaction> {
        self.state.lock().transactions.clone()
    }

    /// Transactions executed after `checkpoint`.
    pub fn transactions_since(&self, checkpoint: CheckpointId) -> Vec<Transaction> {
        self.state
            .lock()
            .transactions
            .iter()
            .filter(|tx| tx.checkpoint > checkpoint)
            .cloned()
            .collect()
    }

    /// Execute `message` sent by `from` and return the resulting transactions.
    pub fn send(
        &self,
        from: Address,
        message: OutboundMessage,
    ) -> Result<Vec<Transaction>, MonitorError> {
        let mut state = self.state.lock();

        let funds = state.wallets.get(&from).copied().unwrap_or(0);
        if funds < message.value {
            return Err(MonitorError::SubmissionRejected(format!(
                "wallet {from} holds {funds}, cannot send {}",
                message.value
            )));
        }

        if let Some(init) = &message.state_init {
            if state_init_hash(init) != message.destination.hash {
                return Err(MonitorError::SubmissionRejected(
                    "state init does not hash to the destination".to_string(),
                ));
            }
        }

        if let Some(wallet) = state.wallets.get_mut(&from) {
            *wallet -= message.value;
        }
        state.seqno += 1;
        let checkpoint = CheckpointId(state.seqno);
        let first = state.transactions.len();

        deploy_if_needed(&mut state, &message);
        execute(&mut state, checkpoint, from, &message);

        Ok(state.transactions[first..].to_vec())
    }
}

fn deploy_if_needed(state: &mut SandboxState, message: &OutboundMessage) {
    let Some(init) = &message.state_init else {
        return;
    };
    let account = state
        .contracts
        .entry(message.destination)
        .or_insert(Account {
            code: None,
            storage: None,
            balance: 0,
        });
    if account.code.is_some() {
        return;
    }
    let storage = init
        .data
        .as_ref()
        .and_then(|data| decode_storage_cell(data, DecodeMode::Strict).ok());
    account.code = init.code.clone();
    account.storage = storage;
    debug!("[sandbox] Deployed {}", message.destination);
}

fn execute(
    state: &mut SandboxState,
    checkpoint: CheckpointId,
    from: Address,
    message: &OutboundMessage,
) {
    let to = message.destination;
    let value = message.value;
    let operation = Operation::decode(&message.body);

    let Some(account) = state.contracts.get_mut(&to) else {
        // Plain transfer to a wallet (or to an address nobody deployed yet).
        *state.wallets.entry(to).or_insert(0) += value;
        state.transactions.push(Transaction {
            checkpoint,
            from,
            to,
            value,
            operation: operation.ok(),
            outcome: ExecutionOutcome::ok(),
        });
        return;
    };

    if account.code.is_none() {
        account.balance += value;
        state.transactions.push(Transaction {
            checkpoint,
            from,
            to,
            value,
            operation: operation.ok(),
            outcome: ExecutionOutcome::ok(),
        });
        return;
    }

    let mut outbound = Vec::new();
    let outcome = match (&operation, account.storage.as_mut()) {
        (Err(ProtocolError::UnknownOpCode(_)), _) => ExecutionOutcome::failed(EXIT_UNKNOWN_OP),
        (Err(_), _) | (Ok(_), None) => ExecutionOutcome::failed(EXIT_CELL_UNDERFLOW),
        (Ok(Operation::NoOpDeposit), Some(_)) => {
            outbound.push((from, value));
            ExecutionOutcome::ok()
        }
        (Ok(Operation::Increment { amount }), Some(storage)) => {
            // Adds the requested amount. Contract builds that bump by one
            // regardless of the amount are not modelled here.
            storage.counter = storage.counter.wrapping_add(*amount);
            storage.recent_sender = from;
            account.balance += value;
            ExecutionOutcome::ok()
        }
        (Ok(Operation::Withdraw { amount }), Some(storage)) => {
            if from != storage.owner_address {
                ExecutionOutcome::failed(EXIT_UNAUTHORIZED)
            } else if account.balance < *amount {
                ExecutionOutcome::failed(EXIT_INSUFFICIENT_BALANCE)
            } else {
                account.balance = account.balance - amount + value;
                outbound.push((storage.owner_address, *amount));
                ExecutionOutcome::ok()
            }
        }
        (Ok(_), Some(_)) => {
            account.balance += value;
            ExecutionOutcome::ok()
        }
    };

    if !outcome.success {
        outbound.push((from, value));
    }
    debug!("[sandbox] {} -> {}: exit code {}", from, to, outcome.exit_code);

    state.transactions.push(Transaction {
        checkpoint,
        from,
        to,
        value,
        operation: operation.ok(),
        outcome,
    });
    for (recipient, amount) in outbound {
        *state.wallets.entry(recipient).or_insert(0) += amount;
        state.transactions.push(Transaction {
            checkpoint,
            from: to,
            to: recipient,
            value: amount,
            operation: None,
            outcome: ExecutionOutcome::ok(),
        });
    }
}

fn address_entry(address: &Address) -> StackEntry {
    let mut builder = Builder::new();
    match builder.store_address(Some(address)) {
        Ok(_) => StackEntry::Slice(builder.end_cell()),
        Err(_) => StackEntry::Null,
    }
}

#[async_trait]
impl LedgerQuery for SandboxLedger {
    async fn latest_checkpoint(&self) -> Result<CheckpointId, MonitorError> {
        Ok(CheckpointId(self.state.lock().seqno))
    }

    async fn run_getter(
        &self,
        checkpoint: CheckpointId,
        address: &Address,
        method: &str,
    ) -> Result<GetterResult, MonitorError> {
        let state = self.state.lock();
        if checkpoint.0 > state.seqno {
            return Err(MonitorError::InvalidResponse(format!(
                "checkpoint {checkpoint} is ahead of the ledger"
            )));
        }
        let Some(account) = state.contracts.get(address) else {
            return Ok(GetterResult::failed(EXIT_NO_CODE));
        };
        let Some(storage) = account.storage.filter(|_| account.code.is_some()) else {
            return Ok(GetterResult::failed(EXIT_NO_CODE));
        };

        let stack = match method {
            GETTER_STORAGE_DATA => vec![
                StackEntry::Int(i128::from(storage.counter)),
                address_entry(&storage.recent_sender),
                address_entry(&storage.owner_address),
            ],
            GETTER_BALANCE => vec![StackEntry::Int(i128::from(account.balance))],
            GETTER_LATEST_SENDER => vec![address_entry(&storage.recent_sender)],
            _ => return Ok(GetterResult::failed(EXIT_METHOD_NOT_FOUND)),
        };
        Ok(GetterResult::ok(stack))
    }

    async fn account_status(
        &self,
        _checkpoint: CheckpointId,
        address: &Address,
    ) -> Result<AccountStatus, MonitorError> {
        Ok(self
            .state
            .lock()
            .contracts
            .get(address)
            .map(Account::status)
            .unwrap_or(AccountStatus::NonExistent))
    }

    fn endpoint_id(&self) -> &str {
        "sandbox"
    }
}

/// Wallet bound to a sandbox ledger; submitting executes the message at once.
#[derive(Clone)]
pub struct SandboxWallet {
    ledger: Arc<SandboxLedger>,
    address: Address,
}

impl SandboxWallet {
    /// Wallet address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Send and return the executed transactions.
    pub fn send(&self, message: OutboundMessage) -> Result<Vec<Transaction>, MonitorError> {
        self.ledger.send(self.address, message)
    }
}

#[async_trait]
impl SubmissionChannel for SandboxWallet {
    async fn submit(&self, message: OutboundMessage) -> Result<SubmissionReceipt, MonitorError> {
        let receipt = SubmissionReceipt {
            destination: message.destination,
            value: message.value,
            body_hash: message.body.hash(),
        };
        self.send(message)?;
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tc_03_message_protocol::{to_nano, ContractConfig};

    fn code() -> Cell {
        let mut builder = Builder::new();
        builder.store_uint(0xdead_beef, 32).unwrap();
        builder.end_cell()
    }

    fn deployed() -> (Arc<SandboxLedger>, SandboxWallet, SandboxWallet, Address) {
        let ledger = Arc::new(SandboxLedger::new());
        let init = ledger.treasury("initWallet");
        let owner = ledger.treasury("ownerWallet");
        let config = ContractConfig {
            number: 0,
            address: init.address(),
            owner_address: owner.address(),
        };
        let deploy = OutboundMessage::deploy(&config, code(), 0, to_nano("0.05").unwrap()).unwrap();
        let contract = deploy.destination;
        init.send(deploy).unwrap();
        (ledger, init, owner, contract)
    }

    #[test]
    fn test_treasury_is_deterministic() {
        let ledger = Arc::new(SandboxLedger::new());
        assert_eq!(ledger.treasury("a").address(), ledger.treasury("a").address());
        assert_ne!(ledger.treasury("a").address(), ledger.treasury("b").address());
        assert_eq!(ledger.balance_of(&ledger.treasury("a").address()), TREASURY_BALANCE);
    }

    #[test]
    fn test_deploy_creates_active_account() {
        let (ledger, init, owner, contract) = deployed();
        let storage = ledger.storage_of(&contract).unwrap();
        assert_eq!(storage.counter, 0);
        assert_eq!(storage.recent_sender, init.address());
        assert_eq!(storage.owner_address, owner.address());
        assert_eq!(ledger.balance_of(&contract), 50_000_000);
    }

    #[test]
    fn test_mismatched_state_init_rejected() {
        let ledger = Arc::new(SandboxLedger::new());
        let wallet = ledger.treasury("w");
        let config = ContractConfig {
            number: 0,
            address: wallet.address(),
            owner_address: wallet.address(),
        };
        let mut deploy = OutboundMessage::deploy(&config, code(), 0, 1).unwrap();
        deploy.destination = Address::new(0, [0x42; 32]);
        assert!(matches!(
            wallet.send(deploy),
            Err(MonitorError::SubmissionRejected(_))
        ));
        assert_eq!(ledger.balance_of(&wallet.address()), TREASURY_BALANCE);
    }

    #[test]
    fn test_unknown_op_bounces() {
        let (ledger, _init, _owner, contract) = deployed();
        let sender = ledger.treasury("sender");
        let mut body = Builder::new();
        body.store_uint(77, 32).unwrap();
        let message = OutboundMessage::new(
            contract,
            10,
            &Operation::RawTransfer {
                body: body.end_cell(),
            },
        )
        .unwrap();

        let txs = sender.send(message).unwrap();
        assert_eq!(txs[0].outcome.exit_code, EXIT_UNKNOWN_OP);
        assert_eq!(txs[1].to, sender.address());
        assert_eq!(ledger.balance_of(&sender.address()), TREASURY_BALANCE);
    }

    #[test]
    fn test_overdrawn_wallet_rejected() {
        let (ledger, _init, _owner, contract) = deployed();
        let sender = ledger.treasury("sender");
        let message =
            OutboundMessage::new(contract, TREASURY_BALANCE + 1, &Operation::Deposit).unwrap();
        assert!(sender.send(message).is_err());
    }

    #[tokio::test]
    async fn test_getters_on_missing_contract() {
        let ledger = SandboxLedger::new();
        let result = ledger
            .run_getter(CheckpointId(0), &Address::new(0, [1; 32]), GETTER_BALANCE)
            .await
            .unwrap();
        assert_eq!(result.exit_code, EXIT_NO_CODE);
        assert_eq!(
            ledger
                .account_status(CheckpointId(0), &Address::new(0, [1; 32]))
                .await
                .unwrap(),
            AccountStatus::NonExistent
        );
    }

    #[tokio::test]
    async fn test_unknown_getter() {
        let (ledger, _init, _owner, contract) = deployed();
        let checkpoint = ledger.latest_checkpoint().await.unwrap();
        let result = ledger.run_getter(checkpoint, &contract, "seqno").await.unwrap();
        assert_eq!(result.exit_code, EXIT_METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_future_checkpoint_rejected() {
        let (ledger, _init, _owner, contract) = deployed();
        let result = ledger
            .run_getter(CheckpointId(99), &contract, GETTER_BALANCE)
            .await;
        assert!(matches!(result, Err(MonitorError::InvalidResponse(_))));
    }
}
