//! Command-line arguments.

use clap::{Args, Parser, Subcommand, ValueEnum};
use tc_01_cell_codec::Address;
use tc_03_message_protocol::{to_nano, Operation};
use tc_04_state_monitor::config::DEFAULT_POLL_INTERVAL_MS;

/// tc-watch: counter contract operator tool
#[derive(Parser, Debug)]
#[command(name = "tc-watch", version)]
#[command(about = "Derive contract addresses, encode message bodies and watch contract state")]
pub struct Cli {
    /// Use the test network (endpoint, address flags, wallet host)
    #[arg(long, env = "TC_TESTNET", global = true)]
    pub testnet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Derive the address a contract will be deployed at
    Address(AddressArgs),
    /// Encode a message body and optionally a wallet deep link
    Body(BodyArgs),
    /// Poll a deployed contract and print every change until Ctrl-C
    Watch(WatchArgs),
}

/// `address` arguments.
#[derive(Args, Debug)]
pub struct AddressArgs {
    /// Compiled contract code as a hex bag of cells
    #[arg(long)]
    pub code: String,

    /// Initial counter value
    #[arg(long, default_value_t = 0)]
    pub number: u32,

    /// Initial recent-sender field
    #[arg(long)]
    pub sender: Address,

    /// Owner allowed to withdraw
    #[arg(long)]
    pub owner: Address,

    /// Workchain to deploy on
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    pub workchain: i8,
}

/// `body` arguments.
#[derive(Args, Debug)]
pub struct BodyArgs {
    /// Contract address; enables the deep link
    #[arg(long)]
    pub to: Option<Address>,

    /// Value attached to the message, in whole units
    #[arg(long, default_value = "0.05", value_parser = parse_amount)]
    pub value: u64,

    /// Comment shown by the wallet
    #[arg(long)]
    pub text: Option<String>,

    #[command(subcommand)]
    pub op: OperationArg,
}

/// Operation to encode.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum OperationArg {
    /// Add to the counter
    Increment {
        /// Amount added
        #[arg(default_value_t = 1)]
        amount: u32,
    },
    /// Deposit the attached value
    Deposit,
    /// Empty body (the contract bounces the value back)
    Noop,
    /// Withdraw funds to the owner
    Withdraw {
        /// Amount in whole units, e.g. 0.5
        #[arg(value_parser = parse_amount)]
        amount: u64,
    },
}

impl From<&OperationArg> for Operation {
    fn from(arg: &OperationArg) -> Self {
        match *arg {
            OperationArg::Increment { amount } => Operation::Increment { amount },
            OperationArg::Deposit => Operation::Deposit,
            OperationArg::Noop => Operation::NoOpDeposit,
            OperationArg::Withdraw { amount } => Operation::Withdraw { amount },
        }
    }
}

/// Value tracked by `watch`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeKind {
    /// Most recent sender
    Sender,
    /// Counter, recent sender and owner
    Storage,
    /// Contract balance
    Balance,
    /// Storage plus balance
    State,
}

/// `watch` arguments.
#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Contract address (raw or friendly)
    pub address: Address,

    /// What to track
    #[arg(long, value_enum, default_value_t = ProbeKind::Sender)]
    pub probe: ProbeKind,

    /// ton-api v4 endpoint; defaults to the public one for the network
    #[arg(long, env = "TC_LEDGER_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Poll interval in milliseconds
    #[arg(long, env = "TC_POLL_INTERVAL_MS", default_value_t = DEFAULT_POLL_INTERVAL_MS)]
    pub interval_ms: u64,

    /// Ignore unread getter stack entries
    #[arg(long)]
    pub lenient: bool,

    /// Poll even if the account is not active yet
    #[arg(long)]
    pub skip_account_check: bool,
}

fn parse_amount(text: &str) -> Result<u64, String> {
    to_nano(text).map_err(|e| e.to_string())
}
