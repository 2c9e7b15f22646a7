//! # HTTP Ledger Client
//!
//! [`LedgerQuery`] over the ton-api v4 HTTP protocol.
//!
//! | Query | Request | Used fields |
//! |-------|---------|-------------|
//! | Latest checkpoint | `GET /block/latest` | `last.seqno` |
//! | Run getter | `GET /block/{seqno}/{address}/run/{method}` | `exitCode`, `result[]` |
//! | Account status | `GET /block/{seqno}/{address}` | `account.state.type` |

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tc_01_cell_codec::{Address, Cell};
use tc_03_message_protocol::StackEntry;
use tracing::{debug, error};

use crate::config::HttpLedgerConfig;
use crate::domain::{AccountStatus, CheckpointId, GetterResult, MonitorError};
use crate::ports::LedgerQuery;

/// ton-api v4 client.
pub struct HttpLedgerClient {
    client: Client,
    endpoint: String,
}

impl HttpLedgerClient {
    /// Create a client for `config.endpoint`.
    pub fn new(config: &HttpLedgerConfig) -> Result<Self, MonitorError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .build()
            .map_err(|e| MonitorError::TransportFailure(format!("HTTP client init: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, MonitorError> {
        let url = format!("{}{}", self.endpoint, path);
        debug!("[tc-04] GET {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_connect() {
                MonitorError::TransportFailure(format!("cannot connect to {}", self.endpoint))
            } else if e.is_timeout() {
                MonitorError::TransportFailure(format!("request to {url} timed out"))
            } else {
                MonitorError::TransportFailure(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            error!("[tc-04] {} answered {}", url, status);
            return Err(MonitorError::TransportFailure(format!(
                "{url} answered HTTP {status}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| MonitorError::InvalidResponse(format!("{url}: {e}")))
    }
}

#[async_trait]
impl LedgerQuery for HttpLedgerClient {
    async fn latest_checkpoint(&self) -> Result<CheckpointId, MonitorError> {
        let latest: LatestBlock = self.get("/block/latest").await?;
        Ok(CheckpointId(latest.last.seqno))
    }

    async fn run_getter(
        &self,
        checkpoint: CheckpointId,
        address: &Address,
        method: &str,
    ) -> Result<GetterResult, MonitorError> {
        let path = format!("/block/{}/{}/run/{}", checkpoint.0, address, method);
        let reply: RunMethodReply = self.get(&path).await?;
        reply.into_getter_result()
    }

    async fn account_status(
        &self,
        checkpoint: CheckpointId,
        address: &Address,
    ) -> Result<AccountStatus, MonitorError> {
        let path = format!("/block/{}/{}", checkpoint.0, address);
        let reply: AccountReply = self.get(&path).await?;
        reply.account.state.status()
    }

    fn endpoint_id(&self) -> &str {
        &self.endpoint
    }
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Deserialize)]
struct LatestBlock {
    last: BlockRef,
}

#[derive(Debug, Deserialize)]
struct BlockRef {
    seqno: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RunMethodReply {
    exit_code: i32,
    #[serde(default)]
    result: Vec<WireStackEntry>,
}

impl RunMethodReply {
    fn into_getter_result(self) -> Result<GetterResult, MonitorError> {
        let stack = self
            .result
            .into_iter()
            .map(WireStackEntry::into_entry)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(GetterResult {
            exit_code: self.exit_code,
            stack,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum WireStackEntry {
    Null,
    Int { value: String },
    Nan,
    Cell { cell: String },
    Slice { cell: String },
    Builder { cell: String },
    Tuple { items: Vec<WireStackEntry> },
}

impl WireStackEntry {
    fn into_entry(self) -> Result<StackEntry, MonitorError> {
        Ok(match self {
            Self::Null => StackEntry::Null,
            Self::Nan => StackEntry::Nan,
            Self::Int { value } => StackEntry::Int(value.parse().map_err(|_| {
                MonitorError::InvalidResponse(format!("integer {value} does not fit i128"))
            })?),
            Self::Cell { cell } => StackEntry::Cell(parse_cell(&cell)?),
            Self::Slice { cell } => StackEntry::Slice(parse_cell(&cell)?),
            Self::Builder { cell } => StackEntry::Builder(parse_cell(&cell)?),
            Self::Tuple { items } => StackEntry::Tuple(
                items
                    .into_iter()
                    .map(Self::into_entry)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
        })
    }
}

fn parse_cell(boc: &str) -> Result<Cell, MonitorError> {
    Cell::from_boc_base64(boc).map_err(|e| MonitorError::InvalidResponse(format!("stack cell: {e}")))
}

#[derive(Debug, Deserialize)]
struct AccountReply {
    account: AccountInfo,
}

#[derive(Debug, Deserialize)]
struct AccountInfo {
    state: AccountState,
}

#[derive(Debug, Deserialize)]
struct AccountState {
    #[serde(rename = "type")]
    kind: String,
}

impl AccountState {
    fn status(&self) -> Result<AccountStatus, MonitorError> {
        match self.kind.as_str() {
            "active" => Ok(AccountStatus::Active),
            "uninit" => Ok(AccountStatus::Uninit),
            "frozen" => Ok(AccountStatus::Frozen),
            other => Err(MonitorError::InvalidResponse(format!(
                "unknown account state {other:?}"
            ))),
        }
    }
}
