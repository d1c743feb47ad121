//! Node communication.
//!
//! The wallet talks to a node through the [`Transport`] capability. The
//! production implementation is [`HttpTransport`]; tests inject their own.

pub mod http;
#[cfg(test)]
pub(crate) mod mock;

pub use http::HttpTransport;

use async_trait::async_trait;
use nodewallet_types::{NodeStatusResponse, StartMiningRequest, StatsResponse};
use thiserror::Error;

use crate::accounts::AccountInfo;
use crate::address::Address;

/// Transport errors
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("`{endpoint}` response status code: {status}")]
    Status { endpoint: String, status: u16 },

    #[error("`{endpoint}` returned malformed JSON: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("`{endpoint}` response is missing `{field}`")]
    MissingField { endpoint: String, field: String },

    #[error("`{endpoint}` returned invalid `{field}`: {value}")]
    InvalidValue {
        endpoint: String,
        field: String,
        value: String,
    },
}

/// Result type for transport operations
pub type TransportResult<T> = Result<T, TransportError>;

/// Node API as seen by the wallet.
///
/// Every call is a single request; nothing is retried.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Base URL of the node, for display.
    fn node_url(&self) -> &str;

    async fn nonce(&self, address: &Address) -> TransportResult<String>;

    async fn balance(&self, address: &Address) -> TransportResult<String>;

    /// Submit an encoded signed transaction, returning its id.
    async fn submit_transaction(&self, tx: &[u8]) -> TransportResult<String>;

    async fn node_status(&self) -> TransportResult<NodeStatusResponse>;

    async fn stats(&self) -> TransportResult<StatsResponse>;

    async fn start_mining(&self, request: &StartMiningRequest) -> TransportResult<()>;

    async fn account_txs(&self, address: &Address) -> TransportResult<Vec<String>>;

    async fn set_awards_address(&self, address: &Address) -> TransportResult<()>;

    /// Connectivity check.
    async fn sanity(&self) -> TransportResult<()>;

    /// Nonce and balance, in that order; both must succeed.
    async fn account_info(&self, address: &Address) -> TransportResult<AccountInfo> {
        let nonce = self.nonce(address).await?;
        let balance = self.balance(address).await?;
        Ok(AccountInfo { nonce, balance })
    }

    /// Node status and mining stats combined.
    async fn node_info(&self) -> TransportResult<NodeInfo> {
        let status = self.node_status().await?;
        let stats = self.stats().await?;
        Ok(NodeInfo::from_parts(status, stats))
    }
}

/// Post-commitment (mining) state reported by `/stats`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MiningStatus {
    Idle,
    InProgress,
    Done,
}

impl MiningStatus {
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            1 => Some(Self::Idle),
            2 => Some(Self::InProgress),
            3 => Some(Self::Done),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::InProgress => "in-progress",
            Self::Done => "done",
        }
    }
}

/// Node telemetry shown by the `status` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeInfo {
    pub synced: bool,
    pub synced_layer: String,
    pub current_layer: String,
    pub verified_layer: String,
    pub peers: String,
    pub min_peers: String,
    pub max_peers: String,
    pub datadir: String,
    pub status: Option<MiningStatus>,
    pub coinbase: String,
    pub remaining_bytes: String,
}

impl NodeInfo {
    /// Merge the two telemetry replies; absent counters read as `"0"`.
    pub fn from_parts(status: NodeStatusResponse, stats: StatsResponse) -> Self {
        let zero = || "0".to_string();
        Self {
            synced: status.synced.unwrap_or(false),
            synced_layer: status.synced_layer.unwrap_or_else(zero),
            current_layer: status.current_layer.unwrap_or_else(zero),
            verified_layer: status.verified_layer.unwrap_or_else(zero),
            peers: status.peers.unwrap_or_else(zero),
            min_peers: status.min_peers.unwrap_or_else(zero),
            max_peers: status.max_peers.unwrap_or_else(zero),
            datadir: stats.data_dir.unwrap_or_default(),
            status: stats.status.and_then(MiningStatus::from_code),
            coinbase: stats.coinbase.unwrap_or_default(),
            remaining_bytes: stats.remaining_bytes.unwrap_or_else(zero),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_info_defaults_missing_counters_to_zero() {
        let info = NodeInfo::from_parts(NodeStatusResponse::default(), StatsResponse::default());
        assert!(!info.synced);
        assert_eq!(info.peers, "0");
        assert_eq!(info.remaining_bytes, "0");
        assert_eq!(info.datadir, "");
        assert_eq!(info.status, None);
    }

    #[test]
    fn node_info_maps_mining_status() {
        let stats = StatsResponse {
            status: Some(2),
            ..Default::default()
        };
        let info = NodeInfo::from_parts(NodeStatusResponse::default(), stats);
        assert_eq!(info.status, Some(MiningStatus::InProgress));
        assert_eq!(MiningStatus::from_code(7), None);
        assert_eq!(MiningStatus::Done.as_str(), "done");
    }
}
