//! Request and response bodies for the node's HTTP/JSON API.
//!
//! Every endpoint is a `POST` with a JSON body. Numeric node values are
//! carried as decimal strings; the wallet never does arithmetic on them.
//! Response fields are optional because the node omits fields it has no
//! value for; callers decide which absences are errors.

use serde::{Deserialize, Serialize};

/// Body for endpoints that take no parameters (`/nodestatus`, `/stats`,
/// `/example/echo`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmptyRequest {}

/// Body for `/nonce`, `/balance` and `/setawardsaddr`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddressRequest {
    /// `0x`-prefixed lowercase hex address
    pub address: String,
}

/// Single-value reply from `/nonce` and `/balance`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValueResponse {
    #[serde(default)]
    pub value: Option<String>,
}

/// Body for `/submittransaction`. The encoded transaction travels as a JSON
/// array of byte values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmitTransactionRequest {
    pub tx: Vec<u8>,
}

/// Reply from `/submittransaction`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmitTransactionResponse {
    #[serde(default)]
    pub id: Option<String>,
}

/// Reply from `/nodestatus`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NodeStatusResponse {
    #[serde(default)]
    pub synced: Option<bool>,
    #[serde(default)]
    pub synced_layer: Option<String>,
    #[serde(default)]
    pub current_layer: Option<String>,
    #[serde(default)]
    pub verified_layer: Option<String>,
    #[serde(default)]
    pub peers: Option<String>,
    #[serde(default)]
    pub min_peers: Option<String>,
    #[serde(default)]
    pub max_peers: Option<String>,
}

/// Reply from `/stats`: the node's post-commitment (mining) telemetry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    #[serde(default)]
    pub data_dir: Option<String>,
    /// 1 = idle, 2 = in progress, 3 = done
    #[serde(default)]
    pub status: Option<u32>,
    #[serde(default)]
    pub coinbase: Option<String>,
    #[serde(default)]
    pub remaining_bytes: Option<String>,
}

/// Body for `/startmining`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StartMiningRequest {
    pub logical_drive: String,
    /// Commitment size in bytes
    pub commitment_size: u64,
    pub coinbase: String,
}

/// Account reference nested inside `/accounttxs` requests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountRef {
    pub address: String,
}

/// Body for `/accounttxs`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountTxsRequest {
    pub account: AccountRef,
}

/// Reply from `/accounttxs`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountTxsResponse {
    #[serde(default)]
    pub txs: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_request_serializes_bytes_as_numbers() {
        let req = SubmitTransactionRequest { tx: vec![0, 7, 255] };
        assert_eq!(serde_json::to_string(&req).unwrap(), r#"{"tx":[0,7,255]}"#);
    }

    #[test]
    fn start_mining_uses_camel_case() {
        let req = StartMiningRequest {
            logical_drive: "/data".to_string(),
            commitment_size: 1 << 30,
            coinbase: "0xab".to_string(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["logicalDrive"], "/data");
        assert_eq!(json["commitmentSize"], 1u64 << 30);
        assert_eq!(json["coinbase"], "0xab");
    }

    #[test]
    fn missing_fields_deserialize_to_none() {
        let status: NodeStatusResponse = serde_json::from_str(r#"{"synced":true}"#).unwrap();
        assert_eq!(status.synced, Some(true));
        assert!(status.peers.is_none());

        let value: ValueResponse = serde_json::from_str("{}").unwrap();
        assert!(value.value.is_none());

        let txs: AccountTxsResponse = serde_json::from_str("{}").unwrap();
        assert!(txs.txs.is_empty());
    }

    #[test]
    fn account_txs_request_nests_address() {
        let req = AccountTxsRequest {
            account: AccountRef { address: "0x01".to_string() },
        };
        assert_eq!(
            serde_json::to_string(&req).unwrap(),
            r#"{"account":{"address":"0x01"}}"#
        );
    }
}
