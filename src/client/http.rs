use async_trait::async_trait;
use nodewallet_types::{
    AccountRef, AccountTxsRequest, AccountTxsResponse, AddressRequest, EmptyRequest,
    NodeStatusResponse, StartMiningRequest, StatsResponse, SubmitTransactionRequest,
    SubmitTransactionResponse, ValueResponse,
};
use reqwest::Client;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error};

use super::{Transport, TransportError, TransportResult};
use crate::address::Address;
use crate::config::NodeConfig;

/// JSON-over-HTTP client for the node API.
///
/// Every request is a `POST` with a JSON body, whatever its semantics.
pub struct HttpTransport {
    http: Client,
    base_url: String,
    log_io: bool,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .field("log_io", &self.log_io)
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    /// Create a new transport from config
    pub fn new(config: &NodeConfig) -> TransportResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url(),
            log_io: config.log_io,
        })
    }

    async fn post<B, R>(&self, api: &str, body: &B) -> TransportResult<R>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, api);
        if self.log_io {
            debug!(
                "request: {}, body: {}",
                url,
                serde_json::to_string(body).unwrap_or_default()
            );
        }

        let response = self.http.post(&url).json(body).send().await.map_err(|e| {
            error!("Request to {} failed: {}", url, e);
            TransportError::Http(e)
        })?;

        let status = response.status();
        let text = response.text().await?;
        if self.log_io {
            debug!("response body: {}", text);
        }

        if !status.is_success() {
            return Err(TransportError::Status {
                endpoint: api.to_string(),
                status: status.as_u16(),
            });
        }

        serde_json::from_str(&text).map_err(|source| TransportError::Decode {
            endpoint: api.to_string(),
            source,
        })
    }

    async fn value(&self, api: &str, address: &Address) -> TransportResult<String> {
        let request = AddressRequest {
            address: address.to_string(),
        };
        let response: ValueResponse = self.post(api, &request).await?;
        response.value.ok_or_else(|| TransportError::MissingField {
            endpoint: api.to_string(),
            field: "value".to_string(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn node_url(&self) -> &str {
        &self.base_url
    }

    async fn nonce(&self, address: &Address) -> TransportResult<String> {
        self.value("/nonce", address).await
    }

    async fn balance(&self, address: &Address) -> TransportResult<String> {
        self.value("/balance", address).await
    }

    async fn submit_transaction(&self, tx: &[u8]) -> TransportResult<String> {
        let request = SubmitTransactionRequest { tx: tx.to_vec() };
        let response: SubmitTransactionResponse =
            self.post("/submittransaction", &request).await?;
        response.id.ok_or_else(|| TransportError::MissingField {
            endpoint: "/submittransaction".to_string(),
            field: "id".to_string(),
        })
    }

    async fn node_status(&self) -> TransportResult<NodeStatusResponse> {
        self.post("/nodestatus", &EmptyRequest {}).await
    }

    async fn stats(&self) -> TransportResult<StatsResponse> {
        self.post("/stats", &EmptyRequest {}).await
    }

    async fn start_mining(&self, request: &StartMiningRequest) -> TransportResult<()> {
        let _: IgnoredAny = self.post("/startmining", request).await?;
        Ok(())
    }

    async fn account_txs(&self, address: &Address) -> TransportResult<Vec<String>> {
        let request = AccountTxsRequest {
            account: AccountRef {
                address: address.to_string(),
            },
        };
        let response: AccountTxsResponse = self.post("/accounttxs", &request).await?;
        Ok(response.txs)
    }

    async fn set_awards_address(&self, address: &Address) -> TransportResult<()> {
        let request = AddressRequest {
            address: address.to_string(),
        };
        let _: IgnoredAny = self.post("/setawardsaddr", &request).await?;
        Ok(())
    }

    async fn sanity(&self) -> TransportResult<()> {
        let _: IgnoredAny = self.post("/example/echo", &EmptyRequest {}).await?;
        Ok(())
    }
}
