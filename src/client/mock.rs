//! In-memory [`Transport`] used by unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use nodewallet_types::{NodeStatusResponse, StartMiningRequest, StatsResponse};

use super::{Transport, TransportError, TransportResult};
use crate::address::Address;

#[derive(Default)]
struct State {
    nonce: String,
    balance: String,
    fail_status: Option<u16>,
    submitted: Vec<Vec<u8>>,
    queried: Vec<Address>,
    mining: Vec<StartMiningRequest>,
    coinbase: Option<Address>,
    txs: Vec<String>,
}

/// Records every call; clones share state.
#[derive(Clone)]
pub(crate) struct MockTransport {
    state: Arc<Mutex<State>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                nonce: "0".to_string(),
                balance: "0".to_string(),
                ..Default::default()
            })),
        }
    }

    pub fn with_nonce(self, nonce: &str) -> Self {
        self.state.lock().unwrap().nonce = nonce.to_string();
        self
    }

    pub fn with_balance(self, balance: &str) -> Self {
        self.state.lock().unwrap().balance = balance.to_string();
        self
    }

    pub fn with_txs(self, txs: &[&str]) -> Self {
        self.state.lock().unwrap().txs = txs.iter().map(|t| t.to_string()).collect();
        self
    }

    /// Make every later call fail with this HTTP status.
    pub fn fail_with_status(&self, status: u16) {
        self.state.lock().unwrap().fail_status = Some(status);
    }

    pub fn submitted(&self) -> Vec<Vec<u8>> {
        self.state.lock().unwrap().submitted.clone()
    }

    pub fn queried(&self) -> Vec<Address> {
        self.state.lock().unwrap().queried.clone()
    }

    pub fn mining_requests(&self) -> Vec<StartMiningRequest> {
        self.state.lock().unwrap().mining.clone()
    }

    pub fn coinbase(&self) -> Option<Address> {
        self.state.lock().unwrap().coinbase
    }

    fn check(&self, endpoint: &str) -> TransportResult<std::sync::MutexGuard<'_, State>> {
        let state = self.state.lock().unwrap();
        match state.fail_status {
            Some(status) => Err(TransportError::Status {
                endpoint: endpoint.to_string(),
                status,
            }),
            None => Ok(state),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn node_url(&self) -> &str {
        "http://mock.node/v1"
    }

    async fn nonce(&self, address: &Address) -> TransportResult<String> {
        let mut state = self.check("/nonce")?;
        state.queried.push(*address);
        Ok(state.nonce.clone())
    }

    async fn balance(&self, address: &Address) -> TransportResult<String> {
        let mut state = self.check("/balance")?;
        state.queried.push(*address);
        Ok(state.balance.clone())
    }

    async fn submit_transaction(&self, tx: &[u8]) -> TransportResult<String> {
        let mut state = self.check("/submittransaction")?;
        state.submitted.push(tx.to_vec());
        Ok(format!("tx-{}", state.submitted.len()))
    }

    async fn node_status(&self) -> TransportResult<NodeStatusResponse> {
        self.check("/nodestatus")?;
        Ok(NodeStatusResponse {
            synced: Some(true),
            peers: Some("8".to_string()),
            ..Default::default()
        })
    }

    async fn stats(&self) -> TransportResult<StatsResponse> {
        self.check("/stats")?;
        Ok(StatsResponse {
            status: Some(1),
            ..Default::default()
        })
    }

    async fn start_mining(&self, request: &StartMiningRequest) -> TransportResult<()> {
        self.check("/startmining")?.mining.push(request.clone());
        Ok(())
    }

    async fn account_txs(&self, address: &Address) -> TransportResult<Vec<String>> {
        let mut state = self.check("/accounttxs")?;
        state.queried.push(*address);
        Ok(state.txs.clone())
    }

    async fn set_awards_address(&self, address: &Address) -> TransportResult<()> {
        self.check("/setawardsaddr")?.coinbase = Some(*address);
        Ok(())
    }

    async fn sanity(&self) -> TransportResult<()> {
        self.check("/example/echo")?;
        Ok(())
    }
}
