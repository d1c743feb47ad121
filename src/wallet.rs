//! Wallet façade.
//!
//! Ties the key store, the current-account selection and transaction
//! building to a [`Transport`]. The current account is session state owned
//! here, never a side channel on the network client, which keeps signing
//! free of I/O.

use std::path::{Path, PathBuf};

use nodewallet_types::StartMiningRequest;
use tracing::{info, warn};

use crate::accounts::{Account, AccountInfo, KeyStore};
use crate::address::Address;
use crate::client::{NodeInfo, Transport, TransportError};
use crate::config::WalletConfig;
use crate::error::{WalletError, WalletResult};
use crate::signer;
use crate::transaction::{build_unsigned, SIGNATURE_LENGTH};

/// Bytes per GiB of post-commitment space.
const GIB: u64 = 1 << 30;

pub struct Wallet<T: Transport> {
    store: KeyStore,
    accounts_path: PathBuf,
    current: Option<Account>,
    transport: T,
    default_gas_price: u64,
    default_gas_limit: u64,
}

impl<T: Transport> std::fmt::Debug for Wallet<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("accounts_path", &self.accounts_path)
            .field("accounts", &self.store.len())
            .field("current", &self.current.as_ref().map(|a| a.alias.as_str()))
            .finish_non_exhaustive()
    }
}

impl<T: Transport> Wallet<T> {
    /// Open the wallet stored under `config.datadir`.
    ///
    /// A missing key file starts an empty wallet. A corrupt one is an error,
    /// so it is never overwritten by the next save.
    pub fn open(config: &WalletConfig, transport: T) -> WalletResult<Self> {
        config.ensure_datadir()?;
        let accounts_path = config.accounts_path();

        let store = match KeyStore::load(&accounts_path) {
            Ok(store) => {
                info!("Loaded {} account(s) from {}", store.len(), accounts_path.display());
                store
            }
            Err(WalletError::NotFound(_)) => {
                warn!(
                    "Key file {} does not exist, starting with no accounts",
                    accounts_path.display()
                );
                KeyStore::new()
            }
            Err(e) => return Err(e),
        };

        Ok(Self {
            store,
            accounts_path,
            current: None,
            transport,
            default_gas_price: config.default_gas_price,
            default_gas_limit: config.default_gas_limit,
        })
    }

    /// Wrap an existing store.
    pub fn with_store(store: KeyStore, accounts_path: PathBuf, transport: T) -> Self {
        let defaults = WalletConfig::default();
        Self {
            store,
            accounts_path,
            current: None,
            transport,
            default_gas_price: defaults.default_gas_price,
            default_gas_limit: defaults.default_gas_limit,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn node_url(&self) -> &str {
        self.transport.node_url()
    }

    pub fn store(&self) -> &KeyStore {
        &self.store
    }

    pub fn accounts_path(&self) -> &Path {
        &self.accounts_path
    }

    pub fn account_aliases(&self) -> Vec<String> {
        self.store.list()
    }

    pub fn default_gas_price(&self) -> u64 {
        self.default_gas_price
    }

    pub fn default_gas_limit(&self) -> u64 {
        self.default_gas_limit
    }

    /// Create an account, persist the store and make it current.
    ///
    /// If the store cannot be written the new account is dropped again.
    pub fn create_account(&mut self, alias: &str) -> WalletResult<Account> {
        let account = self.store.create(alias)?;
        if let Err(e) = self.store.save(&self.accounts_path) {
            self.store.remove(&account.alias);
            return Err(e);
        }

        info!("Created account `{}` ({})", account.alias, account.address());
        self.current = Some(account.clone());
        Ok(account)
    }

    /// Make an existing account current.
    pub fn select_account(&mut self, alias: &str) -> WalletResult<&Account> {
        let account = self.store.get(alias)?;
        Ok(&*self.current.insert(account))
    }

    pub fn current_account(&self) -> Option<&Account> {
        self.current.as_ref()
    }

    fn require_current(&self) -> WalletResult<&Account> {
        self.current.as_ref().ok_or(WalletError::NoCurrentAccount)
    }

    /// Nonce and balance of the current account.
    pub async fn account_info(&self) -> WalletResult<AccountInfo> {
        let account = self.require_current()?;
        Ok(self.transport.account_info(&account.address()).await?)
    }

    /// Build, sign and submit a transfer from the current account.
    ///
    /// Returns the transaction id assigned by the node.
    pub async fn transfer(
        &self,
        recipient: Address,
        nonce: u64,
        amount: u64,
        gas_price: u64,
        gas_limit: u64,
    ) -> WalletResult<String> {
        let account = self.require_current()?;
        let tx = build_unsigned(nonce, recipient, amount, gas_price, gas_limit);
        let signed = signer::sign_transaction(&account.keypair, tx);

        let id = self
            .transport
            .submit_transaction(&signed.encode())
            .await
            .map_err(WalletError::SubmitFailed)?;

        info!(
            "Submitted transfer of {} from {} to {} (nonce {}), id {}",
            amount,
            account.address(),
            recipient,
            nonce,
            id
        );
        Ok(id)
    }

    /// Transfer using the node's current nonce and the configured gas
    /// defaults.
    pub async fn transfer_with_defaults(&self, recipient: Address, amount: u64) -> WalletResult<String> {
        let account = self.require_current()?;
        let nonce = self.current_nonce(&account.address()).await?;
        self.transfer(
            recipient,
            nonce,
            amount,
            self.default_gas_price,
            self.default_gas_limit,
        )
        .await
    }

    /// The node's nonce for `address`, parsed.
    pub async fn current_nonce(&self, address: &Address) -> WalletResult<u64> {
        let nonce = self.transport.nonce(address).await?;
        nonce.trim().parse::<u64>().map_err(|_| {
            WalletError::Transport(TransportError::InvalidValue {
                endpoint: "/nonce".to_string(),
                field: "value".to_string(),
                value: nonce.clone(),
            })
        })
    }

    /// Sign arbitrary bytes with the current account.
    pub fn sign_message(&self, message: &[u8]) -> WalletResult<[u8; SIGNATURE_LENGTH]> {
        let account = self.require_current()?;
        Ok(signer::sign_with(&account.keypair, message))
    }

    /// Sign the UTF-8 bytes of `text` with the current account.
    pub fn sign_text(&self, text: &str) -> WalletResult<[u8; SIGNATURE_LENGTH]> {
        self.sign_message(text.as_bytes())
    }

    pub async fn node_info(&self) -> WalletResult<NodeInfo> {
        Ok(self.transport.node_info().await?)
    }

    /// Ask the node to start building a `space_gib` GiB commitment in
    /// `logical_drive`, rewarding the current account.
    pub async fn start_mining(&self, logical_drive: &str, space_gib: u64) -> WalletResult<()> {
        let account = self.require_current()?;
        let commitment_size = space_gib.checked_mul(GIB).ok_or_else(|| {
            WalletError::InvalidAmount(format!("{} GiB does not fit in 64 bits", space_gib))
        })?;

        let request = StartMiningRequest {
            logical_drive: logical_drive.to_string(),
            commitment_size,
            coinbase: account.address().to_string(),
        };
        self.transport.start_mining(&request).await?;
        info!("Started mining into {} ({} GiB)", logical_drive, space_gib);
        Ok(())
    }

    /// Transaction ids involving the current account.
    pub async fn list_txs(&self) -> WalletResult<Vec<String>> {
        let account = self.require_current()?;
        Ok(self.transport.account_txs(&account.address()).await?)
    }

    /// Direct the node's rewards to the current account.
    pub async fn set_coinbase(&self) -> WalletResult<()> {
        let account = self.require_current()?;
        self.transport.set_awards_address(&account.address()).await?;
        Ok(())
    }

    pub async fn sanity(&self) -> WalletResult<()> {
        Ok(self.transport.sanity().await?)
    }
}
