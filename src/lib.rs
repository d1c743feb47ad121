pub mod accounts;
pub mod address;
pub mod client;
pub mod config;
pub mod error;
pub mod repl;
pub mod signer;
pub mod transaction;
pub mod wallet;

pub use accounts::{Account, AccountInfo, KeyStore, Keypair};
pub use address::{derive_address, Address};
pub use client::{HttpTransport, NodeInfo, Transport, TransportError, TransportResult};
pub use config::AppConfig;
pub use error::{WalletError, WalletResult};
pub use transaction::{build_unsigned, SignedTransaction, UnsignedTransaction};
pub use wallet::Wallet;
