use std::path::PathBuf;

use thiserror::Error;

use crate::client::TransportError;

/// Wallet-wide error types
#[derive(Error, Debug)]
pub enum WalletError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Account alias `{0}` already exists")]
    AliasConflict(String),

    #[error("Invalid account alias: {0}")]
    InvalidAlias(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Corrupt key store {path}: {reason}")]
    CorruptStore { path: PathBuf, reason: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Malformed transaction: expected {expected} bytes, got {actual}")]
    MalformedTransaction { expected: usize, actual: usize },

    #[error("No current account selected")]
    NoCurrentAccount,

    #[error("Transaction submission failed: {0}")]
    SubmitFailed(#[source] TransportError),

    #[error("Node request failed: {0}")]
    Transport(#[from] TransportError),
}

impl WalletError {
    pub fn not_found<S: Into<String>>(what: S) -> Self {
        Self::NotFound(what.into())
    }

    pub fn corrupt<P: Into<PathBuf>, S: Into<String>>(path: P, reason: S) -> Self {
        Self::CorruptStore {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn io<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias using WalletError
pub type WalletResult<T> = Result<T, WalletError>;
