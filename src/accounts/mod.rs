//! Locally held accounts.
//!
//! An account is a user-chosen alias bound to an Ed25519 keypair. The
//! [`KeyStore`] owns every account of a wallet and persists them to a flat
//! JSON key file.

pub mod keypair;
pub mod store;

pub use keypair::{Keypair, PRIVATE_KEY_LENGTH, PUBLIC_KEY_LENGTH};
pub use store::{AccountKeys, KeyStore};

use crate::address::Address;

/// A named keypair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub alias: String,
    pub keypair: Keypair,
}

impl Account {
    pub fn new(alias: impl Into<String>, keypair: Keypair) -> Self {
        Self {
            alias: alias.into(),
            keypair,
        }
    }

    pub fn address(&self) -> Address {
        self.keypair.address()
    }
}

/// Nonce and balance as reported by the node.
///
/// Both values are decimal strings straight from the node and are fetched
/// per query, never cached.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountInfo {
    pub nonce: String,
    pub balance: String,
}
