//! Transfer transactions.
//!
//! A transaction is built unsigned, signed over its canonical encoding (see
//! [`codec`]) and then submitted as the canonical encoding followed by the
//! signature.

pub mod codec;

pub use codec::{
    decode_signed, encode_signed, encode_unsigned, SIGNATURE_LENGTH, SIGNED_ENCODED_LENGTH,
    UNSIGNED_ENCODED_LENGTH,
};

use crate::accounts::PUBLIC_KEY_LENGTH;
use crate::address::Address;
use crate::error::{WalletError, WalletResult};
use crate::signer;

/// Transaction fields covered by the signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnsignedTransaction {
    pub nonce: u64,
    pub recipient: Address,
    pub gas_limit: u64,
    pub gas_price: u64,
    pub amount: u64,
}

impl UnsignedTransaction {
    /// Canonical signing payload.
    pub fn encode(&self) -> [u8; UNSIGNED_ENCODED_LENGTH] {
        encode_unsigned(self)
    }

    /// Upper bound on what the sender pays: amount plus the full gas budget.
    pub fn total_cost(&self) -> Option<u64> {
        self.gas_limit
            .checked_mul(self.gas_price)
            .and_then(|fee| fee.checked_add(self.amount))
    }
}

/// An unsigned transaction together with its signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SignedTransaction {
    tx: UnsignedTransaction,
    signature: [u8; SIGNATURE_LENGTH],
}

impl SignedTransaction {
    pub(crate) fn new(tx: UnsignedTransaction, signature: [u8; SIGNATURE_LENGTH]) -> Self {
        Self { tx, signature }
    }

    pub fn unsigned(&self) -> &UnsignedTransaction {
        &self.tx
    }

    pub fn signature(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.signature
    }

    /// Submission encoding: signing payload followed by the signature.
    pub fn encode(&self) -> [u8; SIGNED_ENCODED_LENGTH] {
        encode_signed(self)
    }

    /// Check the signature against `public_key` over the re-encoded payload.
    pub fn verify(&self, public_key: &[u8; PUBLIC_KEY_LENGTH]) -> bool {
        signer::verify(public_key, &self.tx.encode(), &self.signature)
    }
}

/// Assemble an unsigned transfer.
///
/// Every `u64` field value is accepted; range checks belong to whoever turns
/// user input into numbers (see [`parse_amount`]).
pub fn build_unsigned(
    nonce: u64,
    recipient: Address,
    amount: u64,
    gas_price: u64,
    gas_limit: u64,
) -> UnsignedTransaction {
    UnsignedTransaction {
        nonce,
        recipient,
        gas_limit,
        gas_price,
        amount,
    }
}

/// Parse a user-entered unsigned decimal amount.
pub fn parse_amount(text: &str) -> WalletResult<u64> {
    let text = text.trim();
    if text.starts_with('-') {
        return Err(WalletError::InvalidAmount(format!("`{}` is negative", text)));
    }
    text.parse::<u64>()
        .map_err(|e| WalletError::InvalidAmount(format!("`{}`: {}", text, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_keeps_fields() {
        let recipient = Address::new([9; 20]);
        let tx = build_unsigned(3, recipient, 50, 1, 100);
        assert_eq!(tx.nonce, 3);
        assert_eq!(tx.recipient, recipient);
        assert_eq!(tx.amount, 50);
        assert_eq!(tx.gas_price, 1);
        assert_eq!(tx.gas_limit, 100);
        assert_eq!(tx.total_cost(), Some(150));
    }

    #[test]
    fn build_accepts_any_field_values() {
        let tx = build_unsigned(0, Address::default(), 0, 1 << 32, 1 << 32);
        assert_eq!(tx.gas_price, 1 << 32);
        assert_eq!(tx.gas_limit, 1 << 32);
        assert_eq!(tx.total_cost(), None);

        let tx = build_unsigned(u64::MAX, Address::default(), u64::MAX, u64::MAX, u64::MAX);
        assert_eq!(tx.amount, u64::MAX);
        assert_eq!(tx.total_cost(), None);
    }

    #[test]
    fn parse_amount_accepts_unsigned_decimals() {
        assert_eq!(parse_amount("0").unwrap(), 0);
        assert_eq!(parse_amount(" 42 ").unwrap(), 42);
        assert_eq!(parse_amount("18446744073709551615").unwrap(), u64::MAX);
    }

    #[test]
    fn parse_amount_rejects_bad_input() {
        for input in ["-1", "18446744073709551616", "1.5", "abc", ""] {
            assert!(
                matches!(parse_amount(input), Err(WalletError::InvalidAmount(_))),
                "accepted {input:?}"
            );
        }
    }
}
