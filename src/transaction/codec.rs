//! Canonical fixed-width transaction encoding.
//!
//! Layout, all integers big-endian:
//!
//! | offset | width | field     |
//! |--------|-------|-----------|
//! | 0      | 8     | nonce     |
//! | 8      | 20    | recipient |
//! | 28     | 8     | gas limit |
//! | 36     | 8     | gas price |
//! | 44     | 8     | amount    |
//! | 52     | 64    | signature (submission encoding only) |
//!
//! The first 52 bytes are the signing payload. A relay reconstructs exactly
//! these bytes from a submission to verify the signature, so the layout must
//! not change.

use crate::address::{Address, ADDRESS_LENGTH};
use crate::error::{WalletError, WalletResult};

use super::{SignedTransaction, UnsignedTransaction};

pub const SIGNATURE_LENGTH: usize = ed25519_dalek::SIGNATURE_LENGTH;
pub const UNSIGNED_ENCODED_LENGTH: usize = 8 + ADDRESS_LENGTH + 8 + 8 + 8;
pub const SIGNED_ENCODED_LENGTH: usize = UNSIGNED_ENCODED_LENGTH + SIGNATURE_LENGTH;

struct Writer<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl Writer<'_> {
    fn put(&mut self, bytes: &[u8]) {
        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
    }

    fn put_u64(&mut self, value: u64) {
        self.put(&value.to_be_bytes());
    }
}

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl Reader<'_> {
    fn take<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(&self.buf[self.pos..self.pos + N]);
        self.pos += N;
        out
    }

    fn take_u64(&mut self) -> u64 {
        u64::from_be_bytes(self.take::<8>())
    }
}

fn write_unsigned(tx: &UnsignedTransaction, w: &mut Writer<'_>) {
    w.put_u64(tx.nonce);
    w.put(tx.recipient.as_bytes());
    w.put_u64(tx.gas_limit);
    w.put_u64(tx.gas_price);
    w.put_u64(tx.amount);
}

/// Encode the signing payload.
pub fn encode_unsigned(tx: &UnsignedTransaction) -> [u8; UNSIGNED_ENCODED_LENGTH] {
    let mut out = [0u8; UNSIGNED_ENCODED_LENGTH];
    write_unsigned(tx, &mut Writer { buf: &mut out, pos: 0 });
    out
}

/// Encode a signed transaction for submission.
pub fn encode_signed(tx: &SignedTransaction) -> [u8; SIGNED_ENCODED_LENGTH] {
    let mut out = [0u8; SIGNED_ENCODED_LENGTH];
    let mut w = Writer { buf: &mut out, pos: 0 };
    write_unsigned(tx.unsigned(), &mut w);
    w.put(tx.signature());
    out
}

/// Decode a submission back into its fields and signature.
///
/// The signature is not checked here; see [`SignedTransaction::verify`].
pub fn decode_signed(bytes: &[u8]) -> WalletResult<SignedTransaction> {
    if bytes.len() != SIGNED_ENCODED_LENGTH {
        return Err(WalletError::MalformedTransaction {
            expected: SIGNED_ENCODED_LENGTH,
            actual: bytes.len(),
        });
    }

    let mut r = Reader { buf: bytes, pos: 0 };
    let nonce = r.take_u64();
    let recipient = Address::new(r.take::<ADDRESS_LENGTH>());
    let gas_limit = r.take_u64();
    let gas_price = r.take_u64();
    let amount = r.take_u64();
    let signature = r.take::<SIGNATURE_LENGTH>();

    Ok(SignedTransaction::new(
        UnsignedTransaction {
            nonce,
            recipient,
            gas_limit,
            gas_price,
            amount,
        },
        signature,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::build_unsigned;
    use proptest::prelude::*;

    fn sample() -> UnsignedTransaction {
        UnsignedTransaction {
            nonce: 3,
            recipient: Address::new([0xBB; ADDRESS_LENGTH]),
            gas_limit: 100,
            gas_price: 1,
            amount: 50,
        }
    }

    #[test]
    fn lengths() {
        assert_eq!(UNSIGNED_ENCODED_LENGTH, 52);
        assert_eq!(SIGNED_ENCODED_LENGTH, 116);
    }

    #[test]
    fn known_layout() {
        let bytes = encode_unsigned(&sample());

        let mut expected = Vec::new();
        expected.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 3]);
        expected.extend_from_slice(&[0xBB; 20]);
        expected.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 100]);
        expected.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 1]);
        expected.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 50]);
        assert_eq!(bytes.as_slice(), expected.as_slice());
    }

    #[test]
    fn signature_is_appended_after_payload() {
        let signed = SignedTransaction::new(sample(), [0x5A; SIGNATURE_LENGTH]);
        let bytes = encode_signed(&signed);
        assert_eq!(&bytes[..UNSIGNED_ENCODED_LENGTH], encode_unsigned(&sample()).as_slice());
        assert_eq!(&bytes[UNSIGNED_ENCODED_LENGTH..], [0x5A; SIGNATURE_LENGTH].as_slice());
    }

    #[test]
    fn decode_restores_fields() {
        let signed = SignedTransaction::new(sample(), [7; SIGNATURE_LENGTH]);
        assert_eq!(decode_signed(&encode_signed(&signed)).unwrap(), signed);
    }

    #[test]
    fn decode_rejects_wrong_length() {
        let err = decode_signed(&[0u8; UNSIGNED_ENCODED_LENGTH]).unwrap_err();
        assert!(matches!(
            err,
            WalletError::MalformedTransaction { expected: 116, actual: 52 }
        ));
    }

    fn arb_tx() -> impl Strategy<Value = UnsignedTransaction> {
        (any::<u64>(), any::<[u8; ADDRESS_LENGTH]>(), any::<u64>(), any::<u64>(), any::<u64>())
            .prop_map(|(nonce, recipient, gas_limit, gas_price, amount)| UnsignedTransaction {
                nonce,
                recipient: Address::new(recipient),
                gas_limit,
                gas_price,
                amount,
            })
    }

    proptest! {
        #[test]
        fn encoding_is_deterministic(tx in arb_tx()) {
            prop_assert_eq!(encode_unsigned(&tx), encode_unsigned(&tx));
        }

        #[test]
        fn distinct_transactions_encode_differently(a in arb_tx(), b in arb_tx()) {
            prop_assume!(a != b);
            prop_assert_ne!(encode_unsigned(&a), encode_unsigned(&b));
        }

        #[test]
        fn changing_one_field_changes_encoding(tx in arb_tx(), field in 0usize..5, delta in 1u64..=u64::MAX) {
            let mut other = tx;
            match field {
                0 => other.nonce = tx.nonce.wrapping_add(delta),
                1 => {
                    let mut bytes = *tx.recipient.as_bytes();
                    bytes[(delta % ADDRESS_LENGTH as u64) as usize] ^= 0xFF;
                    other.recipient = Address::new(bytes);
                }
                2 => other.gas_limit = tx.gas_limit.wrapping_add(delta),
                3 => other.gas_price = tx.gas_price.wrapping_add(delta),
                _ => other.amount = tx.amount.wrapping_add(delta),
            }
            prop_assert_ne!(encode_unsigned(&tx), encode_unsigned(&other));
        }

        #[test]
        fn built_transactions_encode_every_field(
            nonce in any::<u64>(),
            recipient in any::<[u8; ADDRESS_LENGTH]>(),
            amount in any::<u64>(),
            gas_price in any::<u64>(),
            gas_limit in any::<u64>(),
            field in 0usize..5,
        ) {
            let recipient = Address::new(recipient);
            let tx = build_unsigned(nonce, recipient, amount, gas_price, gas_limit);
            let bytes = tx.encode();
            prop_assert_eq!(bytes, build_unsigned(nonce, recipient, amount, gas_price, gas_limit).encode());
            let nonce_bytes = nonce.to_be_bytes();
            let gas_limit_bytes = gas_limit.to_be_bytes();
            let gas_price_bytes = gas_price.to_be_bytes();
            let amount_bytes = amount.to_be_bytes();
            prop_assert_eq!(&bytes[..8], nonce_bytes.as_slice());
            prop_assert_eq!(&bytes[8..28], recipient.as_bytes().as_slice());
            prop_assert_eq!(&bytes[28..36], gas_limit_bytes.as_slice());
            prop_assert_eq!(&bytes[36..44], gas_price_bytes.as_slice());
            prop_assert_eq!(&bytes[44..], amount_bytes.as_slice());

            let mut flipped = *recipient.as_bytes();
            flipped[0] ^= 1;
            let other = match field {
                0 => build_unsigned(nonce ^ 1, recipient, amount, gas_price, gas_limit),
                1 => build_unsigned(nonce, Address::new(flipped), amount, gas_price, gas_limit),
                2 => build_unsigned(nonce, recipient, amount ^ 1, gas_price, gas_limit),
                3 => build_unsigned(nonce, recipient, amount, gas_price ^ 1, gas_limit),
                _ => build_unsigned(nonce, recipient, amount, gas_price, gas_limit ^ 1),
            };
            prop_assert_ne!(bytes, other.encode());
        }
    }
}
