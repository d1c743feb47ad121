//! Ed25519 signing and verification.
//!
//! Signatures are deterministic: the same key and message always produce the
//! same 64 bytes.

use ed25519_dalek::{Signature, Signer, Verifier, VerifyingKey};

use crate::accounts::{Keypair, PUBLIC_KEY_LENGTH};
use crate::error::WalletResult;
use crate::transaction::{SignedTransaction, UnsignedTransaction, SIGNATURE_LENGTH};

/// Sign `message` with a raw 64-byte private key.
///
/// Fails with `InvalidKey` when the key has the wrong length or its public
/// half does not match its seed.
pub fn sign(private_key: &[u8], message: &[u8]) -> WalletResult<[u8; SIGNATURE_LENGTH]> {
    let keypair = Keypair::from_private_key(private_key)?;
    Ok(sign_with(&keypair, message))
}

/// Sign `message` with an already validated keypair.
pub fn sign_with(keypair: &Keypair, message: &[u8]) -> [u8; SIGNATURE_LENGTH] {
    keypair.signing_key().sign(message).to_bytes()
}

/// Verify an Ed25519 signature.
///
/// Returns false for malformed public keys or signatures rather than an
/// error; a signature that cannot be parsed is simply not valid.
pub fn verify(public_key: &[u8; PUBLIC_KEY_LENGTH], message: &[u8], signature: &[u8]) -> bool {
    let Ok(verifying_key) = VerifyingKey::from_bytes(public_key) else {
        return false;
    };
    let Ok(signature) = Signature::from_slice(signature) else {
        return false;
    };
    verifying_key.verify(message, &signature).is_ok()
}

/// Sign the canonical encoding of `tx`.
pub fn sign_transaction(keypair: &Keypair, tx: UnsignedTransaction) -> SignedTransaction {
    let signature = sign_with(keypair, &tx.encode());
    SignedTransaction::new(tx, signature)
}

/// Sign the canonical encoding of `tx` with a raw 64-byte private key.
pub fn sign_transaction_with_key(
    private_key: &[u8],
    tx: UnsignedTransaction,
) -> WalletResult<SignedTransaction> {
    let keypair = Keypair::from_private_key(private_key)?;
    Ok(sign_transaction(&keypair, tx))
}
