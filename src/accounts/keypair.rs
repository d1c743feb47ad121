use std::fmt;

use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;
use zeroize::Zeroizing;

use crate::address::Address;
use crate::error::{WalletError, WalletResult};

/// Public key width in bytes.
pub const PUBLIC_KEY_LENGTH: usize = ed25519_dalek::PUBLIC_KEY_LENGTH;

/// Private key width in bytes: the 32-byte seed followed by the public key.
pub const PRIVATE_KEY_LENGTH: usize = ed25519_dalek::KEYPAIR_LENGTH;

/// Ed25519 keypair.
///
/// The private half always encodes the public half; constructors reject
/// byte strings where the two disagree.
#[derive(Clone, PartialEq, Eq)]
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generate a fresh keypair from the OS random source.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Rebuild a keypair from its 64-byte private key.
    pub fn from_private_key(private_key: &[u8]) -> WalletResult<Self> {
        let bytes: &[u8; PRIVATE_KEY_LENGTH] = private_key.try_into().map_err(|_| {
            WalletError::InvalidKey(format!(
                "private key must be {} bytes, got {}",
                PRIVATE_KEY_LENGTH,
                private_key.len()
            ))
        })?;

        let signing_key = SigningKey::from_keypair_bytes(bytes)
            .map_err(|e| WalletError::InvalidKey(e.to_string()))?;
        Ok(Self { signing_key })
    }

    /// Rebuild a keypair from both halves, checking that they belong together.
    pub fn from_parts(public_key: &[u8], private_key: &[u8]) -> WalletResult<Self> {
        if public_key.len() != PUBLIC_KEY_LENGTH {
            return Err(WalletError::InvalidKey(format!(
                "public key must be {} bytes, got {}",
                PUBLIC_KEY_LENGTH,
                public_key.len()
            )));
        }

        let keypair = Self::from_private_key(private_key)?;
        if keypair.public_key().as_slice() != public_key {
            return Err(WalletError::InvalidKey(
                "public key does not match private key".to_string(),
            ));
        }
        Ok(keypair)
    }

    pub fn public_key(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// The 64-byte private key (seed || public key), wiped on drop.
    pub fn private_key(&self) -> Zeroizing<[u8; PRIVATE_KEY_LENGTH]> {
        Zeroizing::new(self.signing_key.to_keypair_bytes())
    }

    pub fn address(&self) -> Address {
        Address::from_public_key(&self.public_key())
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("public_key", &hex::encode(self.public_key()))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_keys_differ() {
        let a = Keypair::generate();
        let b = Keypair::generate();
        assert_ne!(a.public_key(), b.public_key());
        assert_ne!(a.address(), b.address());
    }

    #[test]
    fn private_key_embeds_public_key() {
        let keypair = Keypair::generate();
        let private_key = keypair.private_key();
        assert_eq!(&private_key[PUBLIC_KEY_LENGTH..], keypair.public_key().as_slice());
    }

    #[test]
    fn rebuild_from_private_key() {
        let keypair = Keypair::generate();
        let rebuilt = Keypair::from_private_key(keypair.private_key().as_slice()).unwrap();
        assert_eq!(rebuilt, keypair);
    }

    #[test]
    fn rejects_wrong_lengths() {
        assert!(matches!(
            Keypair::from_private_key(&[0u8; 32]),
            Err(WalletError::InvalidKey(_))
        ));

        let keypair = Keypair::generate();
        assert!(Keypair::from_parts(&[0u8; 31], keypair.private_key().as_slice()).is_err());
    }

    #[test]
    fn rejects_mismatched_halves() {
        let a = Keypair::generate();
        let b = Keypair::generate();
        assert!(Keypair::from_parts(&b.public_key(), a.private_key().as_slice()).is_err());

        // private key whose embedded public half was tampered with
        let mut tampered = *a.private_key();
        tampered[PRIVATE_KEY_LENGTH - 1] ^= 0x01;
        assert!(Keypair::from_private_key(&tampered).is_err());
    }

    #[test]
    fn debug_does_not_print_secret() {
        let keypair = Keypair::generate();
        let seed = hex::encode(&keypair.private_key()[..32]);
        assert!(!format!("{:?}", keypair).contains(&seed));
    }
}
