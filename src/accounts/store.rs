//! Alias → keypair store backed by a JSON key file.
//!
//! On disk the store is a JSON object mapping each alias to its hex-encoded
//! keys. Keys are decoded and validated once at load time, so every entry in
//! memory is a usable keypair.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use zeroize::Zeroize;

use super::{Account, Keypair};
use crate::error::{WalletError, WalletResult};

/// Key file record for one alias.
#[derive(Clone, Serialize, Deserialize)]
pub struct AccountKeys {
    /// Hex-encoded 32-byte public key
    pub pubkey: String,
    /// Hex-encoded 64-byte private key
    pub privkey: String,
}

impl std::fmt::Debug for AccountKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountKeys")
            .field("pubkey", &self.pubkey)
            .finish_non_exhaustive()
    }
}

impl Drop for AccountKeys {
    fn drop(&mut self) {
        self.privkey.zeroize();
    }
}

impl From<&Keypair> for AccountKeys {
    fn from(keypair: &Keypair) -> Self {
        Self {
            pubkey: hex::encode(keypair.public_key()),
            privkey: hex::encode(keypair.private_key().as_slice()),
        }
    }
}

impl AccountKeys {
    fn decode(&self) -> Result<Keypair, String> {
        let public_key = hex::decode(&self.pubkey).map_err(|e| format!("pubkey: {}", e))?;
        let mut private_key =
            hex::decode(&self.privkey).map_err(|e| format!("privkey: {}", e))?;
        let keypair = Keypair::from_parts(&public_key, &private_key).map_err(|e| e.to_string());
        private_key.zeroize();
        keypair
    }
}

/// In-memory account store.
#[derive(Debug, Default, Clone)]
pub struct KeyStore {
    accounts: HashMap<String, Keypair>,
}

impl KeyStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a new keypair under `alias`.
    ///
    /// Existing aliases are never overwritten. The store is not persisted;
    /// call [`KeyStore::save`] afterwards.
    pub fn create(&mut self, alias: &str) -> WalletResult<Account> {
        let alias = validate_alias(alias)?;
        if self.accounts.contains_key(alias) {
            return Err(WalletError::AliasConflict(alias.to_string()));
        }

        let keypair = Keypair::generate();
        self.accounts.insert(alias.to_string(), keypair.clone());
        debug!("Created account `{}` ({})", alias, keypair.address());
        Ok(Account::new(alias, keypair))
    }

    /// Look up an account by alias.
    pub fn get(&self, alias: &str) -> WalletResult<Account> {
        self.accounts
            .get(alias)
            .map(|keypair| Account::new(alias, keypair.clone()))
            .ok_or_else(|| WalletError::not_found(format!("account `{}`", alias)))
    }

    /// Remove an account, returning it if it was present.
    pub fn remove(&mut self, alias: &str) -> Option<Account> {
        self.accounts
            .remove(alias)
            .map(|keypair| Account::new(alias, keypair))
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.accounts.contains_key(alias)
    }

    /// All aliases, sorted for stable display.
    pub fn list(&self) -> Vec<String> {
        let mut aliases: Vec<String> = self.accounts.keys().cloned().collect();
        aliases.sort();
        aliases
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Write the whole store to `path`, replacing any previous contents.
    ///
    /// The file is written next to its destination and renamed into place,
    /// so a failed save leaves the old file intact.
    pub fn save(&self, path: &Path) -> WalletResult<()> {
        let records: BTreeMap<&str, AccountKeys> = self
            .accounts
            .iter()
            .map(|(alias, keypair)| (alias.as_str(), AccountKeys::from(keypair)))
            .collect();

        let mut data = serde_json::to_vec_pretty(&records)
            .map_err(|e| WalletError::io(path, std::io::Error::other(e)))?;
        drop(records);

        let tmp_path = temp_path(path);
        let written = write_private(&tmp_path, &data);
        data.zeroize();
        written.map_err(|e| WalletError::io(&tmp_path, e))?;

        fs::rename(&tmp_path, path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            WalletError::io(path, e)
        })?;

        info!("Saved {} account(s) to {}", self.accounts.len(), path.display());
        Ok(())
    }

    /// Read a store from `path`.
    ///
    /// Fails with `NotFound` when the file does not exist and with
    /// `CorruptStore` when any record is malformed. Nothing is returned
    /// unless every record decodes.
    pub fn load(path: &Path) -> WalletResult<Self> {
        if !path.exists() {
            return Err(WalletError::not_found(format!("key file {}", path.display())));
        }

        let mut data = fs::read_to_string(path).map_err(|e| WalletError::io(path, e))?;
        let parsed: Result<BTreeMap<String, AccountKeys>, _> = serde_json::from_str(&data);
        data.zeroize();
        let records = parsed.map_err(|e| WalletError::corrupt(path, e.to_string()))?;

        let mut accounts = HashMap::with_capacity(records.len());
        for (alias, keys) in &records {
            if alias.trim().is_empty() {
                return Err(WalletError::corrupt(path, "empty alias"));
            }
            let keypair = keys
                .decode()
                .map_err(|reason| WalletError::corrupt(path, format!("`{}`: {}", alias, reason)))?;
            accounts.insert(alias.clone(), keypair);
        }

        debug!("Loaded {} account(s) from {}", accounts.len(), path.display());
        Ok(Self { accounts })
    }
}

fn validate_alias(alias: &str) -> WalletResult<&str> {
    let alias = alias.trim();
    if alias.is_empty() {
        return Err(WalletError::InvalidAlias("alias must not be blank".to_string()));
    }
    Ok(alias)
}

/// Write `data` to a fresh file readable by the owner only.
fn write_private(path: &Path, data: &[u8]) -> std::io::Result<()> {
    // A leftover file would keep its old permissions
    match fs::remove_file(path) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => return Err(e),
        _ => {}
    }

    #[cfg(unix)]
    {
        use std::io::Write;
        use std::os::unix::fs::OpenOptionsExt;
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .mode(0o600)
            .open(path)?;
        file.write_all(data)?;
        file.sync_all()
    }

    #[cfg(not(unix))]
    {
        fs::write(path, data)
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
