//! Keystore-backed credentials
//!
//! The keystore is a Web3 Secret Storage file. Decryption runs scrypt, so it
//! is pushed onto tokio's blocking pool.

use crate::error::{DemoError, Result};
use alloy::signers::local::PrivateKeySigner;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Decrypt the keystore at `path` and return its signer
pub fn decrypt_keystore(path: &Path, password: &str) -> Result<PrivateKeySigner> {
    if !path.is_file() {
        return Err(DemoError::Keystore(format!(
            "Keystore file {} does not exist",
            path.display()
        )));
    }

    PrivateKeySigner::decrypt_keystore(path, password).map_err(|e| {
        DemoError::Keystore(format!("Failed to decrypt {}: {e}", path.display()))
    })
}

/// Load signing credentials without blocking the async runtime
#[instrument(skip(password), err)]
pub async fn load_credentials(path: &Path, password: &str) -> Result<PrivateKeySigner> {
    let keystore: PathBuf = path.to_path_buf();
    let password = password.to_string();

    debug!("Decrypting keystore {}", keystore.display());
    tokio::task::spawn_blocking(move || decrypt_keystore(&keystore, &password))
        .await
        .map_err(|e| DemoError::Keystore(format!("Keystore task failed: {e}")))?
}
