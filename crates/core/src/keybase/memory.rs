//! # メモリ内鍵ストア
//!
//! 鍵をプロセス内に保持する開発・テスト用の実装。
//! パスフレーズはSHA-256ハッシュのみ保持する。

use std::collections::BTreeMap;
use std::sync::RwLock;

use txsign_crypto::{ed25519_sign, generate_signing_key, sha256, Ed25519SigningKey};
use txsign_types::{KeyInfo, PubKey};

use super::{key_info, validate_key_name, Keybase, KeybaseError};

struct MemoryKey {
    passphrase_hash: [u8; 32],
    signing_key: Ed25519SigningKey,
}

/// メモリ内鍵ストア。
#[derive(Default)]
pub struct MemoryKeybase {
    keys: RwLock<BTreeMap<String, MemoryKey>>,
}

impl MemoryKeybase {
    pub fn new() -> Self {
        Self::default()
    }

    /// 新しい鍵を生成して登録する。
    pub fn create(&self, name: &str, passphrase: &str) -> Result<KeyInfo, KeybaseError> {
        self.insert(name, passphrase, generate_signing_key())
    }

    /// 既存の署名鍵を登録する。
    pub fn insert(
        &self,
        name: &str,
        passphrase: &str,
        signing_key: Ed25519SigningKey,
    ) -> Result<KeyInfo, KeybaseError> {
        validate_key_name(name)?;
        let mut keys = self
            .keys
            .write()
            .map_err(|_| KeybaseError::Unavailable("鍵ストアのロックが破損しています".into()))?;
        if keys.contains_key(name) {
            return Err(KeybaseError::AlreadyExists(name.to_string()));
        }
        let info = key_info(name, &signing_key.verifying_key());
        keys.insert(
            name.to_string(),
            MemoryKey {
                passphrase_hash: sha256(passphrase.as_bytes()),
                signing_key,
            },
        );
        Ok(info)
    }
}

impl Keybase for MemoryKeybase {
    fn sign(
        &self,
        name: &str,
        passphrase: &str,
        message: &[u8],
    ) -> Result<(Vec<u8>, PubKey), KeybaseError> {
        let keys = self
            .keys
            .read()
            .map_err(|_| KeybaseError::Unavailable("鍵ストアのロックが破損しています".into()))?;
        let key = keys
            .get(name)
            .ok_or_else(|| KeybaseError::KeyNotFound(name.to_string()))?;
        if key.passphrase_hash != sha256(passphrase.as_bytes()) {
            return Err(KeybaseError::WrongPassphrase(name.to_string()));
        }
        let signature = ed25519_sign(&key.signing_key, message);
        let pub_key = PubKey::ed25519(key.signing_key.verifying_key().to_bytes().to_vec());
        Ok((signature.to_bytes().to_vec(), pub_key))
    }

    fn list(&self) -> Result<Vec<KeyInfo>, KeybaseError> {
        let keys = self
            .keys
            .read()
            .map_err(|_| KeybaseError::Unavailable("鍵ストアのロックが破損しています".into()))?;
        Ok(keys
            .iter()
            .map(|(name, key)| key_info(name, &key.signing_key.verifying_key()))
            .collect())
    }
}
