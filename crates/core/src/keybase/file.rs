//! # ファイルシステム鍵ストア
//!
//! 鍵ごとに `{dir}/{name}.json` を作成し、Ed25519のシードを
//! Argon2idで導出した鍵によるAES-256-GCMで暗号化して保存する。

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use txsign_crypto::{
    aes_gcm_decrypt, aes_gcm_encrypt, derive_key_from_passphrase, ed25519_sign,
    generate_signing_key, random_bytes, CryptoError, Ed25519SigningKey, KdfParams,
};
use txsign_types::{base64_bytes, KeyInfo, PubKey};

use super::{key_info, validate_key_name, Keybase, KeybaseError};

/// 鍵ファイルの形式バージョン
const KEY_FILE_VERSION: u8 = 1;

/// 鍵ファイルの内容。
#[derive(Debug, Serialize, Deserialize)]
struct KeyFile {
    version: u8,
    name: String,
    pub_key: PubKey,
    address: String,
    kdf_params: KdfParams,
    #[serde(with = "base64_bytes")]
    salt: Vec<u8>,
    #[serde(with = "base64_bytes")]
    nonce: Vec<u8>,
    #[serde(with = "base64_bytes")]
    ciphertext: Vec<u8>,
}

impl KeyFile {
    fn info(&self) -> KeyInfo {
        KeyInfo {
            name: self.name.clone(),
            pub_key: self.pub_key.clone(),
            address: self.address.clone(),
        }
    }
}

/// ディレクトリに鍵を保存する鍵ストア。
pub struct FileKeybase {
    dir: PathBuf,
    kdf_params: KdfParams,
}

impl FileKeybase {
    /// 新しいFileKeybaseを作成する。ディレクトリは最初の鍵作成時に作られる。
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            kdf_params: KdfParams::default(),
        }
    }

    /// 新規作成する鍵に使うArgon2idパラメータを指定する。
    pub fn with_kdf_params(mut self, kdf_params: KdfParams) -> Self {
        self.kdf_params = kdf_params;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }

    /// 新しい鍵を生成し、パスフレーズで暗号化して保存する。
    /// 同名の鍵が存在する場合は上書きせずにエラーを返す。
    pub fn create(&self, name: &str, passphrase: &str) -> Result<KeyInfo, KeybaseError> {
        validate_key_name(name)?;
        fs::create_dir_all(&self.dir).map_err(|e| {
            KeybaseError::Unavailable(format!("鍵ディレクトリの作成に失敗 ({}): {e}", self.dir.display()))
        })?;

        let signing_key = generate_signing_key();
        let info = key_info(name, &signing_key.verifying_key());

        let salt = random_bytes::<32>();
        let nonce = random_bytes::<12>();
        let key = derive_key_from_passphrase(passphrase, &salt, &self.kdf_params)
            .map_err(|e| KeybaseError::Unavailable(e.to_string()))?;
        let ciphertext = aes_gcm_encrypt(&key, &nonce, &signing_key.to_bytes())
            .map_err(|e| KeybaseError::Unavailable(e.to_string()))?;

        let key_file = KeyFile {
            version: KEY_FILE_VERSION,
            name: name.to_string(),
            pub_key: info.pub_key.clone(),
            address: info.address.clone(),
            kdf_params: self.kdf_params,
            salt: salt.to_vec(),
            nonce: nonce.to_vec(),
            ciphertext,
        };
        let json = serde_json::to_vec_pretty(&key_file)
            .map_err(|e| KeybaseError::Unavailable(format!("鍵ファイルのシリアライズに失敗: {e}")))?;

        let path = self.key_path(name);
        let mut file = open_new(&path).map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => KeybaseError::AlreadyExists(name.to_string()),
            _ => KeybaseError::Unavailable(format!("鍵ファイルの作成に失敗 ({}): {e}", path.display())),
        })?;
        file.write_all(&json)
            .and_then(|_| file.sync_all())
            .map_err(|e| {
                KeybaseError::Unavailable(format!("鍵ファイルの書き込みに失敗 ({}): {e}", path.display()))
            })?;

        Ok(info)
    }

    fn load(&self, name: &str) -> Result<KeyFile, KeybaseError> {
        validate_key_name(name)?;
        let path = self.key_path(name);
        let bytes = fs::read(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => KeybaseError::KeyNotFound(name.to_string()),
            _ => KeybaseError::Unavailable(format!("鍵ファイルの読み込みに失敗 ({}): {e}", path.display())),
        })?;
        parse_key_file(name, &bytes)
    }

    fn unlock(&self, key_file: &KeyFile, passphrase: &str) -> Result<Ed25519SigningKey, KeybaseError> {
        let corrupted = |reason: String| KeybaseError::Corrupted {
            name: key_file.name.clone(),
            reason,
        };

        let nonce: [u8; 12] = key_file
            .nonce
            .as_slice()
            .try_into()
            .map_err(|_| corrupted("nonceは12バイトである必要があります".into()))?;
        let key = derive_key_from_passphrase(passphrase, &key_file.salt, &key_file.kdf_params)
            .map_err(|e| corrupted(e.to_string()))?;
        let seed = aes_gcm_decrypt(&key, &nonce, &key_file.ciphertext).map_err(|e| match e {
            CryptoError::DecryptError => KeybaseError::WrongPassphrase(key_file.name.clone()),
            other => corrupted(other.to_string()),
        })?;
        let seed: [u8; 32] = seed
            .as_slice()
            .try_into()
            .map_err(|_| corrupted("秘密鍵は32バイトである必要があります".into()))?;

        let signing_key = Ed25519SigningKey::from_bytes(&seed);
        if signing_key.verifying_key().to_bytes().as_slice() != key_file.pub_key.value.as_slice() {
            return Err(corrupted("公開鍵と秘密鍵が一致しません".into()));
        }
        Ok(signing_key)
    }
}

impl Keybase for FileKeybase {
    fn sign(
        &self,
        name: &str,
        passphrase: &str,
        message: &[u8],
    ) -> Result<(Vec<u8>, PubKey), KeybaseError> {
        let key_file = self.load(name)?;
        let signing_key = self.unlock(&key_file, passphrase)?;
        let signature = ed25519_sign(&signing_key, message);
        Ok((signature.to_bytes().to_vec(), key_file.pub_key))
    }

    fn list(&self) -> Result<Vec<KeyInfo>, KeybaseError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(KeybaseError::Unavailable(format!(
                    "鍵ディレクトリの読み込みに失敗 ({}): {e}",
                    self.dir.display()
                )))
            }
        };

        let mut infos = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| KeybaseError::Unavailable(e.to_string()))?
                .path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            if validate_key_name(name).is_err() {
                continue;
            }
            infos.push(self.load(name)?.info());
        }
        infos.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(infos)
    }
}

fn parse_key_file(name: &str, bytes: &[u8]) -> Result<KeyFile, KeybaseError> {
    let key_file: KeyFile = serde_json::from_slice(bytes).map_err(|e| KeybaseError::Corrupted {
        name: name.to_string(),
        reason: e.to_string(),
    })?;
    if key_file.version != KEY_FILE_VERSION {
        return Err(KeybaseError::Corrupted {
            name: name.to_string(),
            reason: format!("未対応のバージョンです: {}", key_file.version),
        });
    }
    if key_file.name != name {
        return Err(KeybaseError::Corrupted {
            name: name.to_string(),
            reason: format!("ファイル名と鍵の名前が一致しません: {}", key_file.name),
        });
    }
    Ok(key_file)
}

/// 新規ファイルとして開く。既存ファイルは上書きしない。
fn open_new(path: &Path) -> std::io::Result<fs::File> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options.open(path)
}
