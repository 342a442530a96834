//! # txsign 暗号処理
//!
//! 署名サービスと鍵ストアが使用する暗号プリミティブをまとめる。
//!
//! ## 暗号アルゴリズム
//! | 用途 | アルゴリズム |
//! |------|------------|
//! | 署名 | Ed25519 |
//! | パスフレーズからの鍵導出 | Argon2id |
//! | 秘密鍵の暗号化 | AES-256-GCM |
//! | アドレス導出 | SHA-256 |

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use argon2::{Algorithm, Argon2, Params, Version};
use ed25519_dalek::{Signer, Verifier};
use rand::RngCore;
use sha2::{Digest, Sha256};

pub use ed25519_dalek::{
    Signature as Ed25519Signature, SigningKey as Ed25519SigningKey,
    VerifyingKey as Ed25519VerifyingKey,
};

/// 暗号処理のエラー型
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    /// Argon2鍵導出エラー
    #[error("Argon2鍵導出に失敗しました: {0}")]
    KdfError(String),
    /// AES-GCM暗号化エラー
    #[error("AES-GCM暗号化に失敗しました")]
    EncryptError,
    /// AES-GCM復号エラー（パスフレーズ誤りを含む）
    #[error("AES-GCM復号に失敗しました")]
    DecryptError,
    /// Ed25519署名検証エラー
    #[error("Ed25519署名検証に失敗しました")]
    SignatureVerifyError,
}

/// 対称鍵（AES-256用、32バイト）
pub type SymmetricKey = [u8; 32];

/// Argon2idのパラメータ。鍵ファイルに保存され、復号時に再利用される。
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct KdfParams {
    /// メモリコスト（KiB）
    pub memory_cost: u32,
    /// 反復回数
    pub time_cost: u32,
    /// 並列度
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        // 64 MiB, 3回, 4レーン
        Self {
            memory_cost: 65536,
            time_cost: 3,
            parallelism: 4,
        }
    }
}

/// Argon2idでパスフレーズから対称鍵を導出する。
pub fn derive_key_from_passphrase(
    passphrase: &str,
    salt: &[u8],
    params: &KdfParams,
) -> Result<SymmetricKey, CryptoError> {
    let argon2_params = Params::new(
        params.memory_cost,
        params.time_cost,
        params.parallelism,
        Some(32),
    )
    .map_err(|e| CryptoError::KdfError(e.to_string()))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2_params);

    let mut key = [0u8; 32];
    argon2
        .hash_password_into(passphrase.as_bytes(), salt, &mut key)
        .map_err(|e| CryptoError::KdfError(e.to_string()))?;
    Ok(key)
}

/// OSの乱数源から指定長のランダムバイト列を生成する。
pub fn random_bytes<const N: usize>() -> [u8; N] {
    let mut buf = [0u8; N];
    rand::rngs::OsRng.fill_bytes(&mut buf);
    buf
}

/// AES-256-GCMによる暗号化。
pub fn aes_gcm_encrypt(
    key: &SymmetricKey,
    nonce: &[u8; 12],
    plaintext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| CryptoError::EncryptError)?;
    let nonce = Nonce::from_slice(nonce);
    cipher.encrypt(nonce, plaintext).map_err(|_| CryptoError::EncryptError)
}

/// AES-256-GCMによる復号。
pub fn aes_gcm_decrypt(
    key: &SymmetricKey,
    nonce: &[u8; 12],
    ciphertext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| CryptoError::DecryptError)?;
    let nonce = Nonce::from_slice(nonce);
    cipher.decrypt(nonce, ciphertext).map_err(|_| CryptoError::DecryptError)
}

/// 新しいEd25519署名鍵を生成する。
pub fn generate_signing_key() -> Ed25519SigningKey {
    Ed25519SigningKey::generate(&mut rand::rngs::OsRng)
}

/// Ed25519による署名。
pub fn ed25519_sign(signing_key: &Ed25519SigningKey, message: &[u8]) -> Ed25519Signature {
    signing_key.sign(message)
}

/// Ed25519による署名検証。
pub fn ed25519_verify(
    verifying_key: &Ed25519VerifyingKey,
    message: &[u8],
    signature: &Ed25519Signature,
) -> Result<(), CryptoError> {
    verifying_key
        .verify(message, signature)
        .map_err(|_| CryptoError::SignatureVerifyError)
}

/// SHA-256ハッシュ計算。
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&result);
    hash
}

/// 公開鍵からアドレスを導出する。
/// Ed25519鍵のアドレスは `SHA-256(公開鍵)` の先頭20バイト。
pub fn address_from_pubkey(pubkey: &[u8]) -> [u8; 20] {
    let hash = sha256(pubkey);
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[..20]);
    address
}
