//! # 鍵ストア（署名機能）
//!
//! 鍵名とパスフレーズで秘密鍵を解錠し、メッセージに署名する機能を抽象化する。
//! 署名サービスはこのトレイトを介してのみ秘密鍵にアクセスする。
//!
//! ## 実装
//! - `FileKeybase`: ディレクトリ内のJSONファイルに暗号化した鍵を保存する（本番用）
//! - `MemoryKeybase`: プロセス内に鍵を保持する（開発・テスト用）

pub mod file;
pub mod memory;

pub use file::FileKeybase;
pub use memory::MemoryKeybase;

use txsign_crypto::{address_from_pubkey, Ed25519VerifyingKey};
use txsign_types::{KeyInfo, PubKey};

/// 鍵ストアのエラー型。
#[derive(Debug, thiserror::Error)]
pub enum KeybaseError {
    /// 指定された名前の鍵が存在しない
    #[error("鍵が見つかりません: {0}")]
    KeyNotFound(String),
    /// パスフレーズが一致しない
    #[error("パスフレーズが正しくありません: {0}")]
    WrongPassphrase(String),
    /// 同名の鍵が既に存在する
    #[error("鍵が既に存在します: {0}")]
    AlreadyExists(String),
    /// 鍵の名前に使用できない文字が含まれる
    #[error("鍵の名前が不正です: {0:?}")]
    InvalidName(String),
    /// 鍵ストアにアクセスできない（I/Oエラー等）
    #[error("鍵ストアを利用できません: {0}")]
    Unavailable(String),
    /// 鍵ファイルを解釈できない
    #[error("鍵ファイルが破損しています ({name}): {reason}")]
    Corrupted {
        /// 鍵の名前
        name: String,
        /// 詳細
        reason: String,
    },
}

/// 署名機能のトレイト。
///
/// 呼び出しはブロッキングしうる（鍵導出・ファイルI/O）。
/// 非同期コンテキストからは `spawn_blocking` 等で呼び出すこと。
pub trait Keybase: Send + Sync {
    /// 鍵を解錠してメッセージに署名し、署名と公開鍵を返す。
    fn sign(
        &self,
        name: &str,
        passphrase: &str,
        message: &[u8],
    ) -> Result<(Vec<u8>, PubKey), KeybaseError>;

    /// 保存されている鍵の公開情報を名前順に返す。
    fn list(&self) -> Result<Vec<KeyInfo>, KeybaseError>;
}

/// 鍵の名前を検証する。ファイル名としても安全な `[A-Za-z0-9_-]+` のみ許可する。
pub(crate) fn validate_key_name(name: &str) -> Result<(), KeybaseError> {
    let valid = !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
    if valid {
        Ok(())
    } else {
        Err(KeybaseError::InvalidName(name.to_string()))
    }
}

/// 公開鍵から鍵情報を構築する。
pub(crate) fn key_info(name: &str, verifying_key: &Ed25519VerifyingKey) -> KeyInfo {
    let pubkey_bytes = verifying_key.to_bytes();
    KeyInfo {
        name: name.to_string(),
        pub_key: PubKey::ed25519(pubkey_bytes.to_vec()),
        address: hex::encode(address_from_pubkey(&pubkey_bytes)),
    }
}
