//! # txsign 共有型定義
//!
//! 署名サービスが送受信するAmino JSON形式のデータ構造をRust構造体として提供する。
//!
//! ## エンコーディング規則
//! - 64ビット整数（gas, account_number, sequence）: 10進数のJSON文字列
//! - Base64: バイナリデータ（公開鍵、署名）
//! - メッセージ本体: 不透明なJSON値（`{"type": ..., "value": ...}` が慣例）

use serde::{Deserialize, Deserializer, Serialize};

/// Ed25519公開鍵のAmino型名
pub const PUBKEY_ED25519_TYPE: &str = "tendermint/PubKeyEd25519";

/// トランザクションのAmino型名（デフォルト）
pub const DEFAULT_TX_TYPE: &str = "auth/StdTx";

// ---------------------------------------------------------------------------
// serdeヘルパー
// ---------------------------------------------------------------------------

/// 整数を10進数文字列としてシリアライズする。
/// デシリアライズ時は文字列とJSON数値の両方を受け付ける。
pub mod string_int {
    use std::fmt::Display;
    use std::str::FromStr;

    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Str(String),
        Unsigned(u64),
        Signed(i64),
    }

    pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Display,
        S: Serializer,
    {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: FromStr,
        T::Err: Display,
        D: Deserializer<'de>,
    {
        let text = match Repr::deserialize(deserializer)? {
            Repr::Str(s) => s,
            Repr::Unsigned(n) => n.to_string(),
            Repr::Signed(n) => n.to_string(),
        };
        text.parse::<T>()
            .map_err(|e| serde::de::Error::custom(format!("整数として解釈できません ({text:?}): {e}")))
    }
}

/// バイト列をBase64（Standard）文字列としてシリアライズする。
pub mod base64_bytes {
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        base64::engine::general_purpose::STANDARD
            .decode(s.as_bytes())
            .map_err(|e| serde::de::Error::custom(format!("Base64デコードに失敗: {e}")))
    }
}

/// `null` を空のVecとして扱う。
fn null_as_empty<'de, T, D>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// トランザクション
// ---------------------------------------------------------------------------

/// 手数料の1要素（デノミネーションと数量）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    /// デノミネーション（例: "iris-atto"）
    pub denom: String,
    /// 数量（10進数文字列。任意精度のため文字列で保持する）
    pub amount: String,
}

/// トランザクション手数料。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdFee {
    /// 手数料額
    #[serde(default, deserialize_with = "null_as_empty")]
    pub amount: Vec<Coin>,
    /// ガス上限。送信側の表現に合わせて符号付きで保持する。
    #[serde(with = "string_int")]
    pub gas: i64,
}

/// Amino形式の公開鍵。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PubKey {
    /// Amino型名
    #[serde(rename = "type")]
    pub key_type: String,
    /// 公開鍵のバイト列
    #[serde(with = "base64_bytes")]
    pub value: Vec<u8>,
}

impl PubKey {
    /// Ed25519公開鍵を構築する。
    pub fn ed25519(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            key_type: PUBKEY_ED25519_TYPE.to_string(),
            value: bytes.into(),
        }
    }
}

/// トランザクションに埋め込まれる署名レコード。
///
/// 署名者ごとにaccount_number/sequenceを保持するため、
/// 複数署名者が独立にカウンタを進めていても表現できる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdSignature {
    /// 署名者の公開鍵
    pub pub_key: PubKey,
    /// 署名のバイト列
    #[serde(with = "base64_bytes")]
    pub signature: Vec<u8>,
    /// 署名時のアカウント番号
    #[serde(with = "string_int")]
    pub account_number: u64,
    /// 署名時のシーケンス
    #[serde(with = "string_int")]
    pub sequence: u64,
}

/// 標準トランザクション。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdTx {
    /// メッセージ列（順序は署名対象に含まれる）
    #[serde(rename = "msg", default, deserialize_with = "null_as_empty")]
    pub msgs: Vec<serde_json::Value>,
    /// 手数料
    pub fee: StdFee,
    /// 既存の署名列
    #[serde(default, deserialize_with = "null_as_empty")]
    pub signatures: Vec<StdSignature>,
    /// メモ
    #[serde(default)]
    pub memo: String,
}

// ---------------------------------------------------------------------------
// /tx/sign
// ---------------------------------------------------------------------------

/// /tx/sign リクエスト。
#[derive(Clone, Serialize, Deserialize)]
pub struct SignBody {
    /// 未署名（または一部署名済み）トランザクション
    pub tx: serde_json::Value,
    /// 署名に使う鍵の名前
    pub name: String,
    /// 鍵のパスフレーズ
    pub password: String,
    /// チェーンID
    pub chain_id: String,
    /// アカウント番号（10進数文字列）
    pub account_number: String,
    /// シーケンス（10進数文字列）
    pub sequence: String,
}

// パスフレーズをログに出さないため手動実装する
impl std::fmt::Debug for SignBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignBody")
            .field("tx", &self.tx)
            .field("name", &self.name)
            .field("password", &"<redacted>")
            .field("chain_id", &self.chain_id)
            .field("account_number", &self.account_number)
            .field("sequence", &self.sequence)
            .finish()
    }
}

/// エラーレスポンス。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// エラー分類タグ（"decode", "validation", "key_not_found" 等）
    pub error: String,
    /// 人間向けのメッセージ
    pub message: String,
}

// ---------------------------------------------------------------------------
// 鍵情報
// ---------------------------------------------------------------------------

/// 鍵の公開情報。/keys レスポンスとCLIの一覧表示で使用する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyInfo {
    /// 鍵の名前
    pub name: String,
    /// 公開鍵
    pub pub_key: PubKey,
    /// アドレス（SHA-256(公開鍵)の先頭20バイトの16進数）
    pub address: String,
}
