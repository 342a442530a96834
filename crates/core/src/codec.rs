//! # Amino JSONコーデック
//!
//! トランザクションのデコード・エンコードと、登録済みメッセージ型の管理を行う。
//!
//! プロセス全体で共有される可変レジストリは持たない。起動時に一度だけ構築し、
//! 共有参照で署名対象の構築・エンコードの両方に渡す。

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use txsign_types::{Coin, StdTx, DEFAULT_TX_TYPE};

use crate::error::SignError;

/// Amino JSONコーデック。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AminoCodec {
    /// エンコード時のラッパーに使うトランザクション型名
    tx_type: String,
    /// 登録済みメッセージ型名。Noneの場合は全メッセージ型を受け付ける。
    msg_types: Option<BTreeSet<String>>,
}

impl Default for AminoCodec {
    fn default() -> Self {
        Self::new(DEFAULT_TX_TYPE)
    }
}

/// `{"type": ..., "value": ...}` 形式のラッパー（エンコード用）
#[derive(Serialize)]
struct TypedTx<'a> {
    #[serde(rename = "type")]
    tx_type: &'a str,
    value: &'a StdTx,
}

impl AminoCodec {
    /// トランザクション型名を指定してコーデックを構築する。
    pub fn new(tx_type: impl Into<String>) -> Self {
        Self {
            tx_type: tx_type.into(),
            msg_types: None,
        }
    }

    /// 受け付けるメッセージ型名を登録する。
    pub fn with_registered_msg_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.msg_types = Some(types.into_iter().map(Into::into).collect());
        self
    }

    pub fn tx_type(&self) -> &str {
        &self.tx_type
    }

    /// 登録済みメッセージ型名（未設定の場合はNone）。
    pub fn registered_msg_types(&self) -> Option<&BTreeSet<String>> {
        self.msg_types.as_ref()
    }

    /// JSON値からトランザクションをデコードする。
    ///
    /// `{"type": <tx_type>, "value": {...}}` でラップされた形式と、
    /// ラップなしのStdTxの両方を受け付ける。
    pub fn decode_tx(&self, value: &Value) -> Result<StdTx, SignError> {
        let obj = value.as_object().ok_or_else(|| {
            SignError::MalformedTx("トランザクションはJSONオブジェクトである必要があります".into())
        })?;

        let inner = if obj.contains_key("value") && !obj.contains_key("fee") {
            let actual = obj.get("type").and_then(Value::as_str).unwrap_or_default();
            if actual != self.tx_type {
                return Err(SignError::UnexpectedTxType {
                    expected: self.tx_type.clone(),
                    actual: actual.to_string(),
                });
            }
            &obj["value"]
        } else {
            value
        };

        let tx = StdTx::deserialize(inner).map_err(|e| SignError::MalformedTx(e.to_string()))?;
        validate_coins(&tx.fee.amount)?;
        self.check_msgs(&tx.msgs)?;
        Ok(tx)
    }

    /// バイト列（JSONテキスト）からトランザクションをデコードする。
    pub fn decode_tx_bytes(&self, bytes: &[u8]) -> Result<StdTx, SignError> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|e| SignError::MalformedTx(e.to_string()))?;
        self.decode_tx(&value)
    }

    /// トランザクションを型名でラップしてエンコードする。
    pub fn encode_tx(&self, tx: &StdTx) -> Result<Vec<u8>, SignError> {
        serde_json::to_vec(&TypedTx {
            tx_type: &self.tx_type,
            value: tx,
        })
        .map_err(|e| SignError::Encode(e.to_string()))
    }

    /// メッセージ型が登録済みであることを確認する。
    pub(crate) fn check_msgs(&self, msgs: &[Value]) -> Result<(), SignError> {
        let Some(types) = &self.msg_types else {
            return Ok(());
        };
        for (index, msg) in msgs.iter().enumerate() {
            let msg_type = msg.get("type").and_then(Value::as_str).unwrap_or_default();
            if !types.contains(msg_type) {
                return Err(SignError::UnregisteredMsgType {
                    index,
                    msg_type: msg_type.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// 手数料のCoinを検証する。amountは空でない10進数字列でなければならない。
pub(crate) fn validate_coins(coins: &[Coin]) -> Result<(), SignError> {
    for coin in coins {
        let amount_ok = !coin.amount.is_empty() && coin.amount.bytes().all(|b| b.is_ascii_digit());
        if coin.denom.is_empty() || !amount_ok {
            return Err(SignError::InvalidCoin {
                denom: coin.denom.clone(),
                amount: coin.amount.clone(),
            });
        }
    }
    Ok(())
}
