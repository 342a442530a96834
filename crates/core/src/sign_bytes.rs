//! # 署名対象バイト列の構築
//!
//! (chain_id, account_number, sequence, fee, msgs, memo) を固定の正規形で直列化する。
//! 同じ入力からは常に同じバイト列が得られ、異なる入力が同じバイト列になることはない。
//!
//! ```text
//! {"account_number":"5","chain_id":"test-chain","fee":{"amount":[],"gas":"200000"},
//!  "memo":"","msgs":[...],"sequence":"2"}
//! ```

use serde::Serialize;
use serde_json::Value;
use txsign_types::{Coin, StdFee};

use crate::canonical;
use crate::codec::{validate_coins, AminoCodec};
use crate::context::SigningContext;
use crate::error::SignError;

/// 署名プリミティブへの唯一の入力となるバイト列。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SignBytes(Vec<u8>);

impl SignBytes {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl AsRef<[u8]> for SignBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// 署名対象ドキュメント。キーは正規化時にソートされる。
#[derive(Serialize)]
struct StdSignDoc<'a> {
    account_number: String,
    chain_id: &'a str,
    fee: FeeDoc<'a>,
    memo: &'a str,
    msgs: &'a [Value],
    sequence: String,
}

#[derive(Serialize)]
struct FeeDoc<'a> {
    amount: &'a [Coin],
    gas: String,
}

impl AminoCodec {
    /// 署名対象バイト列を構築する。
    ///
    /// gasは符号なし64ビット整数へ明示的に変換し、負数は
    /// [`SignError::GasOutOfRange`] として拒否する。
    pub fn sign_bytes(
        &self,
        context: &SigningContext,
        fee: &StdFee,
        msgs: &[Value],
        memo: &str,
    ) -> Result<SignBytes, SignError> {
        let gas = u64::try_from(fee.gas).map_err(|_| SignError::GasOutOfRange(fee.gas))?;
        validate_coins(&fee.amount)?;
        self.check_msgs(msgs)?;

        let doc = StdSignDoc {
            account_number: context.account_number().to_string(),
            chain_id: context.chain_id(),
            fee: FeeDoc {
                amount: &fee.amount,
                gas: gas.to_string(),
            },
            memo,
            msgs,
            sequence: context.sequence().to_string(),
        };

        let bytes = canonical::to_canonical_vec(&doc)
            .map_err(|e| SignError::Encode(format!("署名対象のシリアライズに失敗: {e}")))?;
        Ok(SignBytes(bytes))
    }
}
