//! # 署名リクエストの準備
//!
//! リクエストを `ReceivedRaw → Decoded → BytesBuilt` まで進めた値を [`PreparedSign`] として保持し、
//! 署名後に同じコンテキストで `Signed → Assembled` を行う。
//! いずれかの段階で失敗した場合は部分的な出力を返さない。

use txsign_types::{PubKey, SignBody, StdTx};

use crate::assemble::assemble;
use crate::codec::AminoCodec;
use crate::context::SigningContext;
use crate::error::SignError;
use crate::keybase::{Keybase, KeybaseError};
use crate::sign_bytes::SignBytes;

/// 署名対象の構築まで完了したリクエスト。
#[derive(Debug, Clone)]
pub struct PreparedSign {
    tx: StdTx,
    context: SigningContext,
    sign_bytes: SignBytes,
}

impl AminoCodec {
    /// リクエストをデコード・検証し、署名対象バイト列を構築する。
    pub fn prepare(&self, body: &SignBody) -> Result<PreparedSign, SignError> {
        let tx = self.decode_tx(&body.tx)?;
        let context =
            SigningContext::parse(&body.chain_id, &body.account_number, &body.sequence)?;
        self.prepare_tx(tx, context)
    }

    /// デコード済みのトランザクションと検証済みコンテキストから準備する。
    pub fn prepare_tx(&self, tx: StdTx, context: SigningContext) -> Result<PreparedSign, SignError> {
        let sign_bytes = self.sign_bytes(&context, &tx.fee, &tx.msgs, &tx.memo)?;
        Ok(PreparedSign {
            tx,
            context,
            sign_bytes,
        })
    }
}

impl PreparedSign {
    pub fn tx(&self) -> &StdTx {
        &self.tx
    }

    pub fn context(&self) -> &SigningContext {
        &self.context
    }

    pub fn sign_bytes(&self) -> &SignBytes {
        &self.sign_bytes
    }

    /// 外部で得た署名を統合する。
    pub fn assemble(&self, signature: Vec<u8>, pub_key: PubKey) -> StdTx {
        assemble(&self.tx, signature, pub_key, &self.context)
    }

    /// 鍵ストアで署名し、署名済みトランザクションを返す。
    pub fn sign_with(
        &self,
        keybase: &dyn Keybase,
        name: &str,
        passphrase: &str,
    ) -> Result<StdTx, KeybaseError> {
        let (signature, pub_key) = keybase.sign(name, passphrase, self.sign_bytes.as_bytes())?;
        Ok(self.assemble(signature, pub_key))
    }
}
