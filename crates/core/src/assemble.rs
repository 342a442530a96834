//! # 署名の統合
//!
//! 署名機能が返した署名と公開鍵から署名レコードを作り、
//! 既存の署名列の末尾に追加した新しいトランザクションを返す。
//! 呼び出し側のトランザクションは変更しない。

use txsign_types::{PubKey, StdSignature, StdTx};

use crate::context::SigningContext;

/// 署名済みトランザクションを組み立てる。
///
/// 署名列は `original.signatures ++ [新しいレコード]` となり、既存の署名者のエントリと順序は保たれる。
/// 渡された署名と公開鍵は加工せずそのまま格納する。
pub fn assemble(
    original: &StdTx,
    signature: Vec<u8>,
    pub_key: PubKey,
    context: &SigningContext,
) -> StdTx {
    let mut signatures = Vec::with_capacity(original.signatures.len() + 1);
    signatures.extend(original.signatures.iter().cloned());
    signatures.push(StdSignature {
        pub_key,
        signature,
        account_number: context.account_number(),
        sequence: context.sequence(),
    });

    StdTx {
        msgs: original.msgs.clone(),
        fee: original.fee.clone(),
        signatures,
        memo: original.memo.clone(),
    }
}
