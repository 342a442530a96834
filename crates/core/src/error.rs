//! # 署名処理のエラー型
//!
//! デコード・検証・エンコードの失敗を閉じた列挙型で表す。
//! 各バリアントは診断に必要なフィールド名と問題の値を保持する。

/// 署名対象の構築・署名統合に関するエラー。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignError {
    /// 埋め込まれたトランザクションの構造が不正
    #[error("トランザクションのデコードに失敗: {0}")]
    MalformedTx(String),
    /// ラップされたトランザクションの型名が想定と異なる
    #[error("トランザクションの型が一致しません: 期待値 {expected:?}, 実際 {actual:?}")]
    UnexpectedTxType {
        /// コーデックに設定された型名
        expected: String,
        /// リクエストに含まれていた型名
        actual: String,
    },
    /// コーデックに登録されていないメッセージ型
    #[error("未登録のメッセージ型です (msg[{index}]): {msg_type:?}")]
    UnregisteredMsgType {
        /// メッセージ列内の位置
        index: usize,
        /// メッセージの型名（存在しない場合は空文字列）
        msg_type: String,
    },
    /// 手数料のCoinが不正
    #[error("手数料の指定が不正です (denom={denom:?}, amount={amount:?})")]
    InvalidCoin {
        /// デノミネーション
        denom: String,
        /// 数量
        amount: String,
    },
    /// chain_idが空
    #[error("chain_idが空です")]
    EmptyChainId,
    /// 10進数の符号なし64ビット整数として解釈できない
    #[error("{field}を符号なし64ビット整数として解釈できません ({value:?}): {reason}")]
    InvalidNumber {
        /// フィールド名
        field: &'static str,
        /// 入力値
        value: String,
        /// パース失敗の理由
        reason: String,
    },
    /// gasが符号なし64ビット整数の範囲外
    #[error("gasが符号なし64ビット整数の範囲外です: {0}")]
    GasOutOfRange(i64),
    /// 署名済みトランザクション等のエンコード失敗
    #[error("エンコードに失敗: {0}")]
    Encode(String),
}

impl SignError {
    /// 呼び出し側の入力に起因するエラーかどうか。
    /// `false` の場合は内部エラーとして扱う。
    pub fn is_validation(&self) -> bool {
        !matches!(self, SignError::Encode(_))
    }
}
