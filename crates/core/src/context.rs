//! # 署名コンテキスト
//!
//! chain_id / account_number / sequence を一度だけ検証し、不変の値として保持する。
//! 署名対象の構築と署名レコードの生成は同じ値を参照する。

use crate::error::SignError;

/// 署名コンテキスト。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningContext {
    chain_id: String,
    account_number: u64,
    sequence: u64,
}

impl SigningContext {
    /// 検証済みの数値からコンテキストを構築する。
    /// chain_idが空の場合はクロスチェーンリプレイを避けるため拒否する。
    pub fn new(
        chain_id: impl Into<String>,
        account_number: u64,
        sequence: u64,
    ) -> Result<Self, SignError> {
        let chain_id = chain_id.into();
        if chain_id.is_empty() {
            return Err(SignError::EmptyChainId);
        }
        Ok(Self {
            chain_id,
            account_number,
            sequence,
        })
    }

    /// リクエストの文字列フィールドからコンテキストを構築する。
    /// account_number / sequence は10進数の符号なし64ビット整数として解釈する。
    pub fn parse(chain_id: &str, account_number: &str, sequence: &str) -> Result<Self, SignError> {
        let account_number = parse_u64("account_number", account_number)?;
        let sequence = parse_u64("sequence", sequence)?;
        Self::new(chain_id, account_number, sequence)
    }

    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    pub fn account_number(&self) -> u64 {
        self.account_number
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

/// 10進数の符号なし64ビット整数をパースする。
/// 負数・非数値・桁あふれはすべて [`SignError::InvalidNumber`] になる。
pub fn parse_u64(field: &'static str, value: &str) -> Result<u64, SignError> {
    value.parse::<u64>().map_err(|e| SignError::InvalidNumber {
        field,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_zero() {
        let ctx = SigningContext::parse("test-chain", "0", "0").unwrap();
        assert_eq!(ctx.chain_id(), "test-chain");
        assert_eq!(ctx.account_number(), 0);
        assert_eq!(ctx.sequence(), 0);
    }

    #[test]
    fn test_parse_max_u64() {
        let ctx = SigningContext::parse("c", "18446744073709551615", "7").unwrap();
        assert_eq!(ctx.account_number(), u64::MAX);
        assert_eq!(ctx.sequence(), 7);
    }

    #[test]
    fn test_parse_rejects_invalid_numbers() {
        for bad in ["abc", "-1", "99999999999999999999", "", " 5", "1.0", "0x10"] {
            let err = SigningContext::parse("c", bad, "0").unwrap_err();
            match err {
                SignError::InvalidNumber { field, value, .. } => {
                    assert_eq!(field, "account_number");
                    assert_eq!(value, bad);
                }
                other => panic!("unexpected error for {bad:?}: {other:?}"),
            }

            let err = SigningContext::parse("c", "0", bad).unwrap_err();
            assert!(
                matches!(err, SignError::InvalidNumber { field: "sequence", .. }),
                "unexpected error for {bad:?}: {err:?}"
            );
        }
    }

    #[test]
    fn test_empty_chain_id_rejected() {
        assert_eq!(
            SigningContext::parse("", "1", "1").unwrap_err(),
            SignError::EmptyChainId
        );
        assert_eq!(SigningContext::new("", 1, 1).unwrap_err(), SignError::EmptyChainId);
    }

    #[test]
    fn test_invalid_number_is_validation_error() {
        let err = parse_u64("sequence", "-1").unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("sequence"));
    }
}
