//! # txsign Core
//!
//! 署名対象バイト列（sign bytes）の構築と、署名のトランザクションへの統合を実装する。
//!
//! ## 処理フロー
//! 1. リクエストのトランザクションをデコードする（[`AminoCodec::decode_tx`]）
//! 2. chain_id / account_number / sequence を検証し [`SigningContext`] にまとめる
//! 3. 固定フィールド順の正規JSONで署名対象を構築する（[`AminoCodec::sign_bytes`]）
//! 4. 外部の署名機能（[`Keybase`]）で署名する
//! 5. 既存の署名列の末尾に新しい署名レコードを追加する（[`assemble`]）
//!
//! 2〜5は [`PreparedSign`] が同じコンテキスト値を保持したまま順に実行するため、
//! 署名対象の構築と署名レコードの間でaccount_number/sequenceが食い違うことはない。

pub mod assemble;
pub mod canonical;
pub mod codec;
pub mod context;
pub mod error;
pub mod keybase;
pub mod prepare;
pub mod sign_bytes;

pub use assemble::assemble;
pub use codec::AminoCodec;
pub use context::SigningContext;
pub use error::SignError;
pub use keybase::{FileKeybase, Keybase, KeybaseError, MemoryKeybase};
pub use prepare::PreparedSign;
pub use sign_bytes::SignBytes;
