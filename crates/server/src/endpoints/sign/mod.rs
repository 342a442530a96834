//! # /tx/sign エンドポイント
//!
//! ## 処理フロー
//! 1. リクエストボディをSignBodyとしてデコード
//! 2. トランザクションをデコード・検証し、署名コンテキストを構築
//! 3. 署名対象バイト列（StdSignBytes）を正準JSONで構築
//! 4. 鍵ストアで署名（ブロッキングスレッド上で実行）
//! 5. 既存の署名リストの末尾に新しい署名を追加して返す

mod handler;

#[cfg(test)]
mod tests;

pub use handler::handle_sign;
