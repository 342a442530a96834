//! # エンドポイントテスト用共通ヘルパー

use std::sync::Arc;

use txsign_core::{AminoCodec, MemoryKeybase};
use txsign_types::KeyInfo;

use crate::config::ServerState;

/// テスト用の鍵の名前
pub const TEST_KEY: &str = "alice";
/// テスト用の鍵のパスフレーズ
pub const TEST_PASSWORD: &str = "password";

/// テスト用の鍵を1つ登録したメモリ内鍵ストアで共有状態を構築する。
pub fn test_state() -> (Arc<ServerState>, KeyInfo) {
    test_state_with_codec(AminoCodec::default())
}

/// コーデックを指定して共有状態を構築する。
pub fn test_state_with_codec(codec: AminoCodec) -> (Arc<ServerState>, KeyInfo) {
    let keybase = MemoryKeybase::new();
    let info = keybase.create(TEST_KEY, TEST_PASSWORD).unwrap();
    let state = Arc::new(ServerState {
        keybase: Arc::new(keybase),
        codec,
    });
    (state, info)
}

/// 署名サーバーをエフェメラルポートで起動し、ポート番号を返す。
pub async fn start_server(state: Arc<ServerState>) -> u16 {
    let app = crate::build_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    port
}
