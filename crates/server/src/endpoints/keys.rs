//! # /keys エンドポイント
//!
//! 鍵ストアに保存されている鍵の公開情報（名前・公開鍵・アドレス）を返す。

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use txsign_types::KeyInfo;

use crate::config::ServerState;
use crate::error::ServerError;

/// /keys エンドポイントハンドラ。
pub async fn handle_list_keys(
    State(state): State<Arc<ServerState>>,
) -> Result<Json<Vec<KeyInfo>>, ServerError> {
    let keybase = Arc::clone(&state.keybase);
    let keys = tokio::task::spawn_blocking(move || keybase.list())
        .await
        .map_err(|e| ServerError::Internal(format!("鍵一覧タスクの実行に失敗: {e}")))??;
    tracing::debug!(count = keys.len(), "鍵一覧を返却");
    Ok(Json(keys))
}
