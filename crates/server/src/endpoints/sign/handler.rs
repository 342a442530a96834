//! /tx/sign ハンドラ実装

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use txsign_types::SignBody;

use crate::config::ServerState;
use crate::error::ServerError;

/// /tx/sign エンドポイントハンドラ。
///
/// 成功時は署名を追加したトランザクションを `{"type", "value"}` 形式で返す。
pub async fn handle_sign(
    State(state): State<Arc<ServerState>>,
    body: Bytes,
) -> Result<Response, ServerError> {
    // Step 1. リクエストのデコード
    let request: SignBody = serde_json::from_slice(&body)
        .map_err(|e| ServerError::Decode(format!("SignBodyのパースに失敗: {e}")))?;
    tracing::debug!(
        key = %request.name,
        chain_id = %request.chain_id,
        account_number = %request.account_number,
        sequence = %request.sequence,
        "署名リクエストを受信"
    );

    // Step 2-3. トランザクションの検証と署名対象の構築
    let prepared = state.codec.prepare(&request)?;
    tracing::debug!(
        msgs = prepared.tx().msgs.len(),
        existing_signatures = prepared.tx().signatures.len(),
        sign_bytes_len = prepared.sign_bytes().as_bytes().len(),
        "署名対象を構築"
    );

    // Step 4. 鍵ストアでの署名（鍵導出・ファイルI/Oを含むためブロッキングスレッドで実行）
    let SignBody { name, password, .. } = request;
    let keybase = Arc::clone(&state.keybase);
    let key_name = name.clone();
    let signed = tokio::task::spawn_blocking(move || {
        prepared.sign_with(keybase.as_ref(), &name, &password)
    })
    .await
    .map_err(|e| ServerError::Internal(format!("署名タスクの実行に失敗: {e}")))??;

    // Step 5. 署名済みトランザクションのエンコード
    let encoded = state.codec.encode_tx(&signed)?;
    tracing::info!(
        key = %key_name,
        signatures = signed.signatures.len(),
        "トランザクションに署名"
    );

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        encoded,
    )
        .into_response())
}
