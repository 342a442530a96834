//! # サーバーエラー型
//!
//! 全エンドポイントで共通のエラー型。
//! レスポンスは `{"error": 種別, "message": 詳細}` のJSONで返す。

use axum::http::StatusCode;
use axum::Json;

use txsign_core::{KeybaseError, SignError};
use txsign_types::ErrorResponse;

/// サーバーエラー型。
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// リクエストボディを解釈できない
    #[error("不正なリクエスト: {0}")]
    Decode(String),
    /// トランザクションの検証・署名対象の構築に失敗
    #[error(transparent)]
    Sign(#[from] SignError),
    /// 鍵ストアでの署名に失敗
    #[error(transparent)]
    Signer(#[from] KeybaseError),
    /// 内部エラー（タスク実行失敗等）
    #[error("内部エラー: {0}")]
    Internal(String),
}

impl ServerError {
    /// HTTPステータスコード。
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::Decode(_) => StatusCode::BAD_REQUEST,
            ServerError::Sign(e) if e.is_validation() => StatusCode::BAD_REQUEST,
            ServerError::Sign(_) | ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::Signer(e) => match e {
                KeybaseError::KeyNotFound(_) => StatusCode::NOT_FOUND,
                KeybaseError::WrongPassphrase(_) => StatusCode::UNAUTHORIZED,
                KeybaseError::InvalidName(_) => StatusCode::BAD_REQUEST,
                KeybaseError::AlreadyExists(_) => StatusCode::CONFLICT,
                KeybaseError::Unavailable(_) | KeybaseError::Corrupted { .. } => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
            },
        }
    }

    /// レスポンスの `error` フィールドに入る種別タグ。
    pub fn kind(&self) -> &'static str {
        match self {
            ServerError::Decode(_) => "decode",
            ServerError::Sign(e) if e.is_validation() => "validation",
            ServerError::Sign(_) | ServerError::Internal(_) => "internal",
            ServerError::Signer(e) => match e {
                KeybaseError::KeyNotFound(_) => "key_not_found",
                KeybaseError::WrongPassphrase(_) => "unauthorized",
                KeybaseError::InvalidName(_) => "validation",
                KeybaseError::AlreadyExists(_) => "conflict",
                KeybaseError::Unavailable(_) | KeybaseError::Corrupted { .. } => {
                    "signer_unavailable"
                }
            },
        }
    }
}

impl axum::response::IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "リクエスト処理に失敗");
        } else {
            tracing::warn!(status = %status, error = %self, "リクエストを拒否");
        }
        let body = ErrorResponse {
            error: self.kind().to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
