//! # txsign 署名サーバー
//!
//! 未署名トランザクションとアカウント情報を受け取り、署名対象バイト列を構築して
//! 鍵ストアの鍵で署名し、署名済みトランザクションを返すHTTPサービス。
//!
//! ## API エンドポイント
//! - `POST /tx/sign`: トランザクションへの署名
//! - `GET /keys`: 鍵ストアの公開情報一覧

mod config;
mod endpoints;
mod error;

use std::sync::Arc;

use config::{ServerConfig, ServerState};

/// ルーターを構築する。
pub(crate) fn build_router(state: Arc<ServerState>) -> axum::Router {
    axum::Router::new()
        .route("/tx/sign", axum::routing::post(endpoints::handle_sign))
        .route("/keys", axum::routing::get(endpoints::handle_list_keys))
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = ServerConfig::from_env();
    let keybase = config.keybase()?;
    let codec = config.codec();
    tracing::info!(
        tx_type = %codec.tx_type(),
        registered_msg_types = ?codec.registered_msg_types(),
        "コーデックを構築"
    );

    let state = Arc::new(ServerState { keybase, codec });
    let app = build_router(state);

    tracing::info!("署名サーバーを {} で起動します", config.listen_addr);
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
