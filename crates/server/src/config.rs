//! # サーバー設定・共有状態
//!
//! 環境変数からの設定読み込みとサーバーの共有状態の定義。

use std::path::PathBuf;
use std::sync::Arc;

use txsign_core::{AminoCodec, FileKeybase, Keybase, MemoryKeybase};
use txsign_types::DEFAULT_TX_TYPE;

/// サーバー設定。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// 待ち受けアドレス（LISTEN_ADDR）
    pub listen_addr: String,
    /// 鍵ディレクトリ（KEY_DIR）
    pub key_dir: PathBuf,
    /// トランザクション型名（TX_TYPE）
    pub tx_type: String,
    /// 登録メッセージ型名（MSG_TYPES、カンマ区切り）。Noneなら全型を受け付ける。
    pub msg_types: Option<Vec<String>>,
    /// 開発モード（DEV_MODE=true）。メモリ内鍵ストアを使う。
    pub dev_mode: bool,
    /// 開発モードで生成する鍵の名前（DEV_KEY_NAME）
    pub dev_key_name: String,
    /// 開発モードで生成する鍵のパスフレーズ（DEV_KEY_PASSWORD）
    pub dev_key_password: String,
}

impl ServerConfig {
    /// 環境変数から読み込む。
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 任意の参照関数から読み込む。
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let msg_types = lookup("MSG_TYPES")
            .map(|list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .filter(|types| !types.is_empty());

        Self {
            listen_addr: lookup("LISTEN_ADDR").unwrap_or_else(|| "0.0.0.0:1317".to_string()),
            key_dir: lookup("KEY_DIR").unwrap_or_else(|| "./keys".to_string()).into(),
            tx_type: lookup("TX_TYPE").unwrap_or_else(|| DEFAULT_TX_TYPE.to_string()),
            msg_types,
            dev_mode: lookup("DEV_MODE").unwrap_or_default() == "true",
            dev_key_name: lookup("DEV_KEY_NAME").unwrap_or_else(|| "dev".to_string()),
            dev_key_password: lookup("DEV_KEY_PASSWORD")
                .unwrap_or_else(|| "password".to_string()),
        }
    }

    /// 設定からコーデックを構築する。
    pub fn codec(&self) -> AminoCodec {
        let codec = AminoCodec::new(self.tx_type.clone());
        match &self.msg_types {
            Some(types) => codec.with_registered_msg_types(types.iter().cloned()),
            None => codec,
        }
    }

    /// 設定から鍵ストアを構築する。
    pub fn keybase(&self) -> anyhow::Result<Arc<dyn Keybase>> {
        if self.dev_mode {
            tracing::warn!(
                key = %self.dev_key_name,
                "DEV_MODEが有効です。メモリ内鍵ストアで起動します（開発環境用）"
            );
            let keybase = MemoryKeybase::new();
            let info = keybase.create(&self.dev_key_name, &self.dev_key_password)?;
            tracing::info!(key = %info.name, address = %info.address, "開発用の鍵を生成");
            return Ok(Arc::new(keybase));
        }

        tracing::info!(key_dir = %self.key_dir.display(), "ファイル鍵ストアで起動します");
        Ok(Arc::new(FileKeybase::new(self.key_dir.clone())))
    }
}

/// サーバーの共有状態。
pub struct ServerState {
    /// 署名機能
    pub keybase: Arc<dyn Keybase>,
    /// 起動時に一度だけ構築するコーデック
    pub codec: AminoCodec,
}
