use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "txsign")]
#[command(about = "Amino JSON トランザクションのオフライン署名ツール")]
pub struct Cli {
    /// 鍵ディレクトリ
    #[arg(long, env = "KEY_DIR", default_value = "./keys", global = true)]
    pub key_dir: PathBuf,

    /// トランザクション型名
    #[arg(long, env = "TX_TYPE", default_value = txsign_types::DEFAULT_TX_TYPE, global = true)]
    pub tx_type: String,

    /// 受け付けるメッセージ型名（カンマ区切り）。省略時は全型を受け付ける。
    #[arg(long, env = "MSG_TYPES", value_delimiter = ',', global = true)]
    pub msg_types: Vec<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// 鍵の管理
    Keys {
        #[command(subcommand)]
        command: KeysCommand,
    },
    /// 署名対象バイト列（StdSignBytes）を表示する
    SignBytes {
        #[command(flatten)]
        tx: TxArgs,
    },
    /// トランザクションに署名し、署名済みトランザクションを表示する
    Sign {
        #[command(flatten)]
        tx: TxArgs,

        /// 署名に使う鍵の名前
        #[arg(long)]
        name: String,

        /// 鍵のパスフレーズ
        #[arg(long, env = "TXSIGN_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum KeysCommand {
    /// 新しい鍵を生成して保存する
    Add {
        #[arg(value_name = "NAME")]
        name: String,

        /// 鍵を暗号化するパスフレーズ
        #[arg(long, env = "TXSIGN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// 保存されている鍵の一覧を表示する
    List,
}

/// 署名対象トランザクションとアカウント情報。
#[derive(Debug, Args)]
pub struct TxArgs {
    /// トランザクションのJSONファイル（`-` で標準入力）
    #[arg(long, value_name = "FILE")]
    pub tx: PathBuf,

    /// チェーンID
    #[arg(long)]
    pub chain_id: String,

    /// アカウント番号
    #[arg(long)]
    pub account_number: String,

    /// シーケンス
    #[arg(long)]
    pub sequence: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sign() {
        let cli = Cli::try_parse_from([
            "txsign",
            "--key-dir",
            "/tmp/keys",
            "sign",
            "--tx",
            "tx.json",
            "--chain-id",
            "irishub",
            "--account-number",
            "5",
            "--sequence",
            "2",
            "--name",
            "alice",
            "--password",
            "pw",
        ])
        .unwrap();
        assert_eq!(cli.key_dir, PathBuf::from("/tmp/keys"));
        match cli.command {
            Commands::Sign { tx, name, password } => {
                assert_eq!(tx.tx, PathBuf::from("tx.json"));
                assert_eq!(tx.chain_id, "irishub");
                assert_eq!(tx.account_number, "5");
                assert_eq!(tx.sequence, "2");
                assert_eq!(name, "alice");
                assert_eq!(password, "pw");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_keys_and_msg_types() {
        let cli = Cli::try_parse_from([
            "txsign",
            "keys",
            "list",
            "--msg-types",
            "bank/MsgSend,gov/MsgVote",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Keys {
                command: KeysCommand::List
            }
        ));
        assert_eq!(cli.msg_types, vec!["bank/MsgSend", "gov/MsgVote"]);
    }

    #[test]
    fn test_sign_bytes_requires_account_fields() {
        let result = Cli::try_parse_from(["txsign", "sign-bytes", "--tx", "tx.json"]);
        assert!(result.is_err());
    }
}
