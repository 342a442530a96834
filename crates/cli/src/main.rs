//! # txsign CLI
//!
//! 署名サーバーと同じコアを使ってオフラインで鍵管理・署名を行う。
//! 結果は標準出力に、ログは標準エラーに出力する。

mod cli;

use std::io::Read;
use std::path::Path;

use anyhow::Context;
use clap::Parser;

use cli::{Cli, Commands, KeysCommand, TxArgs};
use txsign_core::{AminoCodec, FileKeybase, Keybase, SigningContext};
use txsign_types::StdTx;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let codec = build_codec(&cli);
    let keybase = FileKeybase::new(cli.key_dir.clone());

    let output = match cli.command {
        Commands::Keys {
            command: KeysCommand::Add { name, password },
        } => keys_add(&keybase, &name, &password)?,
        Commands::Keys {
            command: KeysCommand::List,
        } => keys_list(&keybase)?,
        Commands::SignBytes { tx } => sign_bytes(&codec, &tx)?,
        Commands::Sign { tx, name, password } => sign(&codec, &keybase, &tx, &name, &password)?,
    };
    println!("{output}");
    Ok(())
}

fn build_codec(cli: &Cli) -> AminoCodec {
    let codec = AminoCodec::new(cli.tx_type.clone());
    let msg_types: Vec<&String> = cli.msg_types.iter().filter(|t| !t.is_empty()).collect();
    if msg_types.is_empty() {
        codec
    } else {
        codec.with_registered_msg_types(msg_types.into_iter().cloned())
    }
}

fn keys_add(keybase: &FileKeybase, name: &str, password: &str) -> anyhow::Result<String> {
    let info = keybase.create(name, password)?;
    tracing::info!(key = %info.name, address = %info.address, dir = %keybase.dir().display(), "鍵を生成");
    Ok(serde_json::to_string_pretty(&info)?)
}

fn keys_list(keybase: &dyn Keybase) -> anyhow::Result<String> {
    let keys = keybase.list()?;
    Ok(serde_json::to_string_pretty(&keys)?)
}

fn read_tx(codec: &AminoCodec, path: &Path) -> anyhow::Result<StdTx> {
    let bytes = if path == Path::new("-") {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("標準入力の読み込みに失敗")?;
        buf
    } else {
        std::fs::read(path)
            .with_context(|| format!("トランザクションファイルの読み込みに失敗: {}", path.display()))?
    };
    Ok(codec.decode_tx_bytes(&bytes)?)
}

fn signing_context(args: &TxArgs) -> anyhow::Result<SigningContext> {
    Ok(SigningContext::parse(
        &args.chain_id,
        &args.account_number,
        &args.sequence,
    )?)
}

fn sign_bytes(codec: &AminoCodec, args: &TxArgs) -> anyhow::Result<String> {
    let tx = read_tx(codec, &args.tx)?;
    let prepared = codec.prepare_tx(tx, signing_context(args)?)?;
    Ok(String::from_utf8(prepared.sign_bytes().as_bytes().to_vec())?)
}

fn sign(
    codec: &AminoCodec,
    keybase: &dyn Keybase,
    args: &TxArgs,
    name: &str,
    password: &str,
) -> anyhow::Result<String> {
    let tx = read_tx(codec, &args.tx)?;
    let prepared = codec.prepare_tx(tx, signing_context(args)?)?;
    tracing::debug!(
        sign_bytes_len = prepared.sign_bytes().as_bytes().len(),
        "署名対象を構築"
    );
    let signed = prepared.sign_with(keybase, name, password)?;
    tracing::info!(key = %name, signatures = signed.signatures.len(), "トランザクションに署名");
    Ok(String::from_utf8(codec.encode_tx(&signed)?)?)
}
