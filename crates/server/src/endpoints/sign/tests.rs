use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::{json, Value};

use txsign_core::AminoCodec;
use txsign_crypto::{ed25519_verify, Ed25519Signature, Ed25519VerifyingKey};
use txsign_types::{KeyInfo, StdTx};

use crate::config::ServerState;
use crate::endpoints::test_helpers::{
    start_server, test_state, test_state_with_codec, TEST_KEY, TEST_PASSWORD,
};
use crate::error::ServerError;

use super::handler::handle_sign;

/// `account_number=5, sequence=2, chain_id=test-chain` で期待される署名対象バイト列
const EXPECTED_SIGN_BYTES: &str = r#"{"account_number":"5","chain_id":"test-chain","fee":{"amount":[],"gas":"200000"},"memo":"","msgs":[{"type":"test/MsgNote","value":{"note":"hello","signer":"addr1"}}],"sequence":"2"}"#;

fn unsigned_tx() -> Value {
    json!({
        "msg": [{"type": "test/MsgNote", "value": {"signer": "addr1", "note": "hello"}}],
        "fee": {"amount": [], "gas": "200000"},
        "signatures": null,
        "memo": "",
    })
}

fn sign_body(tx: Value) -> Value {
    json!({
        "tx": tx,
        "name": TEST_KEY,
        "password": TEST_PASSWORD,
        "chain_id": "test-chain",
        "account_number": "5",
        "sequence": "2",
    })
}

async fn sign_ok(state: Arc<ServerState>, body: &Value) -> Value {
    let response = match handle_sign(State(state), Bytes::from(body.to_string())).await {
        Ok(response) => response,
        Err(e) => panic!("署名に失敗: {e}"),
    };
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn sign_err(state: Arc<ServerState>, body: Bytes) -> ServerError {
    match handle_sign(State(state), body).await {
        Ok(_) => panic!("署名が成功してしまった"),
        Err(e) => e,
    }
}

fn assert_verifies(info: &KeyInfo, signature: &[u8], message: &[u8]) {
    let pubkey: [u8; 32] = info.pub_key.value.as_slice().try_into().unwrap();
    let verifying_key = Ed25519VerifyingKey::from_bytes(&pubkey).unwrap();
    let signature = Ed25519Signature::from_slice(signature).unwrap();
    ed25519_verify(&verifying_key, message, &signature).unwrap();
}

#[tokio::test]
async fn test_sign_appends_verifiable_signature() {
    let (state, info) = test_state();
    let response = sign_ok(state, &sign_body(unsigned_tx())).await;

    assert_eq!(response["type"], "auth/StdTx");
    let tx: StdTx = serde_json::from_value(response["value"].clone()).unwrap();
    assert_eq!(tx.signatures.len(), 1);

    let record = &tx.signatures[0];
    assert_eq!(record.pub_key, info.pub_key);
    assert_eq!(record.account_number, 5);
    assert_eq!(record.sequence, 2);
    assert_eq!(response["value"]["signatures"][0]["account_number"], "5");
    assert_eq!(response["value"]["signatures"][0]["sequence"], "2");

    assert_verifies(&info, &record.signature, EXPECTED_SIGN_BYTES.as_bytes());
}

#[tokio::test]
async fn test_sign_preserves_tx_content() {
    let (state, _) = test_state();
    let response = sign_ok(state, &sign_body(unsigned_tx())).await;
    let value = &response["value"];
    assert_eq!(value["msg"], unsigned_tx()["msg"]);
    assert_eq!(value["fee"]["gas"], "200000");
    assert_eq!(value["memo"], "");
}

#[tokio::test]
async fn test_sign_keeps_existing_signatures_in_order() {
    let (state, _) = test_state();
    let first = sign_ok(state.clone(), &sign_body(unsigned_tx())).await;

    // 署名済みトランザクション（ラップ形式）をもう一度署名する
    let second = sign_ok(state, &sign_body(first.clone())).await;
    let first_sigs = first["value"]["signatures"].as_array().unwrap();
    let second_sigs = second["value"]["signatures"].as_array().unwrap();
    assert_eq!(first_sigs.len(), 1);
    assert_eq!(second_sigs.len(), 2);
    assert_eq!(second_sigs[0], first_sigs[0]);
}

#[tokio::test]
async fn test_sign_accepts_registered_msg_types_only() {
    let codec = AminoCodec::default().with_registered_msg_types(["test/MsgNote"]);
    let (state, _) = test_state_with_codec(codec);
    sign_ok(state, &sign_body(unsigned_tx())).await;

    let codec = AminoCodec::default().with_registered_msg_types(["bank/MsgSend"]);
    let (state, _) = test_state_with_codec(codec);
    let error = sign_err(state, Bytes::from(sign_body(unsigned_tx()).to_string())).await;
    assert_eq!(error.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error.kind(), "validation");
}

#[tokio::test]
async fn test_sign_rejects_invalid_numbers() {
    for (field, value) in [
        ("account_number", "abc"),
        ("account_number", "-1"),
        ("sequence", "18446744073709551616"),
        ("sequence", ""),
    ] {
        let (state, _) = test_state();
        let mut body = sign_body(unsigned_tx());
        body[field] = json!(value);
        let error = sign_err(state, Bytes::from(body.to_string())).await;
        assert_eq!(error.status(), StatusCode::BAD_REQUEST, "{field}={value:?}");
        assert_eq!(error.kind(), "validation");
    }
}

#[tokio::test]
async fn test_sign_rejects_negative_gas() {
    let (state, _) = test_state();
    let mut tx = unsigned_tx();
    tx["fee"]["gas"] = json!("-1");
    let error = sign_err(state, Bytes::from(sign_body(tx).to_string())).await;
    assert_eq!(error.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_sign_rejects_empty_chain_id() {
    let (state, _) = test_state();
    let mut body = sign_body(unsigned_tx());
    body["chain_id"] = json!("");
    let error = sign_err(state, Bytes::from(body.to_string())).await;
    assert_eq!(error.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_sign_malformed_body() {
    let (state, _) = test_state();
    let error = sign_err(state.clone(), Bytes::from_static(b"{not json")).await;
    assert_eq!(error.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error.kind(), "decode");

    // 必須フィールドの欠落
    let error = sign_err(state.clone(), Bytes::from_static(b"{\"tx\":{}}")).await;
    assert_eq!(error.kind(), "decode");

    // txがトランザクションとして解釈できない
    let error = sign_err(
        state,
        Bytes::from(sign_body(json!({"msg": "oops"})).to_string()),
    )
    .await;
    assert_eq!(error.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error.kind(), "validation");
}

#[tokio::test]
async fn test_sign_unknown_key() {
    let (state, _) = test_state();
    let mut body = sign_body(unsigned_tx());
    body["name"] = json!("bob");
    let error = sign_err(state, Bytes::from(body.to_string())).await;
    assert_eq!(error.status(), StatusCode::NOT_FOUND);
    assert_eq!(error.kind(), "key_not_found");
}

#[tokio::test]
async fn test_sign_wrong_password() {
    let (state, _) = test_state();
    let mut body = sign_body(unsigned_tx());
    body["password"] = json!("wrong");
    let error = sign_err(state, Bytes::from(body.to_string())).await;
    assert_eq!(error.status(), StatusCode::UNAUTHORIZED);

    // レスポンスにパスフレーズが含まれないこと
    let response = error.into_response();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(!text.contains("wrong\""));
    let parsed: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed["error"], "unauthorized");
}

/// 実際にHTTPサーバーを起動してエンドツーエンドで確認する
#[tokio::test]
async fn test_sign_over_http() {
    let (state, info) = test_state();
    let port = start_server(state).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("http://127.0.0.1:{port}/tx/sign"))
        .json(&sign_body(unsigned_tx()))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let signed: Value = response.json().await.unwrap();
    let tx: StdTx = serde_json::from_value(signed["value"].clone()).unwrap();
    assert_verifies(&info, &tx.signatures[0].signature, EXPECTED_SIGN_BYTES.as_bytes());

    let response = client
        .post(format!("http://127.0.0.1:{port}/tx/sign"))
        .body("garbage")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    let error: Value = response.json().await.unwrap();
    assert_eq!(error["error"], "decode");

    let keys: Vec<KeyInfo> = client
        .get(format!("http://127.0.0.1:{port}/keys"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(keys, vec![info]);
}
