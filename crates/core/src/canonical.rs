//! # 正規JSON
//!
//! 署名対象バイト列に使うJSONの正規形を出力する。
//!
//! - オブジェクトのキーは全階層でバイト順にソートする
//! - 空白は出力しない
//! - 文字列のエスケープはGoの `encoding/json` と同一（`<` `>` `&` とU+2028/U+2029もエスケープ）
//!
//! 独立に同じバイト列を再計算する検証側と一致させる必要があるため、
//! `serde_json::Map` の内部順序やシリアライザの既定動作には依存しない。

use serde::Serialize;
use serde_json::Value;

const HEX: &[u8; 16] = b"0123456789abcdef";

/// 任意のシリアライズ可能な値を正規JSONのバイト列に変換する。
pub fn to_canonical_vec<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let value = serde_json::to_value(value)?;
    Ok(canonical_bytes(&value))
}

/// JSON値を正規JSONのバイト列に変換する。
pub fn canonical_bytes(value: &Value) -> Vec<u8> {
    let mut out = Vec::new();
    write_value(value, &mut out);
    out
}

fn write_value(value: &Value, out: &mut Vec<u8>) {
    match value {
        Value::Null => out.extend_from_slice(b"null"),
        Value::Bool(b) => out.extend_from_slice(if *b { b"true" } else { b"false" }),
        Value::Number(n) => out.extend_from_slice(n.to_string().as_bytes()),
        Value::String(s) => write_str(s, out),
        Value::Array(items) => {
            out.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_value(item, out);
            }
            out.push(b']');
        }
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

            out.push(b'{');
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_str(key, out);
                out.push(b':');
                write_value(item, out);
            }
            out.push(b'}');
        }
    }
}

fn write_str(s: &str, out: &mut Vec<u8>) {
    out.push(b'"');
    for c in s.chars() {
        match c {
            '"' => out.extend_from_slice(b"\\\""),
            '\\' => out.extend_from_slice(b"\\\\"),
            '\n' => out.extend_from_slice(b"\\n"),
            '\r' => out.extend_from_slice(b"\\r"),
            '\t' => out.extend_from_slice(b"\\t"),
            '<' | '>' | '&' => write_unicode_escape(c as u32, out),
            '\u{2028}' | '\u{2029}' => write_unicode_escape(c as u32, out),
            c if (c as u32) < 0x20 => write_unicode_escape(c as u32, out),
            c => {
                let mut buf = [0u8; 4];
                out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
        }
    }
    out.push(b'"');
}

/// `\uXXXX` 形式（小文字16進数）で書き出す。BMP内の文字のみ渡される。
fn write_unicode_escape(code: u32, out: &mut Vec<u8>) {
    out.extend_from_slice(b"\\u");
    for shift in [12u32, 8, 4, 0] {
        out.push(HEX[((code >> shift) & 0xf) as usize]);
    }
}
