//! # 署名サーバーのエンドポイント

pub mod keys;
pub mod sign;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use keys::handle_list_keys;
pub use sign::handle_sign;
