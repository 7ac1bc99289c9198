use crate::error::ApiError;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::collections::BTreeMap;

// Create a type alias for the HMAC-SHA256 implementation.
type HmacSha256 = Hmac<Sha256>;

/// Creates the hex-encoded HMAC-SHA256 signature Binance expects for a query string.
pub fn sign_request(secret: &str, query_string: &str) -> String {
    // HMAC accepts keys of any length, so this cannot fail.
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(query_string.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Stamps `params` with `timestamp` and `recvWindow`, encodes them, and appends the signature.
///
/// The signature covers the exact string that is sent, so the returned value must be used
/// verbatim as the request's query string.
pub fn signed_query(
    params: &mut BTreeMap<&'static str, String>,
    secret: &str,
    timestamp_ms: i64,
    recv_window_ms: u64,
) -> Result<String, ApiError> {
    params.insert("timestamp", timestamp_ms.to_string());
    params.insert("recvWindow", recv_window_ms.to_string());

    let query_string =
        serde_qs::to_string(params).map_err(|e| ApiError::InvalidData(format!("Failed to encode query: {}", e)))?;
    let signature = sign_request(secret, &query_string);

    Ok(format!("{}&signature={}", query_string, signature))
}
