//! App proxy signature verification.
//!
//! Shopify signs proxied storefront requests with a hex HMAC-SHA256 of the
//! other query parameters, sorted by key and concatenated as `key=value`
//! with no separator. Repeated keys are joined with `,`.

use std::collections::BTreeMap;

use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::AuthError;

type HmacSha256 = Hmac<Sha256>;

/// Name of the signature query parameter.
pub const SIGNATURE_PARAM: &str = "signature";

/// Decoded query parameters, sorted by key.
pub type QueryParams = BTreeMap<String, Vec<String>>;

/// Decode a raw query string.
pub fn parse_query(query: &str) -> QueryParams {
    let mut params = QueryParams::new();
    for pair in query.split('&').filter(|pair| !pair.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        params
            .entry(decode_component(key))
            .or_default()
            .push(decode_component(value));
    }
    params
}

fn decode_component(raw: &str) -> String {
    let raw = raw.replace('+', " ");
    urlencoding::decode(&raw)
        .map(|s| s.into_owned())
        .unwrap_or(raw)
}

/// The string Shopify signs: every parameter except the signature.
pub fn signing_message(params: &QueryParams) -> String {
    params
        .iter()
        .filter(|(key, _)| key.as_str() != SIGNATURE_PARAM)
        .map(|(key, values)| format!("{}={}", key, values.join(",")))
        .collect()
}

fn mac(secret: &str, params: &QueryParams) -> Result<HmacSha256, AuthError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| AuthError::Internal(e.to_string()))?;
    mac.update(signing_message(params).as_bytes());
    Ok(mac)
}

/// Hex signature for a set of parameters.
pub fn sign(secret: &str, params: &QueryParams) -> Result<String, AuthError> {
    Ok(hex::encode(mac(secret, params)?.finalize().into_bytes()))
}

/// Verify the `signature` parameter against the others.
pub fn verify(secret: &str, params: &QueryParams) -> Result<(), AuthError> {
    let signature = params
        .get(SIGNATURE_PARAM)
        .and_then(|values| values.first())
        .filter(|value| !value.is_empty())
        .ok_or(AuthError::MissingSignature)?;
    let signature = hex::decode(signature).map_err(|_| AuthError::InvalidSignature)?;

    mac(secret, params)?
        .verify_slice(&signature)
        .map_err(|_| AuthError::InvalidSignature)
}
