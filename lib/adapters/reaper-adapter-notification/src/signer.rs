use anyhow::{Result, anyhow};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha2::Sha256;

/// Robot webhook signature: `base64(HMAC_SHA256(secret, "{timestamp}\n{secret}"))`.
///
/// The receiving service verifies exactly this string-to-sign, so it must
/// not be changed to cover the request path or body.
pub fn sign(timestamp_ms: i64, secret: &str) -> Result<String> {
    let string_to_sign = format!("{timestamp_ms}\n{secret}");
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .map_err(|e| anyhow!("invalid signing key: {e}"))?;
    mac.update(string_to_sign.as_bytes());
    Ok(STANDARD
        .encode(mac.finalize().into_bytes())
        .trim()
        .to_string())
}
