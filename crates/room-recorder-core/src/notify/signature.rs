use crate::{CoreResult, RecorderError};

use std::panic::Location;

use error_location::ErrorLocation;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Lowercase hex HMAC-SHA256 of `body` keyed with `secret`.
#[track_caller]
pub fn sign(secret: &str, body: &[u8]) -> CoreResult<String> {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|e| RecorderError::Signature {
            reason: format!("Invalid signing key: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;
    mac.update(body);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Check a hex signature produced by [`sign`] in constant time.
pub fn verify(secret: &str, body: &[u8], signature: &str) -> bool {
    let Ok(provided) = hex::decode(signature.trim()) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&provided).is_ok()
}
