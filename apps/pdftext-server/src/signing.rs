//! HMAC-SHA512 signing utility

use hmac::{Hmac, Mac};
use sha2::Sha512;

type HmacSha512 = Hmac<Sha512>;

/// Name reported alongside signatures
pub const ALGORITHM: &str = "HMAC-SHA512";

/// Lowercase hex HMAC-SHA512 of `data` keyed with `secret`
pub fn sign_hmac_sha512(data: &str, secret: &str) -> String {
    let mut mac = <HmacSha512 as Mac>::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(data.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}
