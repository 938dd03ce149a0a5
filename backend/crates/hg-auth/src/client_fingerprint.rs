use crate::signing::sha256_hex;

/// Coarse per-client key for rate limiting: the client IP plus a short
/// hash of the user agent, so distinct browsers behind one NAT do not
/// share a bucket.
pub fn client_fingerprint(ip: &str, user_agent: &str) -> String {
    let mut ua_hash = sha256_hex(user_agent);
    ua_hash.truncate(8);
    format!("{}:{}", ip, ua_hash)
}
