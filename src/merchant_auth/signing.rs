//! Canonical request signing and verification.
//!
//! The canonical string is `METHOD|PATH|TIMESTAMP|NONCE|HEX(SHA-256(BODY))`
//! over the exact method, exact path and raw body bytes as received. Field
//! order and the `|` delimiter are part of the wire contract; any
//! normalization breaks interoperability with signing clients.

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

pub fn canonical_string(
    method: &str,
    path: &str,
    timestamp: &str,
    nonce: &str,
    body: &[u8],
) -> String {
    format!(
        "{}|{}|{}|{}|{}",
        method.to_uppercase(),
        path,
        timestamp,
        nonce,
        sha256_hex(body)
    )
}

/// Hex-encoded `HMAC-SHA256(secret, message)`.
///
/// The key must be the merchant's shared secret itself, never a one-way
/// hash of it: a digest cannot reproduce the HMAC a client derives from
/// the original secret.
pub fn sign(secret: &str, message: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(message.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Constant-time string equality, resistant to timing side-channels.
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    use subtle::ConstantTimeEq;
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Recompute the expected signature and compare in constant time.
pub fn verify_signature(
    provided_sig: &str,
    secret: &str,
    method: &str,
    path: &str,
    timestamp: &str,
    nonce: &str,
    body: &[u8],
) -> bool {
    let canonical = canonical_string(method, path, timestamp, nonce, body);
    let expected = sign(secret, &canonical);
    constant_time_eq(provided_sig, &expected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_hex_empty_input() {
        // SHA-256 of the empty string
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_hmac_sha256_rfc4231_vector() {
        // RFC 4231 test case 2
        let sig = sign("Jefe", "what do ya want for nothing?");
        assert_eq!(
            sig,
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_canonical_string_layout() {
        let canonical = canonical_string("post", "/api/v1/merchant/payments", "1700000000", "n1", b"");
        assert_eq!(
            canonical,
            format!(
                "POST|/api/v1/merchant/payments|1700000000|n1|{}",
                sha256_hex(b"")
            )
        );
    }

    #[test]
    fn test_sign_verify_roundtrip() {
        let secret = "merchant-secret";
        let body = br#"{"amount":"10.00"}"#;
        let canonical = canonical_string("POST", "/pay", "1700000000", "n1", body);
        let sig = sign(secret, &canonical);

        assert!(verify_signature(&sig, secret, "POST", "/pay", "1700000000", "n1", body));
    }

    #[test]
    fn test_altering_any_field_invalidates() {
        let secret = "merchant-secret";
        let body = br#"{"amount":"10.00"}"#;
        let canonical = canonical_string("POST", "/pay", "1700000000", "n1", body);
        let sig = sign(secret, &canonical);

        assert!(!verify_signature(&sig, secret, "GET", "/pay", "1700000000", "n1", body));
        assert!(!verify_signature(&sig, secret, "POST", "/pay2", "1700000000", "n1", body));
        assert!(!verify_signature(&sig, secret, "POST", "/pay", "1700000001", "n1", body));
        assert!(!verify_signature(&sig, secret, "POST", "/pay", "1700000000", "n2", body));
        assert!(!verify_signature(&sig, secret, "POST", "/pay", "1700000000", "n1", b"{}"));
    }

    #[test]
    fn test_wrong_secret_invalidates() {
        let body = b"x";
        let canonical = canonical_string("POST", "/pay", "1700000000", "n1", body);
        let sig = sign("secret-a", &canonical);
        assert!(!verify_signature(&sig, "secret-b", "POST", "/pay", "1700000000", "n1", body));
    }

    #[test]
    fn test_hashed_secret_cannot_verify() {
        // Using a digest of the secret as the HMAC key never matches a
        // signature produced with the secret itself.
        let secret = "merchant-secret";
        let hashed = sha256_hex(secret.as_bytes());
        let canonical = canonical_string("POST", "/pay", "1700000000", "n1", b"");
        let sig = sign(secret, &canonical);
        assert!(!verify_signature(&sig, &hashed, "POST", "/pay", "1700000000", "n1", b""));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq("abc", "abc"));
        assert!(!constant_time_eq("abc", "abd"));
        assert!(!constant_time_eq("abc", "abcd"));
        assert!(constant_time_eq("", ""));
    }

    #[test]
    fn test_method_is_uppercased_lowercase_input_matches() {
        let secret = "s";
        let canonical = canonical_string("POST", "/p", "1", "n", b"");
        let sig = sign(secret, &canonical);
        assert!(verify_signature(&sig, secret, "post", "/p", "1", "n", b""));
    }
}
