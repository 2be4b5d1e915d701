//! Request signing for endpoints that need an API key.
//!
//! Codeforces authenticates a call with three extra parameters: `apiKey`,
//! `time` and `apiSig`. The signature is
//!
//! ```text
//! apiSig = nonce + hex(sha512("{nonce}/{method}?{sorted params}#{secret}"))
//! ```
//!
//! where the sorted parameters include `apiKey` and `time` and are rendered
//! exactly as they appear on the wire.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use sha2::{Digest, Sha512};
use uuid::Uuid;

/// Length of the random prefix of `apiSig`.
pub const NONCE_LEN: usize = 6;

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub key: String,
    pub secret: String,
}

impl Credentials {
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &self.key)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// A fresh nonce of `NONCE_LEN` lowercase hex characters.
pub fn nonce() -> String {
    let mut token = Uuid::new_v4().simple().to_string();
    token.truncate(NONCE_LEN);
    token
}

pub fn unix_time() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Sign `params` for `method_name` with a fresh nonce and the current time.
pub fn sign(method_name: &str, params: &mut Vec<(String, String)>, credentials: &Credentials) {
    sign_with(method_name, params, credentials, &nonce(), unix_time());
}

/// Append `apiKey`, `time` and `apiSig` to `params`.
///
/// Deterministic in its inputs. Existing parameters keep their order; the
/// three signed fields are appended after them.
pub fn sign_with(
    method_name: &str,
    params: &mut Vec<(String, String)>,
    credentials: &Credentials,
    nonce: &str,
    time: u64,
) {
    params.push(("apiKey".to_string(), credentials.key.clone()));
    params.push(("time".to_string(), time.to_string()));
    let signature = signature(method_name, params, &credentials.secret, nonce);
    params.push(("apiSig".to_string(), signature));
}

/// `nonce` followed by the lowercase hex SHA-512 of the signing string.
pub fn signature(method_name: &str, params: &[(String, String)], secret: &str, nonce: &str) -> String {
    let digest = Sha512::digest(signing_string(method_name, params, secret, nonce).as_bytes());
    format!("{nonce}{}", hex::encode(digest))
}

/// `{nonce}/{method}?{name=value&...}#{secret}`, parameters sorted by name then value.
pub fn signing_string(
    method_name: &str,
    params: &[(String, String)],
    secret: &str,
    nonce: &str,
) -> String {
    let mut sorted: Vec<&(String, String)> = params.iter().collect();
    sorted.sort();
    let query = sorted
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("&");
    format!("{nonce}/{method_name}?{query}#{secret}")
}
