//! AWS3-HTTPS request signing.
//!
//! Route 53 authenticates a request by an HMAC-SHA256 signature over the
//! request date, keyed with the account's secret access key. The date travels
//! in `x-amz-date` and the signature in `x-amzn-authorization`.

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Utc};
use ring::hmac;

pub const DATE_HEADER: &str = "x-amz-date";
pub const AUTHORIZATION_HEADER: &str = "x-amzn-authorization";

/// Access key pair used to sign requests.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl Credentials {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

/// Base64 of the HMAC-SHA256 of `text` keyed with `secret`.
pub fn sign_string(secret: &str, text: &str) -> String {
    let key = hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes());
    let tag = hmac::sign(&key, text.as_bytes());
    STANDARD.encode(tag.as_ref())
}

/// RFC 1123 date, e.g. `Thu, 14 Aug 2008 17:08:48 GMT`.
pub fn http_date(instant: DateTime<Utc>) -> String {
    instant.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

pub fn authorization_header(credentials: &Credentials, date: &str) -> String {
    format!(
        "AWS3-HTTPS AWSAccessKeyId={},Algorithm=HmacSHA256,Signature={}",
        credentials.access_key_id,
        sign_string(&credentials.secret_access_key, date)
    )
}
