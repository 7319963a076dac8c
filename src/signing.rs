//! Wizzio request signing.
//!
//! The Service authenticates a request with
//! `Authorization: WAP:<apiKey>:<base64(HMAC-SHA1(key, message))>` where
//! `key = lower(secret)` and `message = lower(secret + apiKey + DateTime)`.
//! The `DateTime` header carries the exact timestamp string that was signed.

use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, Local, TimeZone};
use hmac::{Hmac, Mac};
use sha1::Sha1;
use std::fmt::Display;

use crate::errors::ForwardError;
use crate::models::{Credentials, MappedLead, SignedRequest};

type HmacSha1 = Hmac<Sha1>;

/// `YYYY-MM-DD HH:MM:SS.ffffff`, microseconds zero-padded to 6 digits.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Formats an instant in the Service's `DateTime` layout.
pub fn format_timestamp<Tz>(instant: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    instant.format(TIMESTAMP_FORMAT).to_string()
}

/// Local wall-clock time in the `DateTime` layout.
pub fn current_timestamp() -> String {
    format_timestamp(&Local::now())
}

/// Standard base64 of the raw HMAC-SHA1 digest.
pub fn hmac_sha1_base64(key: &[u8], message: &[u8]) -> Result<String, ForwardError> {
    let mut mac = HmacSha1::new_from_slice(key)
        .map_err(|e| ForwardError::Internal(format!("Invalid HMAC key: {}", e)))?;
    mac.update(message);
    let digest = mac.finalize().into_bytes();

    Ok(general_purpose::STANDARD.encode(digest))
}

/// Signature for `credentials` at `timestamp`.
pub fn compute_signature(
    credentials: &Credentials,
    timestamp: &str,
) -> Result<String, ForwardError> {
    let key = credentials.api_secret.to_lowercase();
    let message = format!(
        "{}{}{}",
        credentials.api_secret, credentials.api_key, timestamp
    )
    .to_lowercase();

    hmac_sha1_base64(key.as_bytes(), message.as_bytes())
}

pub fn authorization_header(api_key: &str, signature: &str) -> String {
    format!("WAP:{}:{}", api_key, signature)
}

/// Signs `body` for the given timestamp.
pub fn sign(
    credentials: &Credentials,
    timestamp: String,
    body: MappedLead,
) -> Result<SignedRequest, ForwardError> {
    let signature = compute_signature(credentials, &timestamp)?;
    let authorization_header = authorization_header(&credentials.api_key, &signature);

    Ok(SignedRequest {
        api_key: credentials.api_key.clone(),
        timestamp,
        signature,
        authorization_header,
        body,
    })
}

/// Signs `body` at the current local time.
pub fn sign_now(
    credentials: &Credentials,
    body: MappedLead,
) -> Result<SignedRequest, ForwardError> {
    sign(credentials, current_timestamp(), body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn creds(key: &str, secret: &str) -> Credentials {
        Credentials::new(Some(key), Some(secret)).unwrap()
    }

    #[test]
    fn test_timestamp_layout() {
        let instant = NaiveDate::from_ymd_opt(2025, 3, 4)
            .unwrap()
            .and_hms_micro_opt(9, 5, 7, 42)
            .unwrap()
            .and_utc();

        assert_eq!(format_timestamp(&instant), "2025-03-04 09:05:07.000042");
    }

    #[test]
    fn test_timestamp_midnight() {
        let instant = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(format_timestamp(&instant), "2024-01-01 00:00:00.000000");
    }

    #[test]
    fn test_current_timestamp_shape() {
        let ts = current_timestamp();
        assert_eq!(ts.len(), 26);
        assert_eq!(&ts[10..11], " ");
        assert_eq!(&ts[19..20], ".");
        assert!(ts[20..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_hmac_sha1_known_vectors() {
        // RFC 2202 test case 2
        assert_eq!(
            hmac_sha1_base64(b"Jefe", b"what do ya want for nothing?").unwrap(),
            "7/zfauXrL6LSdBbV8YTfnCWafHk="
        );
        assert_eq!(
            hmac_sha1_base64(b"key", b"The quick brown fox jumps over the lazy dog").unwrap(),
            "3nybhbi3iqa8ino29wqQcBydtNk="
        );
    }

    #[test]
    fn test_signature_lowercases_key_and_message() {
        let signature = compute_signature(&creds("K", "S"), "2024-01-01 00:00:00.000000").unwrap();
        let expected = hmac_sha1_base64(b"s", b"sk2024-01-01 00:00:00.000000").unwrap();

        assert_eq!(signature, expected);
        assert_eq!(signature, "i7W+5hf2Rj3pDlzY9IPMkLx7yKg=");
    }

    #[test]
    fn test_signature_is_not_hex_encoded() {
        let signature = compute_signature(&creds("K", "S"), "2024-01-01 00:00:00.000000").unwrap();
        let decoded = general_purpose::STANDARD.decode(&signature).unwrap();

        assert_eq!(decoded.len(), 20);
    }

    #[test]
    fn test_sign_builds_authorization_header() {
        let signed = sign(
            &creds("MyKey", "MySecret"),
            "2025-03-14 09:26:53.589793".to_string(),
            MappedLead::new(),
        )
        .unwrap();

        assert_eq!(signed.api_key, "MyKey");
        assert_eq!(signed.timestamp, "2025-03-14 09:26:53.589793");
        assert_eq!(
            signed.authorization_header,
            format!("WAP:MyKey:{}", signed.signature)
        );
    }

    #[test]
    fn test_api_key_case_is_kept_in_header() {
        let signed = sign(
            &creds("AbC123", "MySecret"),
            "2025-03-14 09:26:53.589793".to_string(),
            MappedLead::new(),
        )
        .unwrap();

        assert_eq!(
            signed.authorization_header,
            "WAP:AbC123:+l4xKhkQ62O4lz6GBFv/GPw9iVA="
        );
    }
}
