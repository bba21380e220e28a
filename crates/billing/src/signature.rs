//! Webhook signature verification.
//!
//! The provider signs each delivery with a header of the form
//! `t=<unix-seconds>,v1=<hex hmac>[,v1=...]` where the HMAC-SHA256 is
//! computed over `"{t}.{raw body}"` with the endpoint's shared secret.
//! Verification is constant-work over all presented `v1` candidates and
//! enforces a timestamp tolerance against replay.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Maximum accepted age (or clock skew) of a signed delivery, in seconds.
pub const DEFAULT_TOLERANCE_SECS: i64 = 300;

/// Why a signature header was rejected.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    #[error("signature header is malformed")]
    Malformed,

    #[error("signature timestamp outside tolerance")]
    TimestampOutOfTolerance,

    #[error("no signature matched the payload")]
    NoMatch,
}

/// Parsed form of the signature header.
#[derive(Debug, PartialEq, Eq)]
pub struct SignatureHeader {
    pub timestamp: i64,
    pub signatures: Vec<String>,
}

/// Parse a `t=...,v1=...` signature header.
///
/// Unknown schemes (`v0=` etc.) are ignored; the header is malformed when
/// the timestamp or every `v1` entry is missing.
pub fn parse_signature_header(header: &str) -> Result<SignatureHeader, SignatureError> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        let Some((key, value)) = part.trim().split_once('=') else {
            continue;
        };
        match key {
            "t" => timestamp = value.parse::<i64>().ok(),
            "v1" => signatures.push(value.to_string()),
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or(SignatureError::Malformed)?;
    if signatures.is_empty() {
        return Err(SignatureError::Malformed);
    }

    Ok(SignatureHeader {
        timestamp,
        signatures,
    })
}

/// Compute the expected hex signature for a payload at a given timestamp.
pub fn compute_signature(secret: &str, timestamp: i64, payload: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(format!("{timestamp}.{payload}").as_bytes());
    hex_encode(&mac.finalize().into_bytes())
}

/// Verify a signature header against the raw request body.
///
/// `now` is passed in (rather than read from the clock) so verification is
/// a pure function; callers supply `Utc::now().timestamp()`.
pub fn verify_signature(
    payload: &str,
    header: &str,
    secret: &str,
    tolerance_secs: i64,
    now: i64,
) -> Result<(), SignatureError> {
    let parsed = parse_signature_header(header)?;

    if (now - parsed.timestamp).abs() > tolerance_secs {
        return Err(SignatureError::TimestampOutOfTolerance);
    }

    let expected = compute_signature(secret, parsed.timestamp, payload);
    if parsed
        .signatures
        .iter()
        .any(|candidate| constant_time_eq(candidate, &expected))
    {
        Ok(())
    } else {
        Err(SignatureError::NoMatch)
    }
}

/// Compare two hex strings without short-circuiting on the first mismatch.
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes().zip(b.bytes()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Encode bytes as a lowercase hex string.
fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
