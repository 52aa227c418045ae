//! Structural and temporal token inspection
//!
//! Tokens are never verified here. The claims segment is decoded only to
//! read an optional `exp`.

use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine as _,
};
use serde_json::Value;
use thiserror::Error;

const LENIENT: GeneralPurposeConfig = GeneralPurposeConfig::new()
    .with_decode_padding_mode(DecodePaddingMode::Indifferent)
    .with_decode_allow_trailing_bits(true);

const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);

/// Reasons a token fails inspection
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TokenError {
    #[error("token is empty")]
    Empty,

    #[error("token has {0} segments, expected 3")]
    SegmentCount(usize),

    #[error("token payload is unreadable: {0}")]
    Payload(String),

    #[error("token expired at {exp}, now {now}")]
    Expired { exp: f64, now: i64 },
}

impl TokenError {
    /// Whether this failure should purge the stored token
    pub fn purges(&self) -> bool {
        !matches!(self, Self::Empty)
    }
}

/// Claims read from the middle segment
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TokenClaims {
    /// Expiry in seconds since the epoch, when the payload carries a numeric `exp`
    pub exp: Option<f64>,
}

impl TokenClaims {
    fn from_value(value: &Value) -> Self {
        // Non-object payloads and non-numeric `exp` mean "expiry unknown".
        let exp = value
            .as_object()
            .and_then(|claims| claims.get("exp"))
            .and_then(Value::as_f64);
        Self { exp }
    }

    /// Whether the claims are expired at `now`
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.exp.is_some_and(|exp| exp < now as f64)
    }
}

/// Decode the claims segment of a three-part token
pub fn decode_claims(token: &str) -> Result<TokenClaims, TokenError> {
    if token.is_empty() {
        return Err(TokenError::Empty);
    }

    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(TokenError::SegmentCount(segments.len()));
    }

    let payload = segments[1];
    let bytes = STANDARD_LENIENT
        .decode(payload)
        .or_else(|_| URL_SAFE_LENIENT.decode(payload))
        .map_err(|e| TokenError::Payload(format!("base64: {e}")))?;

    let value: Value = serde_json::from_slice(&bytes)
        .map_err(|e| TokenError::Payload(format!("json: {e}")))?;

    Ok(TokenClaims::from_value(&value))
}

/// Inspect a token at the given Unix time
pub fn inspect(token: &str, now: i64) -> Result<TokenClaims, TokenError> {
    let claims = decode_claims(token)?;
    match claims.exp {
        Some(exp) if claims.is_expired_at(now) => Err(TokenError::Expired { exp, now }),
        _ => Ok(claims),
    }
}

/// Short, log-safe prefix of a token
pub fn redact(token: &str) -> String {
    let prefix: String = token.chars().take(12).collect();
    if prefix.len() < token.len() {
        format!("{prefix}...")
    } else {
        prefix
    }
}
