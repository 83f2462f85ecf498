//! Validators decoding client payloads into typed values.
//!
//! Each function takes a terminator-stripped payload and either returns the
//! decoded value or the error the session must answer with. Payloads must
//! be 7-bit ASCII; anything else is a syntax error.
//!
//! The numeric messages accept an optional leading sign, and out-of-range
//! values are deliberately *not* syntax errors: a well-formed key id
//! outside `[0, 999]` is `KeyOutOfRange`, and a well-formed confirmation
//! outside `[0, 65535]` is `LoginFailed`, so that `-1` as a key id draws
//! `303 KEY OUT OF RANGE` rather than `301 SYNTAX ERROR`.

use rover_core::constants::{
    FULL_POWER, MAX_CONFIRMATION_LEN, MAX_CONFIRMATION_VALUE, MAX_KEY_ID_LEN, MAX_KEY_ID_VALUE,
    MAX_OK_LEN, MAX_SECRET_LEN, MAX_USERNAME_LEN, OK_PREFIX, RECHARGING,
};
use rover_core::{Coords, Error, Result};

/// Returns `true` if the payload is the exact `RECHARGING` literal.
#[must_use]
pub fn is_recharging(payload: &[u8]) -> bool {
    payload == RECHARGING.as_bytes()
}

/// Returns `true` if the payload is the exact `FULL POWER` literal.
#[must_use]
pub fn is_full_power(payload: &[u8]) -> bool {
    payload == FULL_POWER.as_bytes()
}

/// Decode a username: non-empty ASCII, at most 18 bytes.
pub fn match_username(payload: &[u8]) -> Result<String> {
    let text = decode_ascii(payload)?;
    if text.is_empty() || text.len() > MAX_USERNAME_LEN {
        return Err(Error::syntax(format!(
            "invalid username length: {}",
            text.len()
        )));
    }
    Ok(text.to_string())
}

/// Decode a key id.
///
/// # Errors
/// `Syntax` for non-integer or overlong input; `KeyOutOfRange` for a
/// well-formed integer outside `[0, 999]`. Membership in the configured
/// key table is checked by the caller.
pub fn match_key_id(payload: &[u8]) -> Result<u16> {
    let text = decode_ascii(payload)?;
    if text.is_empty() || text.len() > MAX_KEY_ID_LEN {
        return Err(Error::syntax(format!("invalid key id: {text:?}")));
    }
    let value = parse_int(text)?;
    if !(0..=MAX_KEY_ID_VALUE).contains(&value) {
        return Err(Error::KeyOutOfRange { key_id: value });
    }
    Ok(value as u16)
}

/// Decode a client confirmation number.
///
/// # Errors
/// `Syntax` for non-integer or overlong input; `LoginFailed` for a
/// well-formed integer outside `[0, 65535]`, which can never match any
/// expected confirmation.
pub fn match_confirmation(payload: &[u8]) -> Result<u16> {
    let text = decode_ascii(payload)?;
    if text.is_empty() || text.len() > MAX_CONFIRMATION_LEN {
        return Err(Error::syntax(format!("invalid confirmation: {text:?}")));
    }
    let value = parse_int(text)?;
    if !(0..=MAX_CONFIRMATION_VALUE).contains(&value) {
        return Err(Error::LoginFailed);
    }
    Ok(value as u16)
}

/// Decode a movement acknowledgement `OK <x> <y>`.
pub fn match_ok(payload: &[u8]) -> Result<Coords> {
    let text = decode_ascii(payload)?;
    if text.len() > MAX_OK_LEN {
        return Err(Error::syntax(format!("oversize OK message: {text:?}")));
    }
    let rest = text
        .strip_prefix(OK_PREFIX)
        .ok_or_else(|| Error::syntax(format!("not an OK message: {text:?}")))?;

    let mut parts = rest.split(' ');
    let (Some(x), Some(y), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(Error::syntax(format!("malformed OK message: {text:?}")));
    };

    let x = parse_int(x)?;
    let y = parse_int(y)?;
    Ok(Coords::new(x as i32, y as i32))
}

/// Decode the secret message: non-empty ASCII, at most 98 bytes.
pub fn match_secret(payload: &[u8]) -> Result<String> {
    let text = decode_ascii(payload)?;
    if text.is_empty() || text.len() > MAX_SECRET_LEN {
        return Err(Error::syntax(format!(
            "invalid secret message length: {}",
            text.len()
        )));
    }
    Ok(text.to_string())
}

/// Decode a payload as 7-bit ASCII text.
fn decode_ascii(payload: &[u8]) -> Result<&str> {
    if !payload.is_ascii() {
        return Err(Error::syntax("payload is not 7-bit ASCII"));
    }
    // ASCII is valid UTF-8.
    std::str::from_utf8(payload).map_err(|_| Error::syntax("payload is not valid text"))
}

/// Parse a decimal integer with an optional leading sign.
///
/// Rust's integer grammar matches the protocol's: optional `+`/`-`
/// followed by one or more digits, leading zeros allowed.
fn parse_int(text: &str) -> Result<i64> {
    text.parse::<i64>()
        .map_err(|_| Error::syntax(format!("not an integer: {text:?}")))
}
