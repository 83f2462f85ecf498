//! Keyed hash handshake arithmetic.
//!
//! The robot's username is folded into a 16-bit hash; server and client
//! prove knowledge of their half of the selected key pair by offsetting
//! that hash modulo 2^16. All arithmetic is wrapping 16-bit.

use rover_core::KeyPair;
use rover_core::constants::HASH_MULTIPLIER;
use subtle::ConstantTimeEq;

/// Hash of a username: `(sum of byte values * 1000) mod 2^16`.
#[must_use]
pub fn username_hash(username: &str) -> u16 {
    let sum = username
        .bytes()
        .fold(0u16, |acc, byte| acc.wrapping_add(u16::from(byte)));
    sum.wrapping_mul(HASH_MULTIPLIER)
}

/// Confirmation number the server sends for the selected key pair.
#[must_use]
pub fn server_confirmation(hash: u16, key: &KeyPair) -> u16 {
    hash.wrapping_add(key.server_key)
}

/// Verify the confirmation number received from the robot.
///
/// The comparison is constant-time so the handshake leaks nothing about
/// how close a guess came.
#[must_use]
pub fn verify_client_confirmation(hash: u16, key: &KeyPair, confirmation: u16) -> bool {
    let expected = hash.wrapping_add(key.client_key);
    expected
        .to_be_bytes()
        .ct_eq(&confirmation.to_be_bytes())
        .into()
}
