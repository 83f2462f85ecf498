//! Message catalogs for both directions of the guidance protocol.
//!
//! Server messages are fixed texts (plus the numeric handshake
//! confirmation); client messages are described by their kind and maximum
//! payload length, which drives the framer's oversize rejection.
//!
//! # Wire Format
//!
//! Every message is ASCII text followed by the two-byte terminator
//! `\x07\x08`. Lengths quoted below exclude the terminator.
//!
//! ```text
//! server: 107 KEY REQUEST\x07\x08
//! client: Oompa Loompa\x07\x08
//! ```

use bytes::{BufMut, Bytes, BytesMut};
use rover_core::constants::{
    FULL_POWER, MAX_CONFIRMATION_LEN, MAX_KEY_ID_LEN, MAX_OK_LEN, MAX_SECRET_LEN,
    MAX_USERNAME_LEN, RECHARGING,
};
use std::fmt;

/// Messages the server can send to a robot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerMessage {
    /// Handshake confirmation number, sent as bare decimal digits.
    Confirmation(u16),
    /// `102 MOVE`: advance one cell.
    Move,
    /// `103 TURN LEFT`: rotate 90° left.
    TurnLeft,
    /// `104 TURN RIGHT`: rotate 90° right.
    TurnRight,
    /// `105 GET MESSAGE`: pick up the secret.
    PickUp,
    /// `106 LOGOUT`: end of session.
    Logout,
    /// `107 KEY REQUEST`: ask for the Key ID.
    KeyRequest,
    /// `200 OK`: authentication succeeded.
    Ok,
    /// `300 LOGIN FAILED`
    LoginFailed,
    /// `301 SYNTAX ERROR`
    SyntaxError,
    /// `302 LOGIC ERROR`
    LogicError,
    /// `303 KEY OUT OF RANGE`
    KeyOutOfRange,
}

impl ServerMessage {
    /// Wire text of this message, without the terminator.
    #[must_use]
    pub fn wire_text(&self) -> String {
        match self {
            ServerMessage::Confirmation(number) => number.to_string(),
            ServerMessage::Move => "102 MOVE".to_string(),
            ServerMessage::TurnLeft => "103 TURN LEFT".to_string(),
            ServerMessage::TurnRight => "104 TURN RIGHT".to_string(),
            ServerMessage::PickUp => "105 GET MESSAGE".to_string(),
            ServerMessage::Logout => "106 LOGOUT".to_string(),
            ServerMessage::KeyRequest => "107 KEY REQUEST".to_string(),
            ServerMessage::Ok => "200 OK".to_string(),
            ServerMessage::LoginFailed => "300 LOGIN FAILED".to_string(),
            ServerMessage::SyntaxError => "301 SYNTAX ERROR".to_string(),
            ServerMessage::LogicError => "302 LOGIC ERROR".to_string(),
            ServerMessage::KeyOutOfRange => "303 KEY OUT OF RANGE".to_string(),
        }
    }

    /// Encode the message with the given terminator appended.
    #[must_use]
    pub fn encode(&self, terminator: &[u8]) -> Bytes {
        let text = self.wire_text();
        let mut buf = BytesMut::with_capacity(text.len() + terminator.len());
        buf.put_slice(text.as_bytes());
        buf.put_slice(terminator);
        buf.freeze()
    }
}

impl fmt::Display for ServerMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.wire_text())
    }
}

/// Kinds of client message the server may expect at a receive point.
///
/// Each kind carries the maximum payload length (excluding the terminator)
/// the protocol admits for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCommandKind {
    Username,
    KeyId,
    Confirmation,
    Ok,
    Recharging,
    FullPower,
    Secret,
}

impl ClientCommandKind {
    /// Maximum payload length of this kind, excluding the terminator.
    #[must_use]
    pub fn max_len(self) -> usize {
        match self {
            ClientCommandKind::Username => MAX_USERNAME_LEN,
            ClientCommandKind::KeyId => MAX_KEY_ID_LEN,
            ClientCommandKind::Confirmation => MAX_CONFIRMATION_LEN,
            ClientCommandKind::Ok => MAX_OK_LEN,
            ClientCommandKind::Recharging => RECHARGING.len(),
            ClientCommandKind::FullPower => FULL_POWER.len(),
            ClientCommandKind::Secret => MAX_SECRET_LEN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rover_core::constants::TERMINATOR;

    #[test]
    fn wire_texts_match_catalog() {
        assert_eq!(ServerMessage::Move.wire_text(), "102 MOVE");
        assert_eq!(ServerMessage::TurnLeft.wire_text(), "103 TURN LEFT");
        assert_eq!(ServerMessage::TurnRight.wire_text(), "104 TURN RIGHT");
        assert_eq!(ServerMessage::PickUp.wire_text(), "105 GET MESSAGE");
        assert_eq!(ServerMessage::Logout.wire_text(), "106 LOGOUT");
        assert_eq!(ServerMessage::KeyRequest.wire_text(), "107 KEY REQUEST");
        assert_eq!(ServerMessage::Ok.wire_text(), "200 OK");
        assert_eq!(ServerMessage::LoginFailed.wire_text(), "300 LOGIN FAILED");
        assert_eq!(ServerMessage::SyntaxError.wire_text(), "301 SYNTAX ERROR");
        assert_eq!(ServerMessage::LogicError.wire_text(), "302 LOGIC ERROR");
        assert_eq!(
            ServerMessage::KeyOutOfRange.wire_text(),
            "303 KEY OUT OF RANGE"
        );
    }

    #[test]
    fn confirmation_is_bare_digits() {
        assert_eq!(ServerMessage::Confirmation(13035).wire_text(), "13035");
        assert_eq!(ServerMessage::Confirmation(0).wire_text(), "0");
    }

    #[test]
    fn encode_appends_terminator() {
        let encoded = ServerMessage::Move.encode(TERMINATOR);
        assert_eq!(&encoded[..], b"102 MOVE\x07\x08");
    }

    #[test]
    fn max_lengths_match_protocol() {
        assert_eq!(ClientCommandKind::Username.max_len(), 18);
        assert_eq!(ClientCommandKind::KeyId.max_len(), 3);
        assert_eq!(ClientCommandKind::Confirmation.max_len(), 5);
        assert_eq!(ClientCommandKind::Ok.max_len(), 10);
        assert_eq!(ClientCommandKind::Recharging.max_len(), 10);
        assert_eq!(ClientCommandKind::FullPower.max_len(), 10);
        assert_eq!(ClientCommandKind::Secret.max_len(), 98);
    }
}
