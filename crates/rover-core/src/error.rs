use std::time::Duration;
use thiserror::Error;

/// Session-level error taxonomy.
///
/// The session controller maps a subset of these to wire responses
/// (`301 SYNTAX ERROR`, `303 KEY OUT OF RANGE`, `300 LOGIN FAILED`,
/// `302 LOGIC ERROR`); everything else terminates the session silently.
#[derive(Error, Debug)]
pub enum Error {
    // Protocol errors
    #[error("malformed message: {message}")]
    Syntax { message: String },

    #[error("key id {key_id} is outside the key table")]
    KeyOutOfRange { key_id: i64 },

    #[error("client confirmation does not match")]
    LoginFailed,

    #[error("recharge protocol violation: {message}")]
    Logic { message: String },

    // Session termination without a response
    #[error("read timed out after {0:?}")]
    Timeout(Duration),

    #[error("connection closed by peer")]
    Closed,

    #[error("step budget exhausted before reaching the origin")]
    OutOfSteps,

    #[error("obstacle limit exceeded after {hits} failed moves")]
    ObstacleLimit { hits: u32 },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for a `Syntax` error with a formatted message.
    pub fn syntax(message: impl Into<String>) -> Self {
        Error::Syntax {
            message: message.into(),
        }
    }

    /// Shorthand for a `Logic` error with a formatted message.
    pub fn logic(message: impl Into<String>) -> Self {
        Error::Logic {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
