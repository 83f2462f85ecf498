//! Per-connection protocol state machine.
//!
//! A session is one complete conversation with one robot: authentication
//! handshake, navigation to the origin, secret retrieval, logout. The
//! conversation is strictly request/response; the recharge overlay and
//! both timeout regimes live in the transport reader underneath.
//!
//! # Phases
//!
//! ```text
//! AwaitingUsername -> AwaitingKeyId -> AwaitingClientConfirm
//!        -> Navigating -> AwaitingSecret -> Terminated
//! ```
//!
//! Transitions are one-directional and `Terminated` is absorbing. Any
//! error ends the session: protocol violations are answered with the
//! mapped error response first, timeouts and exhaustion close silently.

use crate::auth;
use crate::config::ServerConfig;
use crate::navigator::{Navigator, Step};
use crate::transport::{MessageReader, MessageWriter};
use chrono::Utc;
use rover_core::{Error, Result};
use rover_protocol::{
    ClientCommandKind, ServerMessage, match_confirmation, match_key_id, match_ok, match_secret,
    match_username,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

/// Conversation phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingUsername,
    AwaitingKeyId,
    AwaitingClientConfirm,
    Navigating,
    AwaitingSecret,
    Terminated,
}

/// One robot conversation over one TCP connection.
pub struct Session {
    id: u64,
    peer: SocketAddr,
    phase: Phase,
    reader: MessageReader,
    writer: MessageWriter,
    config: Arc<ServerConfig>,
}

impl Session {
    pub fn new(stream: TcpStream, peer: SocketAddr, config: Arc<ServerConfig>, id: u64) -> Self {
        let (read_half, write_half) = stream.into_split();
        let reader = MessageReader::new(
            read_half,
            &config.terminator,
            config.read_timeout,
            config.recharge_timeout,
        );
        let writer = MessageWriter::new(write_half, &config.terminator);
        Self {
            id,
            peer,
            phase: Phase::AwaitingUsername,
            reader,
            writer,
            config,
        }
    }

    /// Run the conversation to completion and close the transport.
    pub async fn run(mut self) {
        let started_at = Utc::now();
        info!(session = self.id, peer = %self.peer, "session started");

        match self.conversation().await {
            Ok(()) => {
                info!(
                    session = self.id,
                    uptime_ms = (Utc::now() - started_at).num_milliseconds(),
                    "session completed"
                );
            }
            Err(error) => {
                warn!(
                    session = self.id,
                    phase = ?self.phase,
                    %error,
                    "session failed"
                );
                if let Some(response) = error_response(&error) {
                    // Best effort: the peer may already be gone.
                    let _ = self.writer.send(response).await;
                }
            }
        }

        self.phase = Phase::Terminated;
        self.writer.close().await;
    }

    async fn conversation(&mut self) -> Result<()> {
        self.authenticate().await?;
        self.navigate().await?;
        self.retrieve_secret().await
    }

    /// Username, key id and confirmation exchange.
    async fn authenticate(&mut self) -> Result<()> {
        let payload = self
            .reader
            .read_message(ClientCommandKind::Username.max_len())
            .await?;
        let username = match_username(&payload)?;
        debug!(session = self.id, %username, "username received");
        self.writer.send(ServerMessage::KeyRequest).await?;

        self.phase = Phase::AwaitingKeyId;
        let payload = self
            .reader
            .read_message(ClientCommandKind::KeyId.max_len())
            .await?;
        let key_id = match_key_id(&payload)?;
        let key = self
            .config
            .keys
            .get(usize::from(key_id))
            .ok_or(Error::KeyOutOfRange {
                key_id: i64::from(key_id),
            })?;

        let hash = auth::username_hash(&username);
        self.writer
            .send(ServerMessage::Confirmation(auth::server_confirmation(
                hash, key,
            )))
            .await?;

        self.phase = Phase::AwaitingClientConfirm;
        let payload = self
            .reader
            .read_message(ClientCommandKind::Confirmation.max_len())
            .await?;
        let confirmation = match_confirmation(&payload)?;
        if !auth::verify_client_confirmation(hash, key, confirmation) {
            return Err(Error::LoginFailed);
        }

        info!(session = self.id, %username, key_id, "authenticated");
        self.writer.send(ServerMessage::Ok).await
    }

    /// Drive the robot to the origin, one command per acknowledgement.
    async fn navigate(&mut self) -> Result<()> {
        self.phase = Phase::Navigating;
        let mut navigator = Navigator::new(self.config.max_steps, self.config.max_obstacle_hits);

        let mut command = navigator.first_command();
        loop {
            self.writer.send(command.into()).await?;

            let payload = self.reader.read_message(ClientCommandKind::Ok.max_len()).await?;
            let coords = match_ok(&payload)?;
            debug!(session = self.id, %coords, "position reported");

            match navigator.observe(coords)? {
                Step::Command(next) => command = next,
                Step::Arrived => {
                    info!(
                        session = self.id,
                        steps_remaining = navigator.steps_remaining(),
                        obstacle_hits = navigator.obstacle_hits(),
                        "robot reached the origin"
                    );
                    return Ok(());
                }
            }
        }
    }

    /// Pick up the secret and log the robot out.
    async fn retrieve_secret(&mut self) -> Result<()> {
        self.phase = Phase::AwaitingSecret;
        self.writer.send(ServerMessage::PickUp).await?;

        let payload = self
            .reader
            .read_message(ClientCommandKind::Secret.max_len())
            .await?;
        let secret = match_secret(&payload)?;
        debug!(session = self.id, %secret, "secret message received");

        self.writer.send(ServerMessage::Logout).await
    }
}

/// Wire response owed for an error, if the taxonomy defines one.
///
/// Timeouts, exhaustion and transport failures terminate silently.
fn error_response(error: &Error) -> Option<ServerMessage> {
    match error {
        Error::Syntax { .. } => Some(ServerMessage::SyntaxError),
        Error::KeyOutOfRange { .. } => Some(ServerMessage::KeyOutOfRange),
        Error::LoginFailed => Some(ServerMessage::LoginFailed),
        Error::Logic { .. } => Some(ServerMessage::LogicError),
        Error::Timeout(_)
        | Error::Closed
        | Error::OutOfSteps
        | Error::ObstacleLimit { .. }
        | Error::Io(_) => None,
    }
}
