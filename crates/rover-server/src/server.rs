//! TCP front-end: accept loop and session lifecycle.
//!
//! The front-end owns the listener exclusively and spawns one independent
//! [`Session`] task per accepted connection. Sessions share nothing but
//! the read-only configuration behind an `Arc`.
//!
//! # Shutdown
//!
//! [`Server::shutdown_token`] hands out a cancellation token; cancelling
//! it stops the accept loop, after which live sessions get
//! `shutdown_grace` to drain before the remaining tasks are aborted.
//! Sessions end quickly on their own anyway: the longest a quiet one can
//! linger is the recharge timeout.
//!
//! # Example
//!
//! ```no_run
//! use rover_server::{Server, ServerConfig};
//!
//! # async fn example() -> rover_core::Result<()> {
//! let server = Server::bind(ServerConfig::default()).await?;
//! println!("listening on {}", server.local_addr()?);
//! server.run().await
//! # }
//! ```

use crate::config::ServerConfig;
use crate::session::Session;
use rover_core::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Accepting front-end of the guidance server.
pub struct Server {
    listener: TcpListener,
    config: Arc<ServerConfig>,
    shutdown: CancellationToken,
    next_session_id: u64,
}

impl Server {
    /// Bind the listener at the configured address.
    ///
    /// # Errors
    /// Returns `Error::Io` if the address is in use or cannot be bound.
    pub async fn bind(config: ServerConfig) -> Result<Self> {
        let listener = TcpListener::bind(config.bind_addr).await?;
        info!("listening on {}", listener.local_addr()?);

        Ok(Self {
            listener,
            config: Arc::new(config),
            shutdown: CancellationToken::new(),
            next_session_id: 0,
        })
    }

    /// Actual bound address; useful for tests binding port 0.
    ///
    /// # Errors
    /// Returns `Error::Io` if the socket is gone.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Token that stops the accept loop when cancelled.
    #[must_use]
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Accept connections until cancelled, one session task each.
    ///
    /// # Errors
    /// Never returns an error today; the signature leaves room for fatal
    /// listener failures.
    pub async fn run(mut self) -> Result<()> {
        let mut sessions = JoinSet::new();

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        if let Err(e) = stream.set_nodelay(true) {
                            warn!("failed to set TCP_NODELAY for {peer}: {e}");
                        }

                        let id = self.next_session_id;
                        self.next_session_id += 1;
                        debug!(session = id, %peer, "connection accepted");

                        let session =
                            Session::new(stream, peer, Arc::clone(&self.config), id);
                        sessions.spawn(session.run());
                    }
                    Err(e) => {
                        // Transient accept failures (EMFILE, resets) must
                        // not take the listener down.
                        error!("accept failed: {e}");
                    }
                },
            }

            // Reap finished sessions so the set does not grow unbounded.
            while sessions.try_join_next().is_some() {}
        }

        info!(
            live_sessions = sessions.len(),
            "shutting down, draining sessions"
        );
        tokio::select! {
            _ = async {
                while sessions.join_next().await.is_some() {}
            } => {}
            _ = tokio::time::sleep(self.config.shutdown_grace) => {
                warn!(aborted = sessions.len(), "grace period over, aborting sessions");
                sessions.abort_all();
            }
        }

        Ok(())
    }
}
