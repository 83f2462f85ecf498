//! Server configuration.
//!
//! The configuration is materialized once by the embedder and shared
//! read-only by every session; loading it from a file or the command line
//! is the embedder's concern.

use rover_core::KeyPair;
use rover_core::constants::{
    DEFAULT_MAX_OBSTACLE_HITS, DEFAULT_MAX_STEPS, DEFAULT_PORT, DEFAULT_READ_TIMEOUT,
    DEFAULT_RECHARGE_TIMEOUT, DEFAULT_SHUTDOWN_GRACE, TERMINATOR,
};
use std::net::SocketAddr;
use std::time::Duration;

/// Configuration for the guidance server.
///
/// # Example
///
/// ```
/// use rover_server::ServerConfig;
///
/// let config = ServerConfig {
///     bind_addr: "127.0.0.1:0".parse().unwrap(),
///     ..ServerConfig::default()
/// };
/// assert_eq!(config.keys.len(), 5);
/// ```
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the listener to.
    pub bind_addr: SocketAddr,

    /// Byte sequence ending every protocol message.
    pub terminator: Vec<u8>,

    /// Authentication key table; the index is the Key ID.
    pub keys: Vec<KeyPair>,

    /// Inactivity bound for any single read while not recharging.
    pub read_timeout: Duration,

    /// Bound between `RECHARGING` and `FULL POWER`.
    pub recharge_timeout: Duration,

    /// Successful forward moves a robot may spend in one session.
    pub max_steps: u32,

    /// Failed forward moves tolerated before the session is dropped.
    pub max_obstacle_hits: u32,

    /// Time live sessions get to drain when the server shuts down.
    pub shutdown_grace: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            terminator: TERMINATOR.to_vec(),
            keys: vec![
                KeyPair::new(23019, 32037),
                KeyPair::new(32037, 29295),
                KeyPair::new(18789, 13603),
                KeyPair::new(16443, 29533),
                KeyPair::new(18189, 21952),
            ],
            read_timeout: DEFAULT_READ_TIMEOUT,
            recharge_timeout: DEFAULT_RECHARGE_TIMEOUT,
            max_steps: DEFAULT_MAX_STEPS,
            max_obstacle_hits: DEFAULT_MAX_OBSTACLE_HITS,
            shutdown_grace: DEFAULT_SHUTDOWN_GRACE,
        }
    }
}
