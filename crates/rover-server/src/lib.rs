//! Concurrent TCP server guiding remote robots to the origin of a 2D grid.
//!
//! Each accepted connection becomes an independent [`Session`]: a strict
//! request/response conversation that authenticates the robot with a keyed
//! hash handshake, steers it to `(0, 0)` around obstacles, and retrieves
//! the secret message it carries. Sessions tolerate mid-conversation
//! recharge pauses and segmented or coalesced reads.
//!
//! # Components
//!
//! - [`ServerConfig`]: key table, timeouts and budgets, shared read-only
//!   across sessions.
//! - [`transport`]: timed, framed reads with the recharge overlay, and
//!   terminator-appending writes.
//! - [`auth`]: the keyed hash handshake arithmetic.
//! - [`Navigator`]: infers the robot's pose from movement acknowledgements
//!   and plans axis-aligned motion with obstacle bypasses.
//! - [`Session`]: the per-connection protocol state machine.
//! - [`Server`]: the accept loop spawning one session task per connection.
//!
//! # Example
//!
//! ```no_run
//! use rover_server::{Server, ServerConfig};
//!
//! # async fn example() -> rover_core::Result<()> {
//! let server = Server::bind(ServerConfig::default()).await?;
//! server.run().await
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod navigator;
pub mod server;
pub mod session;
pub mod transport;

pub use config::ServerConfig;
pub use navigator::{Command, Navigator, Step};
pub use server::Server;
pub use session::{Phase, Session};
