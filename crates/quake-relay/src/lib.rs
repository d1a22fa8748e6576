//! Earthquake alert relay.
//!
//! Listens to the P2PQuake and early warning WebSocket feeds, decides which
//! messages deserve a bulletin, renders it, and posts it to X.
//!
//! ```text
//! FeedConnection ──► RelayHandler ──► Route ──► bulletin::render ──► Publisher
//! ```
//!
//! [`Supervisor`] runs one [`quake_feed::FeedConnection`] per configured
//! feed; [`health`] answers liveness probes.

pub mod config;
pub mod handler;
pub mod health;
pub mod router;
pub mod supervisor;

pub use config::{ConfigError, RelayConfig, EEW_FEED, P2PQUAKE_FEED};
pub use handler::{HandleOutcome, RelayHandler};
pub use router::{Route, RouteDecision, RouteError};
pub use supervisor::Supervisor;

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
