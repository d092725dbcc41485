//! ngrok-api: Async client for the local ngrok agent API
//!
//! The agent exposes a small HTTP control API (by default on
//! `http://127.0.0.1:4040/`). This crate lists the active tunnels, fetches
//! or stops a tunnel by name, and picks a random tunnel by protocol.
//!
//! ```no_run
//! # async fn run() -> ngrok_api::Result<()> {
//! let session = ngrok_api::Session::new()?;
//! let tunnels = session.get_tunnels().await?;
//! let tunnel = tunnels.any_https_tunnel()?;
//! println!("{}", tunnel.public_url());
//! session.stop_tunnel(tunnel.name()).await?;
//! # Ok(())
//! # }
//! ```

pub mod collection;
pub mod config;
pub mod error;
pub mod observer;
pub mod session;
pub mod tunnel;

pub use collection::TunnelCollection;
pub use config::{SessionConfig, DEFAULT_API_URL};
pub use error::{NgrokError, Result, TunnelFieldError};
pub use observer::{NoopObserver, Observer, SharedObserver, TracingObserver};
pub use session::{join_url, Session, SessionBuilder};
pub use tunnel::{Tunnel, PROTO_HTTP, PROTO_HTTPS, PROTO_TCP};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
