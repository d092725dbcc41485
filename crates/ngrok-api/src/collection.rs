//! Ordered collection of tunnels with protocol-based selection

use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;

use crate::error::{NgrokError, Result};
use crate::observer::{self, SharedObserver};
use crate::tunnel::{Tunnel, PROTO_HTTP, PROTO_HTTPS};

/// Tunnels returned by a single listing call, in server order
#[derive(Clone)]
pub struct TunnelCollection {
    tunnels: Vec<Tunnel>,
    observer: SharedObserver,
}

impl TunnelCollection {
    /// Create a collection that reports nothing
    pub fn new(tunnels: Vec<Tunnel>) -> Self {
        Self {
            tunnels,
            observer: observer::noop(),
        }
    }

    /// Attach an observer for selection events
    pub fn with_observer(mut self, observer: SharedObserver) -> Self {
        self.observer = observer;
        self
    }

    /// Number of tunnels
    pub fn len(&self) -> usize {
        self.tunnels.len()
    }

    /// Check if the collection is empty
    pub fn is_empty(&self) -> bool {
        self.tunnels.is_empty()
    }

    /// Iterate in server order
    pub fn iter(&self) -> std::slice::Iter<'_, Tunnel> {
        self.tunnels.iter()
    }

    /// Tunnel at a position
    pub fn get(&self, index: usize) -> Option<&Tunnel> {
        self.tunnels.get(index)
    }

    /// Look up a tunnel by name
    pub fn find(&self, name: &str) -> Option<&Tunnel> {
        self.tunnels.iter().find(|t| t.name() == name)
    }

    pub fn as_slice(&self) -> &[Tunnel] {
        &self.tunnels
    }

    pub fn into_vec(self) -> Vec<Tunnel> {
        self.tunnels
    }

    /// Pick a random tunnel with the given protocol
    ///
    /// Every matching tunnel is equally likely, so callers cannot come to
    /// depend on the order the agent happens to list tunnels in. The stored
    /// order is left untouched.
    pub fn any_tunnel(&self, proto: &str) -> Result<&Tunnel> {
        self.any_tunnel_with_rng(proto, &mut rand::thread_rng())
    }

    /// Same as [`any_tunnel`](Self::any_tunnel) with a caller-provided RNG
    pub fn any_tunnel_with_rng<R: Rng + ?Sized>(
        &self,
        proto: &str,
        rng: &mut R,
    ) -> Result<&Tunnel> {
        let matches: Vec<&Tunnel> = self
            .tunnels
            .iter()
            .filter(|t| t.proto() == proto)
            .collect();

        match matches.choose(rng) {
            Some(tunnel) => {
                self.observer
                    .debug(&format!("tunnel with proto {} found: {}", proto, tunnel));
                Ok(*tunnel)
            }
            None => {
                let err = NgrokError::TunnelNotFound {
                    proto: proto.to_string(),
                };
                self.observer.warn(&err.to_string());
                Err(err)
            }
        }
    }

    /// Any available HTTP tunnel
    pub fn any_http_tunnel(&self) -> Result<&Tunnel> {
        self.any_tunnel(PROTO_HTTP)
    }

    /// Any available HTTPS tunnel
    pub fn any_https_tunnel(&self) -> Result<&Tunnel> {
        self.any_tunnel(PROTO_HTTPS)
    }
}

impl fmt::Debug for TunnelCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TunnelCollection")
            .field("tunnels", &self.tunnels)
            .finish_non_exhaustive()
    }
}

impl PartialEq for TunnelCollection {
    fn eq(&self, other: &Self) -> bool {
        self.tunnels == other.tunnels
    }
}

impl From<Vec<Tunnel>> for TunnelCollection {
    fn from(tunnels: Vec<Tunnel>) -> Self {
        Self::new(tunnels)
    }
}

impl FromIterator<Tunnel> for TunnelCollection {
    fn from_iter<I: IntoIterator<Item = Tunnel>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for TunnelCollection {
    type Item = Tunnel;
    type IntoIter = std::vec::IntoIter<Tunnel>;

    fn into_iter(self) -> Self::IntoIter {
        self.tunnels.into_iter()
    }
}

impl<'a> IntoIterator for &'a TunnelCollection {
    type Item = &'a Tunnel;
    type IntoIter = std::slice::Iter<'a, Tunnel>;

    fn into_iter(self) -> Self::IntoIter {
        self.tunnels.iter()
    }
}
