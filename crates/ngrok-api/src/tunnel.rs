//! Tunnel value type

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TunnelFieldError;

/// Protocol tag of plain HTTP tunnels
pub const PROTO_HTTP: &str = "http";
/// Protocol tag of TLS-terminated HTTP tunnels
pub const PROTO_HTTPS: &str = "https";
/// Protocol tag of raw TCP tunnels
pub const PROTO_TCP: &str = "tcp";

/// A single tunnel as reported by the agent API
///
/// Values only come into existence through [`Tunnel::new`] or deserialization,
/// and both reject missing or empty fields. Fields are read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "TunnelRecord", into = "TunnelRecord")]
pub struct Tunnel {
    name: String,
    uri: String,
    proto: String,
    public_url: String,
}

/// Wire shape of a tunnel object
///
/// Unknown keys sent by the agent (`ID`, `config`, `metrics`, ...) are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TunnelRecord {
    name: String,
    uri: String,
    proto: String,
    public_url: String,
}

impl Tunnel {
    /// Create a tunnel, rejecting empty fields
    pub fn new(
        name: impl Into<String>,
        uri: impl Into<String>,
        proto: impl Into<String>,
        public_url: impl Into<String>,
    ) -> Result<Self, TunnelFieldError> {
        let tunnel = Self {
            name: name.into(),
            uri: uri.into(),
            proto: proto.into(),
            public_url: public_url.into(),
        };

        for (field, value) in [
            ("name", &tunnel.name),
            ("uri", &tunnel.uri),
            ("proto", &tunnel.proto),
            ("public_url", &tunnel.public_url),
        ] {
            if value.is_empty() {
                return Err(TunnelFieldError::Empty(field));
            }
        }

        Ok(tunnel)
    }

    /// Name assigned by the agent
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Relative API resource path
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Protocol tag, e.g. "http", "https" or "tcp"
    pub fn proto(&self) -> &str {
        &self.proto
    }

    /// Externally reachable address
    pub fn public_url(&self) -> &str {
        &self.public_url
    }
}

impl fmt::Display for Tunnel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.name, self.public_url)
    }
}

impl TryFrom<TunnelRecord> for Tunnel {
    type Error = TunnelFieldError;

    fn try_from(record: TunnelRecord) -> Result<Self, Self::Error> {
        Tunnel::new(record.name, record.uri, record.proto, record.public_url)
    }
}

impl From<Tunnel> for TunnelRecord {
    fn from(tunnel: Tunnel) -> Self {
        Self {
            name: tunnel.name,
            uri: tunnel.uri,
            proto: tunnel.proto,
            public_url: tunnel.public_url,
        }
    }
}
