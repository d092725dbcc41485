//! Session configuration

pub mod serde_utils;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

use self::serde_utils::option_duration_secs;

/// Default address of the local agent API
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:4040/";

/// Settings recognized when building a [`Session`](crate::Session)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Base URL of the agent API, with or without a trailing slash
    pub api_url: String,

    /// Total time allowed for a request (no limit when unset)
    #[serde(with = "option_duration_secs", skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Duration>,

    /// Time allowed to establish the connection (no limit when unset)
    #[serde(with = "option_duration_secs", skip_serializing_if = "Option::is_none")]
    pub connect_timeout: Option<Duration>,

    /// Request headers; replaces the default `Content-Type: application/json`
    /// set when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: None,
            connect_timeout: None,
            headers: None,
        }
    }
}
