//! Session against the local agent API
//!
//! A [`Session`] owns one pooled HTTP client bound to the agent's base URL.
//! Every operation issues exactly one request, reads the full response and
//! maps it either to typed values or to an [`NgrokError`]:
//!
//! - root info and tunnel listing failures carry a generic message, since
//!   the agent does not guarantee an error body there
//! - failures on a named tunnel carry the `msg` field of the error body
//!
//! Dropping the session (or calling [`Session::close`]) releases the pool
//! and abandons any call still in flight.

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::collection::TunnelCollection;
use crate::config::{SessionConfig, DEFAULT_API_URL};
use crate::error::{NgrokError, Result};
use crate::observer::{self, Observer, SharedObserver};
use crate::tunnel::Tunnel;

const ROOT_PATH: &str = "api";
const TUNNELS_PATH: &str = "api/tunnels";

/// Join a base URL and a relative path with exactly one slash between them
///
/// One trailing slash is stripped from `base`, one leading and one trailing
/// slash from `path`.
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.strip_suffix('/').unwrap_or(base);
    let path = path.strip_prefix('/').unwrap_or(path);
    let path = path.strip_suffix('/').unwrap_or(path);
    format!("{}/{}", base, path)
}

/// Headers sent when none are configured
pub fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers
}

/// Listing body returned by `GET /api/tunnels`
#[derive(Debug, Deserialize)]
struct TunnelList {
    tunnels: Vec<Tunnel>,
}

/// Error body returned by per-tunnel endpoints
#[derive(Debug, Deserialize)]
struct ErrorBody {
    msg: String,
}

/// A completed request/response exchange
struct Exchange {
    status: StatusCode,
    body: Bytes,
}

/// Client session for the agent API
pub struct Session {
    client: Client,
    api_url: String,
    observer: SharedObserver,
    cancel: CancellationToken,
}

impl Session {
    /// Create a session against the default local address
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Start configuring a session
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Create a session from a configuration value
    pub fn from_config(config: &SessionConfig) -> Result<Self> {
        SessionBuilder::from_config(config).build()
    }

    /// Base URL this session talks to
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Token that aborts every pending and future call of this session
    ///
    /// Cancelling it never affects a parent token passed to
    /// [`SessionBuilder::cancellation_token`].
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Abort every pending and future call
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Fetch general agent information from `GET /api`
    pub async fn get_root(&self) -> Result<serde_json::Value> {
        let url = self.endpoint(ROOT_PATH)?;
        let exchange = self.execute(Method::GET, url).await?;

        if exchange.status != StatusCode::OK {
            return Err(self.fail(NgrokError::Root {
                status: exchange.status,
                message: "unable to make root request".to_string(),
            }));
        }

        let data: serde_json::Value = self.parse(&exchange.body)?;
        self.observer
            .debug(&format!("got '/{}' response: {}", ROOT_PATH, data));
        Ok(data)
    }

    /// List all tunnels from `GET /api/tunnels`, in server order
    pub async fn get_tunnels(&self) -> Result<TunnelCollection> {
        let url = self.endpoint(TUNNELS_PATH)?;
        let exchange = self.execute(Method::GET, url).await?;

        if exchange.status != StatusCode::OK {
            return Err(self.fail(NgrokError::Root {
                status: exchange.status,
                message: "unable to fetch tunnels list".to_string(),
            }));
        }

        let list: TunnelList = self.parse(&exchange.body)?;
        self.observer.debug(&format!(
            "got '/{}' response: {} tunnel(s)",
            TUNNELS_PATH,
            list.tunnels.len()
        ));

        Ok(TunnelCollection::new(list.tunnels).with_observer(Arc::clone(&self.observer)))
    }

    /// Fetch a single tunnel from `GET /api/tunnels/{name}`
    pub async fn get_tunnel(&self, name: &str) -> Result<Tunnel> {
        let url = self.tunnel_endpoint(name)?;
        let exchange = self.execute(Method::GET, url).await?;

        if exchange.status != StatusCode::OK {
            let message = server_message(&exchange.body)
                .unwrap_or_else(|| format!("unable to fetch tunnel {}", name));
            return Err(self.fail(NgrokError::Tunnel {
                status: exchange.status,
                message,
            }));
        }

        let tunnel: Tunnel = self.parse(&exchange.body)?;
        self.observer.debug(&format!("got tunnel {}", tunnel));
        Ok(tunnel)
    }

    /// Create a new tunnel via `POST /api/tunnels`
    ///
    /// Not available yet: always fails with [`NgrokError::NotImplemented`]
    /// without contacting the agent.
    pub async fn start_tunnel(&self, _name: &str) -> Result<Tunnel> {
        Err(self.fail(NgrokError::NotImplemented("start_tunnel")))
    }

    /// Stop a tunnel via `DELETE /api/tunnels/{name}`
    pub async fn stop_tunnel(&self, name: &str) -> Result<()> {
        let url = self.tunnel_endpoint(name)?;
        let exchange = self.execute(Method::DELETE, url).await?;

        if exchange.status != StatusCode::NO_CONTENT {
            let message = server_message(&exchange.body)
                .unwrap_or_else(|| format!("unable to delete/stop tunnel {}", name));
            return Err(self.fail(NgrokError::Tunnel {
                status: exchange.status,
                message,
            }));
        }

        self.observer.debug(&format!("stopped tunnel {}", name));
        Ok(())
    }

    /// Release the HTTP transport
    ///
    /// Pending calls on other tasks fail with [`NgrokError::Cancelled`].
    pub fn close(self) {
        self.observer
            .debug(&format!("closing session for {}", self.api_url));
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Url::parse(&join_url(&self.api_url, path)).map_err(|e| self.fail(e.into()))
    }

    /// Endpoint of one named tunnel; the name is encoded as a single segment
    ///
    /// Empty and dot-segment names are rejected since they would resolve to
    /// the listing endpoint instead.
    fn tunnel_endpoint(&self, name: &str) -> Result<Url> {
        if matches!(name, "" | "." | "..") {
            return Err(self.fail(NgrokError::InvalidName(name.to_string())));
        }

        let mut url = self.endpoint(TUNNELS_PATH)?;
        url.path_segments_mut()
            .map_err(|_| {
                self.fail(NgrokError::InvalidUrl(
                    url::ParseError::RelativeUrlWithCannotBeABaseBase,
                ))
            })?
            .push(name);
        Ok(url)
    }

    /// Send one request and read the whole response
    async fn execute(&self, method: Method, url: Url) -> Result<Exchange> {
        let target = format!("{} {}", method, url);

        if self.cancel.is_cancelled() {
            return Err(self.fail(NgrokError::Cancelled));
        }

        self.observer.debug(&target);
        let request = self.client.request(method, url);
        let exchange = async move {
            let response = request.send().await?;
            let status = response.status();
            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>(Exchange { status, body })
        };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                self.observer.warn(&format!("{} abandoned", target));
                Err(NgrokError::Cancelled)
            }
            result = exchange => result.map_err(|e| {
                self.observer.warn(&format!("{} failed: {}", target, e));
                NgrokError::Transport(e)
            }),
        }
    }

    fn parse<T: DeserializeOwned>(&self, body: &[u8]) -> Result<T> {
        serde_json::from_slice(body).map_err(|e| self.fail(NgrokError::Malformed(e)))
    }

    /// Report an error to the observer and hand it back
    fn fail(&self, err: NgrokError) -> NgrokError {
        self.observer.warn(&err.to_string());
        err
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("api_url", &self.api_url)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

fn server_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .map(|body| body.msg)
}

/// Builder for [`Session`]
pub struct SessionBuilder {
    api_url: String,
    headers: HeaderMap,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    observer: SharedObserver,
    parent: Option<CancellationToken>,
    invalid: Option<NgrokError>,
}

impl SessionBuilder {
    /// Builder with default URL, headers and no-op observer
    pub fn new() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            headers: default_headers(),
            timeout: None,
            connect_timeout: None,
            observer: observer::noop(),
            parent: None,
            invalid: None,
        }
    }

    /// Builder seeded from a configuration value
    ///
    /// A header that the HTTP layer rejects is reported by [`build`](Self::build)
    /// as [`NgrokError::InvalidHeader`], after an observer has been attached.
    pub fn from_config(config: &SessionConfig) -> Self {
        let mut builder = Self::new().api_url(config.api_url.clone());

        if let Some(headers) = &config.headers {
            match convert_headers(headers) {
                Ok(map) => builder = builder.headers(map),
                Err(err) => builder.invalid = Some(err),
            }
        }

        builder.timeout = config.timeout;
        builder.connect_timeout = config.connect_timeout;
        builder
    }

    /// Override the base URL
    pub fn api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Replace the whole header set
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self.invalid = None;
        self
    }

    /// Add or replace a single header
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Bound the total duration of each request
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Bound the time spent connecting
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Receive debug and warning events
    pub fn observer(mut self, observer: impl Observer + 'static) -> Self {
        self.observer = Arc::new(observer);
        self
    }

    /// Receive events through an already shared observer
    pub fn shared_observer(mut self, observer: SharedObserver) -> Self {
        self.observer = observer;
        self
    }

    /// Tie the session to a caller token; cancelling it aborts pending calls
    pub fn cancellation_token(mut self, token: CancellationToken) -> Self {
        self.parent = Some(token);
        self
    }

    /// Validate the settings and open the HTTP transport
    pub fn build(mut self) -> Result<Session> {
        if let Some(err) = self.invalid.take() {
            return Err(self.reject(err));
        }

        let base = Url::parse(&self.api_url).map_err(|e| self.reject(e.into()))?;
        if base.cannot_be_a_base() {
            return Err(self.reject(NgrokError::InvalidUrl(
                url::ParseError::RelativeUrlWithCannotBeABaseBase,
            )));
        }

        let headers = std::mem::take(&mut self.headers);
        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = self.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        let client = builder.build().map_err(|e| self.reject(e.into()))?;

        let cancel = match self.parent {
            Some(parent) => parent.child_token(),
            None => CancellationToken::new(),
        };

        self.observer
            .debug(&format!("session opened for {}", self.api_url));

        Ok(Session {
            client,
            api_url: self.api_url,
            observer: self.observer,
            cancel,
        })
    }
}

impl SessionBuilder {
    fn reject(&self, err: NgrokError) -> NgrokError {
        self.observer.warn(&err.to_string());
        err
    }
}

fn convert_headers(headers: &BTreeMap<String, String>) -> Result<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let name = HeaderName::from_str(name)
            .map_err(|e| NgrokError::InvalidHeader(format!("{}: {}", name, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| NgrokError::InvalidHeader(format!("{}: {}", name, e)))?;
        map.insert(name, value);
    }
    Ok(map)
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::testing::RecordingObserver;

    #[test]
    fn test_join_url_with_trailing_slash() {
        assert_eq!(
            join_url("http://127.0.0.1:4040/", "api/tunnels"),
            "http://127.0.0.1:4040/api/tunnels"
        );
    }

    #[test]
    fn test_join_url_without_trailing_slash() {
        assert_eq!(
            join_url("http://127.0.0.1:4040", "api/tunnels"),
            "http://127.0.0.1:4040/api/tunnels"
        );
    }

    #[test]
    fn test_join_url_strips_one_slash_per_side() {
        assert_eq!(
            join_url("http://localhost:4040/", "/api/"),
            "http://localhost:4040/api"
        );
        assert_eq!(
            join_url("http://localhost:4040/prefix/", "api"),
            "http://localhost:4040/prefix/api"
        );
    }

    #[test]
    fn test_tunnel_endpoint_encodes_name() {
        let session = Session::builder()
            .api_url("http://127.0.0.1:4040")
            .build()
            .unwrap();

        let url = session.tunnel_endpoint("my tunnel/1").unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:4040/api/tunnels/my%20tunnel%2F1"
        );

        let url = session.tunnel_endpoint("command_line (http)").unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:4040/api/tunnels/command_line%20(http)"
        );
    }

    #[test]
    fn test_tunnel_endpoint_rejects_dot_and_empty_names() {
        let session = Session::new().unwrap();

        for name in ["", ".", ".."] {
            match session.tunnel_endpoint(name) {
                Err(NgrokError::InvalidName(rejected)) => assert_eq!(rejected, name),
                other => panic!("Expected InvalidName for {:?}, got {:?}", name, other),
            }
        }

        let url = session.tunnel_endpoint("...").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:4040/api/tunnels/...");
        let url = session.tunnel_endpoint("a.b").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:4040/api/tunnels/a.b");
    }

    #[tokio::test]
    async fn test_dot_names_fail_before_any_request() {
        let recorder = Arc::new(RecordingObserver::default());
        let session = Session::builder()
            .shared_observer(recorder.clone())
            .build()
            .unwrap();

        assert!(matches!(
            session.get_tunnel("..").await,
            Err(NgrokError::InvalidName(_))
        ));
        assert!(matches!(
            session.stop_tunnel(".").await,
            Err(NgrokError::InvalidName(_))
        ));

        assert_eq!(recorder.warn.lock().unwrap().len(), 2);
        let debug = recorder.debug.lock().unwrap();
        assert!(debug.iter().all(|m| !m.starts_with("GET") && !m.starts_with("DELETE")));
    }

    #[test]
    fn test_default_headers() {
        let headers = default_headers();
        assert_eq!(headers[CONTENT_TYPE], "application/json");
    }

    #[test]
    fn test_build_rejects_invalid_url() {
        assert!(matches!(
            Session::builder().api_url("not a url").build(),
            Err(NgrokError::InvalidUrl(_))
        ));
        assert!(matches!(
            Session::builder().api_url("mailto:someone@example.com").build(),
            Err(NgrokError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_from_config_rejects_invalid_header() {
        let config = SessionConfig {
            headers: Some([("bad header".to_string(), "x".to_string())].into()),
            ..Default::default()
        };
        assert!(matches!(
            Session::from_config(&config),
            Err(NgrokError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_builder_errors_reach_observer() {
        let recorder = Arc::new(RecordingObserver::default());
        let result = Session::builder()
            .api_url("not a url")
            .shared_observer(recorder.clone())
            .build();
        assert!(matches!(result, Err(NgrokError::InvalidUrl(_))));
        assert_eq!(recorder.warn.lock().unwrap().len(), 1);

        let config = SessionConfig {
            headers: Some([("X-Test".to_string(), "bad\nvalue".to_string())].into()),
            ..Default::default()
        };
        let recorder = Arc::new(RecordingObserver::default());
        let result = SessionBuilder::from_config(&config)
            .shared_observer(recorder.clone())
            .build();
        assert!(matches!(result, Err(NgrokError::InvalidHeader(_))));
        let warn = recorder.warn.lock().unwrap();
        assert_eq!(warn.len(), 1);
        assert!(warn[0].starts_with("Invalid header: x-test"));
    }

    #[test]
    fn test_from_config_applies_url() {
        let config = SessionConfig {
            api_url: "http://localhost:4041".to_string(),
            timeout: Some(Duration::from_secs(3)),
            ..Default::default()
        };
        let session = Session::from_config(&config).unwrap();
        assert_eq!(session.api_url(), "http://localhost:4041");
    }

    #[tokio::test]
    async fn test_start_tunnel_not_implemented() {
        let recorder = Arc::new(RecordingObserver::default());
        let session = Session::builder()
            .shared_observer(recorder.clone())
            .build()
            .unwrap();

        let result = session.start_tunnel("web").await;
        assert!(matches!(
            result,
            Err(NgrokError::NotImplemented("start_tunnel"))
        ));
        assert_eq!(recorder.warn.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_cancelled_session_fails_fast() {
        let session = Session::new().unwrap();
        session.cancel();

        assert!(matches!(
            session.get_tunnels().await,
            Err(NgrokError::Cancelled)
        ));
    }

    #[tokio::test]
    async fn test_parent_token_not_cancelled_by_close() {
        let parent = CancellationToken::new();
        let session = Session::builder()
            .cancellation_token(parent.clone())
            .build()
            .unwrap();
        let child = session.cancellation_token();

        session.close();

        assert!(child.is_cancelled());
        assert!(!parent.is_cancelled());
    }

    #[tokio::test]
    async fn test_unreachable_daemon_is_transport_error() {
        // Grab a free port and release it so nothing is listening
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let recorder = Arc::new(RecordingObserver::default());
        let session = Session::builder()
            .api_url(format!("http://127.0.0.1:{}/", port))
            .shared_observer(recorder.clone())
            .build()
            .unwrap();

        match session.get_root().await {
            Err(NgrokError::Transport(_)) => {}
            other => panic!("Expected Transport error, got {:?}", other),
        }
        assert!(!recorder.warn.lock().unwrap().is_empty());
    }
}
