//! Client configuration.

use std::time::Duration;

use url::Url;

/// Well-known WebSocket endpoint path on the backend host.
pub const WS_PATH: &str = "/wsapi";

/// Default delay between reconnect attempts.
///
/// The retry policy is a fixed delay: no backoff growth and no attempt
/// limit. The client keeps trying until the backend comes back.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(2000);

/// Configuration for a [`ConnectionManager`](crate::ConnectionManager).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Full WebSocket endpoint URL.
    pub endpoint: Url,
    /// Delay between reconnect attempts.
    pub retry_delay: Duration,
}

impl ClientConfig {
    /// Create a configuration with the default retry delay.
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    /// Build the endpoint for a backend host: `ws://<host>/wsapi`, or
    /// the `wss` variant when the backend is reached over TLS.
    pub fn for_host(host: &str, secure: bool) -> Result<Self, url::ParseError> {
        let scheme = if secure { "wss" } else { "ws" };
        let endpoint = Url::parse(&format!("{scheme}://{host}{WS_PATH}"))?;
        Ok(Self::new(endpoint))
    }

    /// Override the reconnect delay.
    #[must_use]
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_insecure_endpoint() {
        let config = ClientConfig::for_host("127.0.0.1:8080", false).unwrap();
        assert_eq!(config.endpoint.as_str(), "ws://127.0.0.1:8080/wsapi");
        assert_eq!(config.retry_delay, DEFAULT_RETRY_DELAY);
    }

    #[test]
    fn builds_secure_endpoint() {
        let config = ClientConfig::for_host("plant.example.com", true).unwrap();
        assert_eq!(config.endpoint.as_str(), "wss://plant.example.com/wsapi");
    }

    #[test]
    fn retry_delay_can_be_overridden() {
        let config = ClientConfig::for_host("127.0.0.1:9001", false)
            .unwrap()
            .with_retry_delay(Duration::from_millis(50));
        assert_eq!(config.retry_delay, Duration::from_millis(50));
    }

    #[test]
    fn rejects_unparsable_host() {
        assert!(ClientConfig::for_host("not a host", false).is_err());
    }
}
