//! Signaling Configuration
//!
//! Endpoint, reconnect policy and socket timeouts for a call session.

use crate::error::{CallGuardError, CallGuardResult};
use crate::network::{ReconnectPolicy, TransportConfig};

/// Fraud-scoring endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "ws://127.0.0.1:8000/api/ws";

/// Environment variable names read by [`SignalingConfig::from_env`].
pub const ENV_ENDPOINT: &str = "CALLGUARD_ENDPOINT";
pub const ENV_MAX_RECONNECT_ATTEMPTS: &str = "CALLGUARD_MAX_RECONNECT_ATTEMPTS";
pub const ENV_RECONNECT_BASE_MS: &str = "CALLGUARD_RECONNECT_BASE_MS";
pub const ENV_RECONNECT_MAX_MS: &str = "CALLGUARD_RECONNECT_MAX_MS";

/// Configuration for the signaling side of a call session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalingConfig {
    /// WebSocket endpoint (`ws://` or `wss://`).
    pub endpoint: String,

    /// Reconnect backoff and optional ceiling.
    pub reconnect: ReconnectPolicy,

    /// How often the socket worker checks for outbound frames (milliseconds).
    pub io_poll_interval_ms: u64,

    /// TCP connect and handshake timeout in milliseconds.
    pub connect_timeout_ms: u64,
}

impl Default for SignalingConfig {
    fn default() -> Self {
        let transport = TransportConfig::default();
        SignalingConfig {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            reconnect: ReconnectPolicy::default(),
            io_poll_interval_ms: transport.io_poll_interval_ms,
            connect_timeout_ms: transport.connect_timeout_ms,
        }
    }
}

impl SignalingConfig {
    /// Creates a configuration for the given endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        SignalingConfig {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    /// Reads overrides from the process environment.
    pub fn from_env() -> CallGuardResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from a variable lookup. Unset variables keep
    /// their defaults; unparsable ones are an error. The base delay must be
    /// positive and no larger than the maximum delay.
    pub fn from_lookup<F>(lookup: F) -> CallGuardResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = SignalingConfig::default();

        if let Some(endpoint) = lookup(ENV_ENDPOINT).filter(|v| !v.trim().is_empty()) {
            config.endpoint = endpoint.trim().to_string();
        }
        if let Some(max) = parse_var::<u32>(&lookup, ENV_MAX_RECONNECT_ATTEMPTS)? {
            config.reconnect.max_attempts = Some(max);
        }
        if let Some(base) = parse_var::<u64>(&lookup, ENV_RECONNECT_BASE_MS)? {
            config.reconnect.base_delay_ms = base;
        }
        if let Some(max) = parse_var::<u64>(&lookup, ENV_RECONNECT_MAX_MS)? {
            config.reconnect.max_delay_ms = max;
        }

        if config.reconnect.base_delay_ms == 0 {
            return Err(CallGuardError::Configuration(format!(
                "{} must be greater than zero",
                ENV_RECONNECT_BASE_MS
            )));
        }
        if config.reconnect.max_delay_ms < config.reconnect.base_delay_ms {
            return Err(CallGuardError::Configuration(format!(
                "{} ({}) is below {} ({})",
                ENV_RECONNECT_MAX_MS,
                config.reconnect.max_delay_ms,
                ENV_RECONNECT_BASE_MS,
                config.reconnect.base_delay_ms
            )));
        }

        Ok(config)
    }

    /// Sets the endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Replaces the reconnect policy.
    pub fn with_reconnect_policy(mut self, policy: ReconnectPolicy) -> Self {
        self.reconnect = policy;
        self
    }

    /// Gives up reconnecting after `attempts` consecutive failures.
    pub fn with_max_reconnect_attempts(mut self, attempts: u32) -> Self {
        self.reconnect.max_attempts = Some(attempts);
        self
    }

    /// Sets the connect timeout.
    pub fn with_connect_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.connect_timeout_ms = timeout_ms;
        self
    }

    /// Sets the socket worker poll interval.
    pub fn with_io_poll_interval_ms(mut self, interval_ms: u64) -> Self {
        self.io_poll_interval_ms = interval_ms;
        self
    }

    /// Converts to TransportConfig for the network layer.
    pub fn to_transport_config(&self) -> TransportConfig {
        TransportConfig {
            connect_timeout_ms: self.connect_timeout_ms,
            io_poll_interval_ms: self.io_poll_interval_ms,
        }
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> CallGuardResult<Option<T>> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| {
                CallGuardError::Configuration(format!("{} is not a number: {}", key, raw))
            }),
    }
}
