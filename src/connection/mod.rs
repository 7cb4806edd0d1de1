// Realtime connection management

mod dispatch;
mod manager;

pub use manager::ConnectionManager;


use crate::config::RealtimeConfig;
use std::fmt;
use std::time::Duration;

/// Lifecycle state of the realtime connection.
///
/// `Failed` is terminal: no further automatic reconnects are scheduled until
/// an explicit `connect` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionState {
    Idle,
    Connecting,
    Open,
    Closed,
    Failed,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Idle => write!(f, "idle"),
            ConnectionState::Connecting => write!(f, "connecting"),
            ConnectionState::Open => write!(f, "open"),
            ConnectionState::Closed => write!(f, "closed"),
            ConnectionState::Failed => write!(f, "failed"),
        }
    }
}

/// Bounded fixed-delay reconnection policy.
#[derive(Clone, Copy, Debug)]
pub struct ReconnectPolicy {
    /// Automatic attempts before entering `Failed`
    pub max_attempts: u32,
    /// Fixed delay between attempts
    pub delay: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay: Duration::from_millis(3000),
        }
    }
}

impl From<&RealtimeConfig> for ReconnectPolicy {
    fn from(config: &RealtimeConfig) -> Self {
        Self {
            max_attempts: config.max_reconnect_attempts,
            delay: Duration::from_millis(config.reconnect_delay_ms),
        }
    }
}

/// Why an outbound message was not delivered.
///
/// There is no outbound buffering: a message that cannot be transmitted
/// right now is dropped, not queued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendError {
    /// Transport is not in the `Open` state
    NotConnected,
    /// Message could not be serialized to the wire format
    Encode(String),
    /// Manager task has shut down
    Shutdown,
}

impl fmt::Display for SendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendError::NotConnected => write!(f, "realtime connection is not open"),
            SendError::Encode(e) => write!(f, "failed to encode outbound message: {}", e),
            SendError::Shutdown => write!(f, "connection manager has shut down"),
        }
    }
}

impl std::error::Error for SendError {}
