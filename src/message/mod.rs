use crate::model::{Metric, SimulationStatus, SystemStatus};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;


/// Discriminator for realtime messages pushed by the backend.
///
/// `Unknown` absorbs kinds this build does not recognize so that new server
/// message types never fail the connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    RealtimeData,
    SystemAlert,
    SimulationStatus,
    ParameterUpdate,
    #[serde(other)]
    Unknown,
}

/// Outer structure wrapping every inbound realtime message.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    /// Unix epoch milliseconds (server time). Any JSON number is valid on
    /// the wire, fractional epochs included.
    pub timestamp: f64,
    /// Shape determined by `kind`; decoded on demand
    pub payload: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Envelope {
    /// Decode a raw text frame into an envelope.
    pub fn decode(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    /// Decode the payload into its kind-specific shape.
    pub fn payload_as<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_value(self.payload.clone())
    }
}

/// Payload of a `realtime_data` envelope: a snapshot of current readings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RealtimeData {
    #[serde(default)]
    pub metrics: HashMap<String, Metric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simulation: Option<SimulationStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<SystemStatus>,
}

/// Payload of a `system_alert` envelope.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SystemAlert {
    /// Severity; the backend omits it for plain warnings
    #[serde(default)]
    pub level: AlertLevel,
    #[serde(rename = "msg")]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Info,
    #[default]
    Warning,
    Error,
    Critical,
}

/// Payload of a `parameter_update` envelope: the backend pushed a changed
/// parameter set for one channel.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParameterUpdate {
    #[serde(rename = "channelType")]
    pub channel_type: crate::model::ChannelType,
    pub parameters: crate::model::ChannelParameters,
}

/// Client → Server messages sent over the realtime link.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Ask the backend to start pushing a result category
    Subscribe { result_type: crate::model::ResultType },
    /// Stop pushing a result category
    Unsubscribe { result_type: crate::model::ResultType },
    /// Application-level keepalive
    Ping,
}
