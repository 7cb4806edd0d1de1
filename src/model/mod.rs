use serde::{Deserialize, Serialize};
use serde_json::Value;


/// Channel types the backend exposes parameter sets for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelType {
    Uplink,
    Remote,
    Downlink,
    Telemetry,
    Baseband,
}

impl ChannelType {
    /// URL path segment for this channel type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelType::Uplink => "uplink",
            ChannelType::Remote => "remote",
            ChannelType::Downlink => "downlink",
            ChannelType::Telemetry => "telemetry",
            ChannelType::Baseband => "baseband",
        }
    }
}

/// Result categories served under /results.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultType {
    Ber,
    Ranging,
    Message,
}

impl ResultType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultType::Ber => "ber",
            ResultType::Ranging => "ranging",
            ResultType::Message => "message",
        }
    }
}

/// Log severity levels used by /system/logs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
            LogLevel::Critical => "critical",
        }
    }
}

/// Parameter set for one simulated channel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChannelParameters {
    /// Bandwidth in kHz
    pub bandwidth: u32,
    /// Coding scheme identifier (e.g. "4/5")
    pub coding: String,
    pub spreading_factor: u8,
    /// Center frequency in MHz
    pub center_frequency: u32,
    /// Transmit power in W
    pub power: f64,
}

/// Full parameter set across all channels, as stored in presets.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AllChannelParameters {
    pub uplink: ChannelParameters,
    pub uplink_interference: ChannelParameters,
    pub downlink: ChannelParameters,
}

/// Interference injection settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InterferenceSettings {
    #[serde(rename = "type")]
    pub kind: InterferenceKind,
    pub intensity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bandwidth: Option<f64>,
    pub enabled: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterferenceKind {
    None,
    White,
    Narrow,
    Pulse,
    Sweep,
}

/// Noise model settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoiseSettings {
    #[serde(rename = "type")]
    pub kind: NoiseKind,
    /// Signal-to-noise ratio in dB
    pub snr: f64,
    #[serde(rename = "powerSpectralDensity", skip_serializing_if = "Option::is_none")]
    pub power_spectral_density: Option<f64>,
    pub enabled: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoiseKind {
    Awgn,
    Colored,
    Impulsive,
    Phase,
}

/// Platform motion settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DynamicSettings {
    pub mode: MotionMode,
    /// Velocity in m/s
    pub velocity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acceleration: Option<f64>,
    pub enabled: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MotionMode {
    Static,
    Linear,
    Acceleration,
    Circular,
    Orbit,
}

/// Channel propagation model settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChannelSettings {
    pub model: ChannelModel,
    #[serde(rename = "dopplerShift")]
    pub doppler_shift: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelModel {
    Awgn,
    Rayleigh,
    Rician,
    Multipath,
}

/// Complete scene configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneSettings {
    pub interference: InterferenceSettings,
    pub noise: NoiseSettings,
    pub dynamic: DynamicSettings,
    pub channel: ChannelSettings,
}

/// Threshold annotations for a metric.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricThreshold {
    pub warning: f64,
    pub error: f64,
    pub unit: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

/// A single measured quantity reported by the backend.
///
/// `value` may be numeric or a preformatted string, so it stays a JSON value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub id: String,
    pub title: String,
    pub value: Value,
    pub unit: String,
    pub trend: Trend,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<MetricThreshold>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Unix epoch milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
}

/// One point of a metric's history series.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub value: Value,
    /// Unix epoch milliseconds
    pub timestamp: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Csv,
    Binary,
}

/// Simulation run configuration submitted to /simulation/start.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Duration in seconds
    pub duration: f64,
    /// Step size in seconds
    #[serde(rename = "timeStep")]
    pub time_step: f64,
    /// Free-form per-run overrides, opaque to the client
    #[serde(default)]
    pub parameters: Value,
    pub scene: SceneSettings,
    #[serde(rename = "outputFormat")]
    pub output_format: ExportFormat,
    #[serde(rename = "realTimeUpdate")]
    pub real_time_update: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimulationState {
    Idle,
    Running,
    Paused,
    Stopped,
    Error,
}

/// Aggregate run counters reported by /results/statistics and embedded in
/// simulation status updates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationStatistics {
    #[serde(rename = "processedSamples")]
    pub processed_samples: u64,
    #[serde(rename = "errorCount")]
    pub error_count: u64,
    #[serde(rename = "warningCount")]
    pub warning_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance: Option<PerformanceStats>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PerformanceStats {
    /// CPU usage fraction 0..1
    pub cpu: f64,
    /// Memory usage in bytes
    pub memory: u64,
    /// Samples per second
    pub throughput: f64,
}

/// Current state of a simulation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationStatus {
    pub id: String,
    pub status: SimulationState,
    /// Percentage 0..100
    pub progress: f64,
    #[serde(rename = "currentTime")]
    pub current_time: f64,
    #[serde(rename = "totalTime")]
    pub total_time: f64,
    #[serde(rename = "startTime", default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<f64>,
    #[serde(rename = "endTime", default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<f64>,
    #[serde(rename = "errorMessage", default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistics: Option<SimulationStatistics>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemHealth {
    Online,
    Offline,
    Maintenance,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceState {
    Running,
    Stopped,
    Error,
}

/// Status of one backend service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub name: String,
    pub status: ServiceState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(rename = "lastHeartbeat", default, skip_serializing_if = "Option::is_none")]
    pub last_heartbeat: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CpuInfo {
    /// Usage fraction 0..1
    pub usage: f64,
    pub cores: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StorageInfo {
    pub total: u64,
    pub used: u64,
    pub available: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HardwareInfo {
    pub cpu: CpuInfo,
    pub memory: StorageInfo,
    pub disk: StorageInfo,
}

/// Overall backend system status from /system/status.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SystemStatus {
    pub status: SystemHealth,
    pub version: String,
    /// Uptime in seconds
    pub uptime: u64,
    /// Unix epoch milliseconds
    #[serde(rename = "lastUpdate")]
    pub last_update: f64,
    #[serde(default)]
    pub services: Vec<ServiceStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hardware: Option<HardwareInfo>,
}

/// One entry from /system/logs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    /// Unix epoch milliseconds
    pub timestamp: f64,
    pub level: LogLevel,
    pub component: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// Version info from /system/version.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub version: String,
    #[serde(rename = "buildDate", default, skip_serializing_if = "Option::is_none")]
    pub build_date: Option<String>,
}

/// Error detail inside a failed API response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// Uniform response envelope returned by every REST endpoint.
///
/// No `serde(default)` on the optional fields: a missing `Option` already
/// decodes as `None`, and the attribute would force a `T: Default` bound
/// onto the derived impl.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}
