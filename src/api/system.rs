use super::ApiClient;
use crate::model::{LogEntry, LogLevel, SystemStatus, VersionInfo};
use anyhow::Result;

/// System management endpoints.
impl ApiClient {
    pub async fn get_system_status(&self) -> Result<SystemStatus> {
        self.get_json("/system/status").await
    }

    /// Free-form platform information; shape varies by backend build.
    pub async fn get_system_info(&self) -> Result<serde_json::Value> {
        self.get_json("/system/info").await
    }

    /// Most recent log entries at `level` or above, newest first.
    pub async fn get_logs(&self, level: LogLevel, count: u32) -> Result<Vec<LogEntry>> {
        self.get_json_with_query(
            "/system/logs",
            &[("level", level.as_str().to_string()), ("count", count.to_string())],
        )
        .await
    }

    /// Ask the backend to restart itself.
    pub async fn restart(&self) -> Result<()> {
        self.post_ack("/system/restart").await
    }

    pub async fn get_version(&self) -> Result<VersionInfo> {
        self.get_json("/system/version").await
    }
}
