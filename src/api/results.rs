use super::ApiClient;
use crate::model::{ExportFormat, HistoryPoint, Metric, ResultType, SimulationStatistics};
use anyhow::Result;
use serde_json::json;

/// Result retrieval and export endpoints.
impl ApiClient {
    /// Current readings for one result category.
    pub async fn get_realtime_results(&self, result_type: ResultType) -> Result<Vec<Metric>> {
        self.get_json(&format!("/results/{}", result_type.as_str()))
            .await
    }

    /// Historical series for one result category over a named time range
    /// (e.g. "1h", "24h").
    pub async fn get_history(
        &self,
        result_type: ResultType,
        range: &str,
    ) -> Result<Vec<HistoryPoint>> {
        self.get_json_with_query(
            &format!("/results/{}/history", result_type.as_str()),
            &[("range", range)],
        )
        .await
    }

    /// Export accumulated test results; returns the raw file body.
    pub async fn export_results(&self, format: ExportFormat) -> Result<Vec<u8>> {
        self.post_bytes("/results/export", &json!({ "format": format }))
            .await
    }

    pub async fn get_statistics(&self) -> Result<SimulationStatistics> {
        self.get_json("/results/statistics").await
    }

    /// Drop all accumulated history on the backend.
    pub async fn clear_history(&self) -> Result<()> {
        self.delete_ack("/results/history").await
    }
}
