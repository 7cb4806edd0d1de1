use super::ApiClient;
use crate::model::{SceneSettings, SimulationConfig, SimulationStatus};
use anyhow::Result;

/// Scene configuration and simulation lifecycle endpoints.
impl ApiClient {
    pub async fn get_scene_settings(&self) -> Result<SceneSettings> {
        self.get_json("/scene/settings").await
    }

    pub async fn update_scene_settings(&self, settings: &SceneSettings) -> Result<()> {
        self.put_json_ack("/scene/settings", settings).await
    }

    /// Reset the scene configuration to backend defaults.
    pub async fn reset_scene_settings(&self) -> Result<()> {
        self.post_ack("/scene/reset").await
    }

    /// Start a simulation run; returns its initial status.
    pub async fn start_simulation(&self, config: &SimulationConfig) -> Result<SimulationStatus> {
        self.post_json("/simulation/start", config).await
    }

    pub async fn stop_simulation(&self) -> Result<()> {
        self.post_ack("/simulation/stop").await
    }

    pub async fn get_simulation_status(&self) -> Result<SimulationStatus> {
        self.get_json("/simulation/status").await
    }
}
