use super::ApiClient;
use crate::model::{AllChannelParameters, ChannelParameters, ChannelType};
use anyhow::Result;

/// Channel parameter endpoints.
impl ApiClient {
    /// Fetch the active parameter set for one channel.
    pub async fn get_parameters(&self, channel: ChannelType) -> Result<ChannelParameters> {
        self.get_json(&format!("/parameters/{}", channel.as_str()))
            .await
    }

    /// Apply a new parameter set to one channel.
    pub async fn update_parameters(
        &self,
        channel: ChannelType,
        params: &ChannelParameters,
    ) -> Result<()> {
        self.put_json_ack(&format!("/parameters/{}", channel.as_str()), params)
            .await
    }

    /// Persist the current parameter set for one channel.
    pub async fn save_parameters(
        &self,
        channel: ChannelType,
        params: &ChannelParameters,
    ) -> Result<()> {
        self.post_json_ack(&format!("/parameters/{}/save", channel.as_str()), params)
            .await
    }

    /// Load a named preset covering all channels.
    pub async fn load_preset(&self, preset_name: &str) -> Result<AllChannelParameters> {
        self.get_json(&format!("/parameters/preset/{}", preset_name))
            .await
    }
}
