use anyhow::Result;
use chrono::DateTime;
use groundlink::api::ApiClient;
use groundlink::config::{self, GroundlinkConfig};
use groundlink::connection::{ConnectionManager, ReconnectPolicy};
use groundlink::message::{Envelope, SystemAlert};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

fn render_timestamp(epoch_ms: f64) -> String {
    DateTime::from_timestamp_millis(epoch_ms as i64)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S%.3f").to_string())
        .unwrap_or_else(|| epoch_ms.to_string())
}

fn log_alert(envelope: &Envelope) {
    match envelope.payload_as::<SystemAlert>() {
        Ok(alert) => warn!(
            level = ?alert.level,
            component = alert.component.as_deref().unwrap_or("backend"),
            at = %render_timestamp(envelope.timestamp),
            "System alert: {}",
            alert.message
        ),
        Err(e) => warn!(error = %e, "System alert with undecodable payload"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "groundlink=info".into()),
        )
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());
    let config = match config::load_config(&config_path) {
        Ok(config) => config,
        Err(e) => {
            warn!(path = %config_path, error = %e, "Config not loaded, using defaults");
            GroundlinkConfig::default()
        }
    };

    info!("Groundlink monitor starting...");

    // Probe the REST side once so a dead backend is visible immediately
    let api = ApiClient::new(&config.api)?;
    match api.get_version().await {
        Ok(version) => info!(version = %version.version, "Backend reachable"),
        Err(e) => warn!(error = %e, "Backend version probe failed"),
    }

    let manager = ConnectionManager::new(
        config.realtime.url.clone(),
        ReconnectPolicy::from(&config.realtime),
    );
    let mut realtime = manager.subscribe_realtime();
    let mut alerts = manager.subscribe_alerts();
    let mut status = manager.subscribe_simulation_status();
    let mut parameters = manager.subscribe_parameter_updates();
    manager.connect(None).await;

    loop {
        tokio::select! {
            result = realtime.recv() => match result {
                Ok(envelope) => info!(
                    at = %render_timestamp(envelope.timestamp),
                    "Realtime data update"
                ),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Realtime listener lagged, skipped updates");
                }
                Err(RecvError::Closed) => break,
            },
            result = alerts.recv() => match result {
                Ok(envelope) => log_alert(&envelope),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Alert listener lagged, skipped alerts");
                }
                Err(RecvError::Closed) => break,
            },
            result = status.recv() => match result {
                Ok(envelope) => info!(
                    at = %render_timestamp(envelope.timestamp),
                    "Simulation status update: {}",
                    envelope.payload
                ),
                Err(RecvError::Lagged(_)) => {}
                Err(RecvError::Closed) => break,
            },
            result = parameters.recv() => match result {
                Ok(envelope) => info!(
                    source = envelope.source.as_deref().unwrap_or("backend"),
                    "Parameter update pushed: {}",
                    envelope.payload
                ),
                Err(RecvError::Lagged(_)) => {}
                Err(RecvError::Closed) => break,
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                manager.disconnect().await;
                break;
            }
        }
    }

    Ok(())
}
