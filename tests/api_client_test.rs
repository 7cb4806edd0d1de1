// Integration tests for the HTTP access layer against a mock axum backend.
// The client is under test; axum plays the FastAPI server.

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use groundlink::api::ApiClient;
use groundlink::config::ApiConfig;
use groundlink::model::{ChannelType, ExportFormat, LogLevel, ResultType};
use serde_json::{json, Value};
use std::collections::HashMap;

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}/api", addr)
}

fn client(base_url: String) -> ApiClient {
    ApiClient::new(&ApiConfig {
        base_url,
        timeout_seconds: 5,
    })
    .unwrap()
}

#[tokio::test]
async fn test_get_version_decodes_data_envelope() {
    let router = Router::new().route(
        "/api/system/version",
        get(|| async {
            Json(json!({
                "success": true,
                "data": { "version": "2.0.0", "buildDate": "2024-02-11" }
            }))
        }),
    );
    let api = client(serve(router).await);

    let version = api.get_version().await.unwrap();
    assert_eq!(version.version, "2.0.0");
    assert_eq!(version.build_date.as_deref(), Some("2024-02-11"));
}

#[tokio::test]
async fn test_get_parameters_uses_channel_path_segment() {
    let router = Router::new().route(
        "/api/parameters/:channel",
        get(|Path(channel): Path<String>| async move {
            assert_eq!(channel, "uplink");
            Json(json!({
                "success": true,
                "data": {
                    "bandwidth": 125,
                    "coding": "4/5",
                    "spreading_factor": 7,
                    "center_frequency": 435,
                    "power": 0.5
                }
            }))
        }),
    );
    let api = client(serve(router).await);

    let params = api.get_parameters(ChannelType::Uplink).await.unwrap();
    assert_eq!(params.bandwidth, 125);
    assert_eq!(params.spreading_factor, 7);
}

#[tokio::test]
async fn test_update_parameters_puts_body_and_accepts_bare_ack() {
    let router = Router::new().route(
        "/api/parameters/:channel",
        put(|Path(channel): Path<String>, Json(body): Json<Value>| async move {
            assert_eq!(channel, "downlink");
            assert_eq!(body["bandwidth"], 250);
            Json(json!({ "success": true }))
        }),
    );
    let api = client(serve(router).await);

    let params = groundlink::model::ChannelParameters {
        bandwidth: 250,
        coding: "4/6".to_string(),
        spreading_factor: 9,
        center_frequency: 435,
        power: 1.0,
    };
    api.update_parameters(ChannelType::Downlink, &params)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_server_error_is_propagated_not_retried() {
    let hits = std::sync::Arc::new(std::sync::atomic::AtomicU32::new(0));
    let counter = std::sync::Arc::clone(&hits);

    let router = Router::new().route(
        "/api/system/status",
        get(move || {
            let counter = std::sync::Arc::clone(&counter);
            async move {
                counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                (StatusCode::INTERNAL_SERVER_ERROR, "boom")
            }
        }),
    );
    let api = client(serve(router).await);

    let err = api.get_system_status().await.unwrap_err();
    assert!(err.to_string().contains("500"));
    // Fail-fast: exactly one request, no automatic retry
    assert_eq!(hits.load(std::sync::atomic::Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_missing_resource_is_an_error() {
    let router = Router::new(); // nothing routed
    let api = client(serve(router).await);

    let err = api.get_simulation_status().await.unwrap_err();
    assert!(err.to_string().contains("404"));
}

#[tokio::test]
async fn test_rejected_envelope_surfaces_error_detail() {
    let router = Router::new().route(
        "/api/simulation/start",
        post(|| async {
            Json(json!({
                "success": false,
                "error": { "code": "SIM_BUSY", "message": "simulation already running" }
            }))
        }),
    );
    let api = client(serve(router).await);

    let config = groundlink::model::SimulationConfig {
        duration: 60.0,
        time_step: 0.01,
        parameters: json!({}),
        scene: serde_json::from_value(json!({
            "interference": { "type": "none", "intensity": 0.0, "enabled": false },
            "noise": { "type": "awgn", "snr": 10.0, "enabled": true },
            "dynamic": { "mode": "static", "velocity": 0.0, "enabled": false },
            "channel": { "model": "awgn", "dopplerShift": 0.0 }
        }))
        .unwrap(),
        output_format: ExportFormat::Json,
        real_time_update: true,
    };

    let err = api.start_simulation(&config).await.unwrap_err();
    assert!(err.to_string().contains("SIM_BUSY"));
}

#[tokio::test]
async fn test_get_logs_passes_level_and_count_query() {
    let router = Router::new().route(
        "/api/system/logs",
        get(|Query(query): Query<HashMap<String, String>>| async move {
            assert_eq!(query.get("level").map(String::as_str), Some("warning"));
            assert_eq!(query.get("count").map(String::as_str), Some("50"));
            Json(json!({
                "success": true,
                "data": [{
                    "id": "log-1",
                    "timestamp": 1707668400000i64,
                    "level": "warning",
                    "component": "udp-receiver",
                    "message": "buffer backlog"
                }]
            }))
        }),
    );
    let api = client(serve(router).await);

    let logs = api.get_logs(LogLevel::Warning, 50).await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].component, "udp-receiver");
}

#[tokio::test]
async fn test_export_returns_raw_bytes() {
    let router = Router::new().route(
        "/api/results/export",
        post(|Json(body): Json<Value>| async move {
            assert_eq!(body["format"], "csv");
            "ber,1.2e-5\nranging,0.5\n".to_string()
        }),
    );
    let api = client(serve(router).await);

    let bytes = api.export_results(ExportFormat::Csv).await.unwrap();
    assert_eq!(bytes, b"ber,1.2e-5\nranging,0.5\n");
}

#[tokio::test]
async fn test_clear_history_issues_delete() {
    let router = Router::new().route(
        "/api/results/history",
        delete(|| async { Json(json!({ "success": true, "message": "history cleared" })) }),
    );
    let api = client(serve(router).await);

    api.clear_history().await.unwrap();
}

#[tokio::test]
async fn test_realtime_results_decode_metric_list() {
    let router = Router::new().route(
        "/api/results/:result_type",
        get(|Path(result_type): Path<String>| async move {
            assert_eq!(result_type, "ber");
            Json(json!({
                "success": true,
                "data": [{
                    "id": "ber",
                    "title": "Bit Error Rate",
                    "value": 1.2e-5,
                    "unit": "",
                    "trend": "down"
                }]
            }))
        }),
    );
    let api = client(serve(router).await);

    let metrics = api.get_realtime_results(ResultType::Ber).await.unwrap();
    assert_eq!(metrics.len(), 1);
    assert_eq!(metrics[0].id, "ber");
}
