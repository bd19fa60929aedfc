//! Run-sensor panel against stub sensor and pipeline backends.

#![allow(clippy::unwrap_used)]

mod common;

use std::time::Duration;

use common::{dead_base, json, text, StubServer};
use radarix::client::SensorClient;
use radarix::model::SensorProfile;
use radarix::notify::{RecordingNotifier, CANNOT_CONNECT};
use radarix::session::Session;
use radarix::views::{RunSensorPanel, GENERIC_FAILURE};
use serde_json::json as j;

fn ok_run() -> common::Route {
    json(
        "POST",
        "/run-sensor",
        200,
        j!({
            "success": true,
            "stats_text": "Run 12: 71.3 bpm",
            "ml_results": {
                "Predicted_HR": 71.3,
                "HR_Class": "Normal",
                "RR_Class": "Normal",
                "Stress_Class": "Low"
            }
        }),
    )
}

fn session() -> Session {
    Session::logged_in("admin@gpp.com")
}

#[tokio::test]
async fn test_run_success_sets_results() {
    let server = StubServer::start(vec![ok_run()]).await;
    let client = SensorClient::new(server.base(), server.base(), Duration::from_secs(5)).unwrap();
    let mut panel = RunSensorPanel::new(&client, &session()).unwrap();

    assert!(panel.run(SensorProfile::Back).await);
    assert!(!panel.is_loading());
    let results = panel.ml_results().unwrap();
    assert_eq!(results.predicted_hr, Some(71.3));
    assert_eq!(results.stress_class.as_deref(), Some("Low"));
    assert_eq!(panel.stats_text(), Some("Run 12: 71.3 bpm"));
    assert!(!panel.notice().unwrap().is_error());

    let body = server.last("/run-sensor").unwrap().body_json();
    assert_eq!(body, j!({"userEmail": "admin@gpp.com", "configuration": 1}));
}

#[tokio::test]
async fn test_backend_failure_keeps_previous_results() {
    let server = StubServer::start(vec![
        ok_run().once(),
        json(
            "POST",
            "/run-sensor",
            500,
            j!({"success": false, "error": "Sensor not connected"}),
        )
        .once(),
        json("POST", "/run-sensor", 200, j!({"success": false})),
    ])
    .await;
    let client = SensorClient::new(server.base(), server.base(), Duration::from_secs(5)).unwrap();
    let mut panel = RunSensorPanel::new(&client, &session()).unwrap();

    assert!(panel.run(SensorProfile::Front).await);
    let before = panel.ml_results().cloned();

    assert!(!panel.run(SensorProfile::Front).await);
    assert_eq!(panel.notice().unwrap().message, "Sensor not connected");
    assert_eq!(panel.ml_results().cloned(), before);

    assert!(!panel.run(SensorProfile::Front).await);
    assert_eq!(panel.notice().unwrap().message, GENERIC_FAILURE);
    assert_eq!(panel.ml_results().cloned(), before);
}

#[tokio::test]
async fn test_timeout_is_cannot_connect_and_keeps_results() {
    let server = StubServer::start(vec![
        ok_run().once(),
        ok_run().delay(Duration::from_secs(3)),
    ])
    .await;
    let client =
        SensorClient::new(server.base(), server.base(), Duration::from_millis(500)).unwrap();
    let recorder = RecordingNotifier::new();
    let mut panel = RunSensorPanel::new(&client, &session()).unwrap().notifier(&recorder);

    assert!(panel.run(SensorProfile::Front).await);
    assert!(panel.ml_results().is_some());

    assert!(!panel.run(SensorProfile::Front).await);
    let notice = panel.notice().unwrap();
    assert!(notice.is_error());
    assert_eq!(notice.message, CANNOT_CONNECT);
    assert_eq!(panel.ml_results().unwrap().predicted_hr, Some(71.3));
    assert_eq!(recorder.notices().len(), 2);
}

#[tokio::test]
async fn test_non_json_error_page_is_cannot_connect() {
    let server = StubServer::start(vec![text("POST", "/run-sensor", 502, "Bad Gateway")]).await;
    let client = SensorClient::new(server.base(), server.base(), Duration::from_secs(5)).unwrap();
    let mut panel = RunSensorPanel::new(&client, &session()).unwrap();

    assert!(!panel.run(SensorProfile::Front).await);
    assert_eq!(panel.notice().unwrap().message, CANNOT_CONNECT);
    assert!(panel.ml_results().is_none());
}

#[tokio::test]
async fn test_unreachable_sensor() {
    let base = dead_base();
    let client = SensorClient::new(&base, &base, Duration::from_secs(2)).unwrap();
    let mut panel = RunSensorPanel::new(&client, &session()).unwrap();

    assert!(!panel.check_status().await);
    assert_eq!(panel.notice().unwrap().message, CANNOT_CONNECT);
}

#[tokio::test]
async fn test_status() {
    let server = StubServer::start(vec![json(
        "GET",
        "/run-sensor",
        200,
        j!({"success": true, "output": "ready"}),
    )])
    .await;
    let client = SensorClient::new(server.base(), server.base(), Duration::from_secs(5)).unwrap();
    let mut panel = RunSensorPanel::new(&client, &session()).unwrap();

    assert!(panel.check_status().await);
    assert_eq!(panel.notice().unwrap().message, "ready");
}

#[tokio::test]
async fn test_upload_and_pipeline() {
    let sensor = StubServer::start(vec![]).await;
    let pipeline = StubServer::start(vec![
        json("POST", "/upload", 200, j!({"message": "File uploaded successfully"})),
        json(
            "POST",
            "/run_pipeline",
            200,
            j!({
                "message": "Pipeline finished",
                "model_output": {"Predicted_HR": "68.0", "HR_Class": "Low"}
            }),
        ),
    ])
    .await;
    let client = SensorClient::new(sensor.base(), pipeline.base(), Duration::from_secs(5)).unwrap();
    let mut panel = RunSensorPanel::new(&client, &session()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("recording.csv");
    std::fs::write(&file, "Timestamp,HeartRate_BPM\n10:00,70\n").unwrap();

    assert!(panel.upload(&file).await);
    assert_eq!(panel.notice().unwrap().message, "File uploaded successfully");
    let upload = pipeline.last("/upload").unwrap();
    assert!(upload.header("content-type").unwrap().starts_with("multipart/form-data"));
    let body = upload.body_text();
    assert!(body.contains("name=\"file\""));
    assert!(body.contains("filename=\"recording.csv\""));
    assert!(body.contains("10:00,70"));

    assert!(panel.run_pipeline().await);
    assert_eq!(panel.ml_results().unwrap().predicted_hr, Some(68.0));
    assert_eq!(panel.ml_results().unwrap().hr_class.as_deref(), Some("Low"));
    assert_eq!(sensor.requests().len(), 0);
}

#[tokio::test]
async fn test_stub_records_chunked_upload_body() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let server = StubServer::start(vec![json("POST", "/upload", 200, j!({"message": "ok"}))]).await;
    let addr = server.base().trim_start_matches("http://").to_string();
    let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(
            b"POST /upload HTTP/1.1\r\nHost: stub\r\nTransfer-Encoding: chunked\r\n\
              Connection: close\r\n\r\n\
              6\r\n10:00,\r\n2\r\n70\r\n0\r\n\r\n",
        )
        .await
        .unwrap();
    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    assert!(String::from_utf8_lossy(&response).starts_with("HTTP/1.1 200"));

    let upload = server.last("/upload").unwrap();
    assert_eq!(upload.method, "POST");
    assert_eq!(upload.body_text(), "10:00,70");
    assert_eq!(upload.header("transfer-encoding"), Some("chunked"));
}

#[tokio::test]
async fn test_pipeline_failure_details() {
    let server = StubServer::start(vec![json(
        "POST",
        "/run_pipeline",
        500,
        j!({"error": "Pipeline failed", "details": "Traceback ...\n"}),
    )])
    .await;
    let client = SensorClient::new(server.base(), server.base(), Duration::from_secs(5)).unwrap();
    let mut panel = RunSensorPanel::new(&client, &session()).unwrap();

    assert!(!panel.run_pipeline().await);
    assert_eq!(panel.notice().unwrap().message, "Pipeline failed: Traceback ...");
    assert!(panel.ml_results().is_none());
}

#[tokio::test]
async fn test_upload_data_prediction() {
    let server = StubServer::start(vec![json(
        "POST",
        "/upload-data",
        200,
        j!({"success": true, "predicted_hr": 72.44}),
    )])
    .await;
    let client = SensorClient::new(server.base(), server.base(), Duration::from_secs(5)).unwrap();
    let mut panel = RunSensorPanel::new(&client, &session()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("data.csv");
    std::fs::write(&file, "x\n1\n").unwrap();

    assert!(panel.upload_data(&file).await);
    assert_eq!(panel.predicted_hr(), Some(72.44));
    assert_eq!(panel.notice().unwrap().message, "Predicted HR: 72.4 bpm");
}
