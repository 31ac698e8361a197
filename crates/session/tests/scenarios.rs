//! End-to-end flows: file on disk -> session -> Gemini gateway -> local stub service.

use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use anyhow::Result;
use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use gateway::{GatewaySettings, GeminiGateway};
use serde_json::{json, Value};
use session::{SessionController, UploadPolicy};
use shared::{AgeCategory, ErrorKind, ImagePayload};
use tokio::{net::TcpListener, sync::Mutex};

const MEGABYTE: usize = 1024 * 1024;

#[derive(Clone)]
struct StubService {
    reply: Value,
    requests: Arc<Mutex<Vec<Value>>>,
}

async fn generate_content(
    State(stub): State<StubService>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    stub.requests.lock().await.push(body);
    (StatusCode::OK, Json(stub.reply.clone()))
}

async fn spawn_service(reply: Value) -> Result<(String, StubService)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let stub = StubService {
        reply,
        requests: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new()
        .fallback(generate_content)
        .layer(DefaultBodyLimit::max(16 * MEGABYTE))
        .with_state(stub.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}"), stub))
}

static KEY_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn gateway_for(endpoint: &str) -> GeminiGateway {
    let var = format!(
        "CHARACTER_STUDIO_SCENARIO_KEY_{}",
        KEY_COUNTER.fetch_add(1, Ordering::SeqCst)
    );
    std::env::set_var(&var, "scenario-key");
    GeminiGateway::new(GatewaySettings {
        endpoint: endpoint.to_string(),
        model: "scenario-model".into(),
        api_key_vars: vec![var],
        request_timeout: Some(Duration::from_secs(10)),
        ..GatewaySettings::default()
    })
}

fn write_jpeg(dir: &std::path::Path, name: &str, len: usize) -> std::path::PathBuf {
    let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xE0];
    bytes.resize(len, 0x11);
    let path = dir.join(name);
    std::fs::write(&path, bytes).expect("write jpeg");
    path
}

#[tokio::test]
async fn upload_select_child_and_generate_png() {
    let x = b"generated-character-bytes";
    let (endpoint, stub) = spawn_service(json!({
        "candidates": [{ "content": { "parts": [
            { "inlineData": { "mimeType": "image/png", "data": STANDARD.encode(x) } }
        ] } }]
    }))
    .await
    .expect("spawn service");

    let dir = tempfile::tempdir().expect("tempdir");
    let photo = write_jpeg(dir.path(), "portrait.jpg", 2 * MEGABYTE);

    let mut session = SessionController::new(gateway_for(&endpoint), UploadPolicy::default());
    session.upload_file(&photo);
    assert!(session.state().error().is_none());
    session.select_age_category(AgeCategory::Child);
    session.generate().await;

    let state = session.state();
    assert!(!state.is_busy());
    assert!(state.error().is_none());
    assert_eq!(
        state.result().map(ImagePayload::to_data_uri),
        Some(format!("data:image/png;base64,{}", STANDARD.encode(x)))
    );

    let requests = stub.requests.lock().await;
    assert_eq!(requests.len(), 1);
    let parts = &requests[0]["contents"][0]["parts"];
    assert_eq!(parts[0]["inlineData"]["mimeType"], "image/jpeg");
    assert!(parts[1]["text"]
        .as_str()
        .expect("prompt")
        .contains("Target age group: Child."));
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let photo = write_jpeg(dir.path(), "huge.jpg", 12 * MEGABYTE);

    let mut session = SessionController::new(
        gateway_for("http://127.0.0.1:9"),
        UploadPolicy::with_max_megabytes(10),
    );
    session.upload_file(&photo);

    let state = session.state();
    assert!(state.source().is_none());
    let error = state.error().expect("error");
    assert_eq!(error.kind, ErrorKind::InputTooLarge);
    assert_eq!(error.user_message(), ErrorKind::InputTooLarge.user_message());
}

#[tokio::test]
async fn empty_service_reply_reports_empty_response() {
    let (endpoint, _stub) = spawn_service(json!({ "candidates": [] }))
        .await
        .expect("spawn service");

    let dir = tempfile::tempdir().expect("tempdir");
    let photo = write_jpeg(dir.path(), "portrait.jpg", 4096);

    let mut session = SessionController::new(gateway_for(&endpoint), UploadPolicy::default());
    session.upload_file(&photo);
    let result_before = session.state().result().cloned();

    session.generate().await;

    let state = session.state();
    assert!(!state.is_busy());
    assert_eq!(state.result().cloned(), result_before);
    assert_eq!(
        state.error().map(|err| err.kind),
        Some(ErrorKind::EmptyResponse)
    );

    session.clear();
    let state = session.state();
    assert!(state.error().is_none());
    assert!(state.result().is_none());
    assert!(state.source().is_some());
    assert_eq!(state.age(), AgeCategory::Adult);
}
