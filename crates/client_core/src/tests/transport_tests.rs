use super::*;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    routing::post,
    Router,
};
use std::sync::Arc;
use tokio::{
    net::TcpListener,
    sync::{oneshot, Mutex},
};

#[derive(Debug)]
struct CapturedPart {
    name: String,
    file_name: Option<String>,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

#[derive(Clone)]
struct ServerState {
    status: StatusCode,
    body: Vec<u8>,
    tx: Arc<Mutex<Option<oneshot::Sender<Vec<CapturedPart>>>>>,
}

async fn handle_predict(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> (StatusCode, Vec<u8>) {
    let mut parts = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
        parts.push(CapturedPart {
            name,
            file_name,
            content_type,
            bytes,
        });
    }
    if let Some(tx) = state.tx.lock().await.take() {
        let _ = tx.send(parts);
    }
    (state.status, state.body.clone())
}

async fn spawn_predict_server(
    status: StatusCode,
    body: &[u8],
) -> Result<(String, oneshot::Receiver<Vec<CapturedPart>>)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let (tx, rx) = oneshot::channel();
    let state = ServerState {
        status,
        body: body.to_vec(),
        tx: Arc::new(Mutex::new(Some(tx))),
    };
    let app = Router::new()
        .route("/api/predict", post(handle_predict))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}"), rx))
}

#[tokio::test]
async fn posts_single_file_part_and_returns_body_untouched() {
    let archive = b"PK\x03\x04 opaque archive bytes".to_vec();
    let (server_url, parts_rx) = spawn_predict_server(StatusCode::OK, &archive)
        .await
        .expect("spawn server");
    let service = HttpPredictionService::new(server_url);

    let body = service
        .predict("flights.xlsx", b"spreadsheet-bytes".to_vec())
        .await
        .expect("predict");
    assert_eq!(body, archive);

    let parts = parts_rx.await.expect("captured parts");
    assert_eq!(parts.len(), 1, "unexpected parts: {parts:?}");
    let part = &parts[0];
    assert_eq!(part.name, "file");
    assert_eq!(part.file_name.as_deref(), Some("flights.xlsx"));
    assert_eq!(part.bytes, b"spreadsheet-bytes");
    assert!(
        part.content_type
            .as_deref()
            .is_some_and(|mime| mime.contains("spreadsheetml")),
        "unexpected content type: {:?}",
        part.content_type
    );
}

#[tokio::test]
async fn tolerates_trailing_slash_in_base_url() {
    let (server_url, _parts_rx) = spawn_predict_server(StatusCode::OK, b"zip")
        .await
        .expect("spawn server");
    let service = HttpPredictionService::new(format!("{server_url}/"));

    let body = service
        .predict("flights.xlsx", b"sheet".to_vec())
        .await
        .expect("predict");
    assert_eq!(body, b"zip");
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    for status in [
        StatusCode::BAD_REQUEST,
        StatusCode::UNPROCESSABLE_ENTITY,
        StatusCode::INTERNAL_SERVER_ERROR,
    ] {
        let (server_url, _parts_rx) = spawn_predict_server(status, b"{\"detail\":\"nope\"}")
            .await
            .expect("spawn server");
        let service = HttpPredictionService::new(server_url);

        let err = service
            .predict("flights.xlsx", b"sheet".to_vec())
            .await
            .expect_err("must fail");
        assert!(
            err.to_string().contains(status.as_str()),
            "status {status} missing from error: {err:#}"
        );
    }
}

#[tokio::test]
async fn unreachable_service_is_an_error() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let service = HttpPredictionService::new(format!("http://{addr}"));
    let err = service
        .predict("flights.xlsx", b"sheet".to_vec())
        .await
        .expect_err("must fail");
    assert!(
        err.to_string().contains("failed to reach prediction service"),
        "unexpected error: {err:#}"
    );
}
