//! Integration tests for the operator CRUD surface.

use std::{net::SocketAddr, sync::Arc};

use {
    async_trait::async_trait,
    serde_json::{Value, json},
    tempfile::TempDir,
    tokio::net::TcpListener,
};

use {
    chanlog_access::{AccessGate, AllowListStore},
    chanlog_archive::ArtifactStore,
    chanlog_export::{ConversationSource, ExportPipeline, Notifier},
    chanlog_gateway::{AppState, build_app},
};

struct NoopSource;

#[async_trait]
impl ConversationSource for NoopSource {
    async fn history(&self, _channel_id: &str) -> anyhow::Result<Vec<Value>> {
        Ok(Vec::new())
    }

    async fn replies(&self, _channel_id: &str, _thread_ts: &[String]) -> anyhow::Result<Vec<Value>> {
        Ok(Vec::new())
    }

    async fn users(&self, _team_id: &str) -> anyhow::Result<Vec<Value>> {
        Ok(Vec::new())
    }
}

struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify(&self, _response_url: &str, _text: &str) -> anyhow::Result<()> {
        Ok(())
    }
}

async fn start_admin_server() -> (SocketAddr, TempDir) {
    let data_dir = TempDir::new().unwrap();
    let allow_lists = Arc::new(AllowListStore::open(data_dir.path().join("access")).unwrap());
    let artifacts = Arc::new(ArtifactStore::new(data_dir.path().join("exports")));
    let pipeline = Arc::new(ExportPipeline::new(
        AccessGate::new(Arc::clone(&allow_lists)),
        Arc::clone(&artifacts),
        Arc::new(NoopSource),
        Arc::new(NoopNotifier),
        "http://localhost:5000",
    ));

    let app = build_app(AppState {
        allow_lists,
        artifacts,
        pipeline,
    });
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, data_dir)
}

#[tokio::test]
async fn health_endpoint_reports_healthy() {
    let (addr, _dir) = start_admin_server().await;

    let resp = reqwest::get(format!("http://{addr}/health")).await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "chanlog");
}

/// Add, list, and remove a user through the HTTP surface.
#[tokio::test]
async fn user_roundtrip() {
    let (addr, _dir) = start_admin_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("http://{addr}/admin/users"))
        .json(&json!({ "user_id": "U123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "User U123 added successfully");
    assert_eq!(body["allowed_users"], json!(["U123"]));

    let resp = client
        .get(format!("http://{addr}/admin/users"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["count"], 1);
    assert_eq!(body["allowed_users"], json!(["U123"]));

    let resp = client
        .delete(format!("http://{addr}/admin/users/U123"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "User U123 removed successfully");
    assert_eq!(body["allowed_users"], json!([]));
}

/// The listing is sorted regardless of insertion order.
#[tokio::test]
async fn channel_listing_is_sorted() {
    let (addr, _dir) = start_admin_server().await;
    let client = reqwest::Client::new();

    for id in ["C9", "C1", "C5"] {
        client
            .post(format!("http://{addr}/admin/channels"))
            .json(&json!({ "channel_id": id }))
            .send()
            .await
            .unwrap();
    }

    let resp = client
        .get(format!("http://{addr}/admin/channels"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["allowed_channels"], json!(["C1", "C5", "C9"]));
}

/// Identifiers with the wrong prefix never reach the record file.
#[tokio::test]
async fn wrong_prefix_is_rejected() {
    let (addr, _dir) = start_admin_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("http://{addr}/admin/users"))
        .json(&json!({ "user_id": "C123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(
        body["error"].as_str().unwrap().contains("Must start with 'U'"),
        "unexpected error: {body}"
    );

    let resp = client
        .get(format!("http://{addr}/admin/users"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn missing_body_field_is_a_bad_request() {
    let (addr, _dir) = start_admin_server().await;

    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/admin/channels"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "channel_id is required");
}

#[tokio::test]
async fn removing_an_absent_user_is_not_found() {
    let (addr, _dir) = start_admin_server().await;

    let resp = reqwest::Client::new()
        .delete(format!("http://{addr}/admin/users/U404"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "User U404 not found");
}

/// Duplicate adds are idempotent and keep the list deduplicated.
#[tokio::test]
async fn duplicate_add_is_idempotent() {
    let (addr, _dir) = start_admin_server().await;
    let client = reqwest::Client::new();

    for _ in 0..2 {
        let resp = client
            .post(format!("http://{addr}/admin/users"))
            .json(&json!({ "user_id": "U7" }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
    }

    let resp = client
        .get(format!("http://{addr}/admin/users"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["allowed_users"], json!(["U7"]));
}

#[tokio::test]
async fn status_snapshots_both_lists() {
    let (addr, _dir) = start_admin_server().await;
    let client = reqwest::Client::new();

    client
        .post(format!("http://{addr}/admin/users"))
        .json(&json!({ "user_id": "U1" }))
        .send()
        .await
        .unwrap();
    for id in ["C1", "C2"] {
        client
            .post(format!("http://{addr}/admin/channels"))
            .json(&json!({ "channel_id": id }))
            .send()
            .await
            .unwrap();
    }

    let resp = client
        .get(format!("http://{addr}/admin/status"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["user_count"], 1);
    assert_eq!(body["channel_count"], 2);
    assert_eq!(body["allowed_users"], json!(["U1"]));
    assert_eq!(body["allowed_channels"], json!(["C1", "C2"]));
}
