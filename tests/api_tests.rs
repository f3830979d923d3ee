use docs_hub_gateway::{serve, AppConfig, AppState, StatusResponse};
use docs_hub_storage::{MemoryCloud, StorageItem};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

struct TestServer {
    base_url: String,
    _stop: oneshot::Sender<()>,
}

impl TestServer {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

// Helper to spawn a memory-backed server on a random port
async fn spawn_server() -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let mut config = AppConfig::default();
    config.server.address = listener.local_addr().unwrap().to_string();
    config.cloud.use_memory_store = true;
    let state = Arc::new(AppState::with_share_links(
        config,
        MemoryCloud::new(base_url.clone()),
    ));

    let (stop, stopped) = oneshot::channel::<()>();
    tokio::spawn(serve(listener, state, async move {
        let _ = stopped.await;
    }));

    TestServer {
        base_url,
        _stop: stop,
    }
}

async fn create_bucket(client: &Client, server: &TestServer, name: &str) {
    let res = client
        .put(server.url("/cloud/bucket"))
        .json(&json!({ "bucket_name": name }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

fn file_part(name: &str, data: &'static [u8]) -> Part {
    Part::bytes(data).file_name(name.to_string())
}

#[tokio::test]
async fn test_bucket_lifecycle() {
    let server = spawn_server().await;
    let client = Client::new();

    // 1. List buckets (should be empty)
    let res = client.get(server.url("/cloud/buckets")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let buckets: Vec<String> = res.json().await.unwrap();
    assert!(buckets.is_empty());

    // 2. Create bucket
    create_bucket(&client, &server, "lifecycle").await;

    // 3. List buckets (should contain it)
    let buckets: Vec<String> = client
        .get(server.url("/cloud/buckets"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(buckets, vec!["lifecycle".to_string()]);

    // 4. Remove bucket
    let res = client
        .delete(server.url("/cloud/lifecycle"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: StatusResponse = res.json().await.unwrap();
    assert_eq!(body.message, "Ok");

    // 5. Removing again fails
    let res = client
        .delete(server.url("/cloud/lifecycle"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_document_lifecycle() {
    let server = spawn_server().await;
    let client = Client::new();
    create_bucket(&client, &server, "docs").await;

    // 1. Upload two files, one into a folder
    let form = Form::new()
        .part("files", file_part("readme.md", b"# Docs"))
        .part("files", file_part("reports/q1.csv", b"a,b\n1,2\n"));
    let res = client
        .put(server.url("/cloud/docs/file/upload"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: StatusResponse = res.json().await.unwrap();
    assert_eq!(body.files.unwrap().iter().filter(|f| f.uploaded).count(), 2);

    // 2. List the root: one file and one folder
    let items: Vec<StorageItem> = client
        .post(server.url("/cloud/docs/files"))
        .json(&json!({ "directory": "" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].file_name, "readme.md");
    assert!(!items[0].is_directory);
    assert_eq!(items[1].file_name, "reports/");
    assert!(items[1].is_directory);

    // 3. Download returns identical bytes
    let res = client
        .post(server.url("/cloud/docs/file/download"))
        .json(&json!({ "file_name": "reports/q1.csv" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers()["content-type"],
        "application/octet-stream"
    );
    assert_eq!(&res.bytes().await.unwrap()[..], b"a,b\n1,2\n");

    // 4. Move, then the source is gone
    let res = client
        .post(server.url("/cloud/docs/file/move"))
        .json(&json!({ "src_path": "reports/q1.csv", "dst_path": "archive/q1.csv" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .post(server.url("/cloud/docs/file/download"))
        .json(&json!({ "file_name": "reports/q1.csv" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // 5. Copy, then both exist
    let res = client
        .post(server.url("/cloud/docs/file/copy"))
        .json(&json!({ "src_path": "archive/q1.csv", "dst_path": "latest.csv" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let items: Vec<StorageItem> = client
        .post(server.url("/cloud/docs/files"))
        .json(&json!({ "directory": "archive/" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].file_name, "archive/q1.csv");
    assert_eq!(items[0].directory_name, "archive/");

    // 6. Remove
    let res = client
        .delete(server.url("/cloud/docs/file/remove"))
        .json(&json!({ "file_name": "latest.csv" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // 7. A bucket that still holds objects cannot be removed
    let res = client.delete(server.url("/cloud/docs")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_edge_cases() {
    let server = spawn_server().await;
    let client = Client::new();
    create_bucket(&client, &server, "uploads").await;

    // Missing bucket
    let form = Form::new().part("files", file_part("a.txt", b"a"));
    let res = client
        .put(server.url("/cloud/missing/file/upload"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // No `files` field
    let form = Form::new().text("comment", "nothing attached");
    let res = client
        .put(server.url("/cloud/uploads/file/upload"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: StatusResponse = res.json().await.unwrap();
    assert_eq!(body.message, "there are no files into multipart form");

    // File 2 of 3 has no file name and is skipped
    let form = Form::new()
        .part("files", file_part("1.txt", b"1"))
        .part("files", Part::bytes(&b"2"[..]))
        .part("files", file_part("3.txt", b"3"));
    let res = client
        .put(server.url("/cloud/uploads/file/upload"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: StatusResponse = res.json().await.unwrap();
    let uploaded: Vec<bool> = body.files.unwrap().iter().map(|f| f.uploaded).collect();
    assert_eq!(uploaded, vec![true, false, true]);

    // An expiry in the past makes the files unavailable at once
    let form = Form::new().part("files", file_part("old.txt", b"old"));
    let res = client
        .put(server.url("/cloud/uploads/file/upload?expired=2001-01-01T00:00:00Z"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let res = client
        .post(server.url("/cloud/uploads/file/download"))
        .json(&json!({ "file_name": "old.txt" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_json() {
    let server = spawn_server().await;
    let client = Client::new();

    let res = client
        .put(server.url("/cloud/bucket"))
        .header("content-type", "application/json")
        .body("{\"bucket_name\":")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: StatusResponse = res.json().await.unwrap();
    assert_eq!(body.status, 400);

    let buckets: Vec<String> = client
        .get(server.url("/cloud/buckets"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(buckets.is_empty());
}

#[tokio::test]
async fn test_share_link_expires() {
    let server = spawn_server().await;
    let client = Client::new();
    create_bucket(&client, &server, "shared").await;

    let form = Form::new().part("files", file_part("note.txt", b"see you soon"));
    client
        .put(server.url("/cloud/shared/file/upload"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    let res = client
        .post(server.url("/cloud/shared/file/share"))
        .json(&json!({ "file_name": "note.txt", "dir_path": "", "expired_secs": 2 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let url = res.json::<StatusResponse>().await.unwrap().message;
    assert!(url.starts_with(&server.url("/shared/shared/note.txt?")));

    // Fetchable before expiry
    let res = client.get(&url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "see you soon");

    // Refused after expiry
    tokio::time::sleep(Duration::from_secs(3)).await;
    let res = client.get(&url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_health_and_request_id() {
    let server = spawn_server().await;
    let client = Client::new();

    let res = client.get(server.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));

    let res = client.get(server.url("/nope")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
