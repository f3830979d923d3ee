//! Basic usage of the Docs Hub storage layer
//!
//! This demo:
//! - Creates a bucket
//! - Uploads documents, one of them expiring
//! - Lists a folder one level at a time
//! - Moves and shares a document
//!
//! Run against the in-memory store:   cargo run --example basic_usage
//! Run against MinIO on localhost:    cargo run --example basic_usage -- --s3

use bytes::Bytes;
use chrono::{Duration as ChronoDuration, Utc};
use docs_hub_storage::{CloudConfig, DocumentHub, MemoryCloud, S3Cloud};
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let hub = if std::env::args().any(|arg| arg == "--s3") {
        DocumentHub::new(S3Cloud::new(&CloudConfig::default())?)
    } else {
        DocumentHub::new(MemoryCloud::new("http://localhost:2866"))
    };
    let cloud = hub.cloud();

    println!("Creating bucket 'demo-docs'...");
    if let Err(e) = cloud.create_bucket("demo-docs").await {
        println!("   {}", e);
    }

    println!("\nUploading documents...");
    cloud
        .upload_file("demo-docs", "readme.md", Bytes::from_static(b"# Demo"))
        .await?;
    cloud
        .upload_file("demo-docs", "reports/2024/q1.csv", Bytes::from_static(b"month,total\n"))
        .await?;
    cloud
        .upload_expiring(
            "demo-docs",
            "tmp/session.log",
            Bytes::from_static(b"short lived"),
            Utc::now() + ChronoDuration::hours(1),
        )
        .await?;

    for prefix in ["", "reports/", "reports/2024/"] {
        println!("\nListing '{}':", prefix);
        for item in cloud.list_files("demo-docs", prefix).await? {
            let kind = if item.is_directory { "dir " } else { "file" };
            println!("   [{}] {}", kind, item.file_name);
        }
    }

    println!("\nMoving reports/2024/q1.csv -> archive/q1.csv");
    cloud
        .move_file("demo-docs", "reports/2024/q1.csv", "archive/q1.csv")
        .await?;

    let url = cloud
        .share_url("demo-docs", "archive/q1.csv", Duration::from_secs(3600))
        .await?;
    println!("\nShare link (1h): {}", url);

    let listing = cloud.list_files("demo-docs", "archive/").await?;
    println!("\n{}", serde_json::to_string_pretty(&listing)?);

    Ok(())
}
