//! # Docs Hub Gateway
//!
//! JSON-over-HTTP gateway for buckets and documents kept in S3-compatible
//! object storage.
//!
//! This crate provides:
//! - **Cloud API**: bucket management, listing, copy/move, upload, download,
//!   removal and share links under `/cloud`
//! - **Share links**: served by the gateway itself when the in-memory backend
//!   is active
//! - **Lifecycle**: layered configuration, request logging and bounded
//!   graceful shutdown
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                   HTTP Clients                      │
//! └─────────────────────────┬───────────────────────────┘
//!                           │
//! ┌─────────────────────────▼───────────────────────────┐
//! │                 Docs Hub Gateway                    │
//! ├─────────────────────────────────────────────────────┤
//! │  Request ID │ Logging │ CORS │ Timeout │ Body limit │
//! ├─────────────────────────────────────────────────────┤
//! │               /cloud API handlers                   │
//! ├─────────────────────────────────────────────────────┤
//! │             docs-hub-storage (DocumentHub)          │
//! ├─────────────────────────────────────────────────────┤
//! │            S3Cloud  │  MemoryCloud                  │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod forms;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::{AppConfig, ServerConfig};
pub use error::ApiError;
pub use forms::StatusResponse;
pub use server::{run_server, serve, shutdown_signal};
pub use state::AppState;
