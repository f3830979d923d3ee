//! Application state

use crate::config::AppConfig;
use docs_hub_storage::{DocumentHub, MemoryCloud, S3Cloud};
use tracing::{info, warn};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Process configuration
    pub config: AppConfig,
    /// Storage façade
    pub hub: DocumentHub,
    /// Present when share links are signed and served by this process
    pub share_links: Option<MemoryCloud>,
}

impl AppState {
    /// State over an arbitrary backend
    pub fn new(config: AppConfig, hub: DocumentHub) -> Self {
        Self {
            config,
            hub,
            share_links: None,
        }
    }

    /// State over the in-memory backend, which also serves its share links
    pub fn with_share_links(config: AppConfig, memory: MemoryCloud) -> Self {
        Self {
            config,
            hub: DocumentHub::new(memory.clone()),
            share_links: Some(memory),
        }
    }

    /// Pick the backend the configuration asks for
    pub fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        if config.cloud.use_memory_store {
            warn!("Using in-memory storage (data will NOT persist)");
            let memory = MemoryCloud::new(config.server.share_base_url());
            return Ok(Self::with_share_links(config, memory));
        }

        let cloud = S3Cloud::new(&config.cloud)?;
        info!(endpoint = %config.cloud.endpoint_url(), "Storage mode: S3-compatible");
        Ok(Self::new(config, DocumentHub::new(cloud)))
    }
}
