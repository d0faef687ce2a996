//! Storage abstractions for service layer
//!
//! The roster lives under a single key of an external key-value store.
//! `KvStore` is the seam; backends are chosen from configuration at startup.

pub mod file;
pub mod memory;
pub mod redis_store;

use std::sync::Arc;

use async_trait::async_trait;
use configs::{StoreBackend, StoreConfig};
use tracing::info;

use crate::errors::ServiceError;

/// Byte-oriented key-value store with the two primitives the roster needs.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, ServiceError>;
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), ServiceError>;
}

/// Open the backend named in `cfg`. The returned handle is shared for the
/// lifetime of the server and released when the last clone is dropped.
pub async fn build_store(cfg: &StoreConfig) -> Result<Arc<dyn KvStore>, ServiceError> {
    let store: Arc<dyn KvStore> = match cfg.backend {
        StoreBackend::Memory => memory::MemoryKvStore::new(),
        StoreBackend::File => file::FileKvStore::new(&cfg.file_path).await?,
        StoreBackend::Redis => redis_store::RedisKvStore::connect(&cfg.redis_url).await?,
    };
    info!(backend = ?cfg.backend, "key-value store opened");
    Ok(store)
}
