use std::sync::Arc;

use async_trait::async_trait;
use redis::{aio::MultiplexedConnection, AsyncCommands, Client};
use tracing::info;

use super::KvStore;
use crate::errors::ServiceError;

/// Redis-backed store over a multiplexed async connection.
/// Cloning the connection is cheap; each call works on its own clone.
#[derive(Clone)]
pub struct RedisKvStore {
    conn: MultiplexedConnection,
}

impl RedisKvStore {
    pub async fn connect(url: &str) -> Result<Arc<Self>, ServiceError> {
        let client = Client::open(url).map_err(ServiceError::store)?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(ServiceError::store)?;
        info!("connected to redis");
        Ok(Arc::new(Self { conn }))
    }
}

#[async_trait]
impl KvStore for RedisKvStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, ServiceError> {
        let mut conn = self.conn.clone();
        conn.get::<_, Option<Vec<u8>>>(key).await.map_err(ServiceError::store)
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), ServiceError> {
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(key, value).await.map_err(ServiceError::store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Runs only against a live server: REDIS_URL=redis://127.0.0.1:6379
    #[tokio::test]
    async fn redis_round_trip() -> Result<(), anyhow::Error> {
        let Ok(url) = std::env::var("REDIS_URL") else {
            eprintln!("REDIS_URL missing; skip redis test");
            return Ok(());
        };
        let store = RedisKvStore::connect(&url).await?;
        let key = format!("roster_test_{}", uuid::Uuid::new_v4());
        assert_eq!(store.get(&key).await?, None);
        store.set(&key, b"[]".to_vec()).await?;
        assert_eq!(store.get(&key).await?, Some(b"[]".to_vec()));
        let mut conn = store.conn.clone();
        conn.del::<_, ()>(&key).await?;
        Ok(())
    }

    #[tokio::test]
    async fn rejects_malformed_url() {
        assert!(matches!(RedisKvStore::connect("not a url").await, Err(ServiceError::Store(_))));
    }
}
