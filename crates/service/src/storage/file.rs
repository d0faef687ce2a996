use std::{collections::HashMap, io::ErrorKind, path::PathBuf, sync::Arc};

use async_trait::async_trait;
use tokio::{fs, sync::RwLock};

use super::KvStore;
use crate::errors::ServiceError;

/// JSON file-backed key-value store.
///
/// Persists a `HashMap<String, String>` to a JSON file; values must be UTF-8.
/// Intended for single-node setups where running Redis is overkill.
pub struct FileKvStore {
    inner: RwLock<HashMap<String, String>>,
    file_path: PathBuf,
}

impl FileKvStore {
    /// Initialize the store from a path. Creates the file with an empty map if missing.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(ServiceError::store)?;
        }

        let map: HashMap<String, String> = match fs::read(&file_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() != ErrorKind::NotFound => {
                return Err(ServiceError::Store(format!("cannot read {}: {e}", file_path.display())));
            }
            Err(_) => {
                let empty: HashMap<String, String> = HashMap::new();
                fs::write(&file_path, serde_json::to_vec(&empty)?)
                    .await
                    .map_err(ServiceError::store)?;
                empty
            }
        };

        Ok(Arc::new(Self { inner: RwLock::new(map), file_path }))
    }

    async fn save(&self, map: &HashMap<String, String>) -> Result<(), ServiceError> {
        let data = serde_json::to_vec(map)?;
        fs::write(&self.file_path, data).await.map_err(ServiceError::store)
    }
}

#[async_trait]
impl KvStore for FileKvStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, ServiceError> {
        let map = self.inner.read().await;
        Ok(map.get(key).map(|v| v.as_bytes().to_vec()))
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), ServiceError> {
        let value = String::from_utf8(value)
            .map_err(|_| ServiceError::Store(format!("value for `{key}` is not valid UTF-8")))?;
        // Hold the write lock across the flush so file order matches memory order.
        let mut map = self.inner.write().await;
        map.insert(key.to_string(), value);
        self.save(&map).await
    }
}
