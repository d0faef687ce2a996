use std::sync::Arc;

use models::Customer;
use tracing::error;

use crate::errors::ServiceError;
use crate::storage::KvStore;

/// Reads and writes the whole roster as one JSON array under a single key.
#[derive(Clone)]
pub struct CustomerRepository {
    store: Arc<dyn KvStore>,
    key: String,
}

impl CustomerRepository {
    pub fn new(store: Arc<dyn KvStore>, key: impl Into<String>) -> Self {
        Self { store, key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Strict read: an absent key is an empty roster, anything else that goes
    /// wrong is returned to the caller.
    pub async fn try_read_all(&self) -> Result<Vec<Customer>, ServiceError> {
        match self.store.get(&self.key).await? {
            None => Ok(Vec::new()),
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
        }
    }

    /// Strict write: replaces the stored roster.
    pub async fn try_write_all(&self, customers: &[Customer]) -> Result<(), ServiceError> {
        let bytes = serde_json::to_vec(customers)?;
        self.store.set(&self.key, bytes).await
    }

    /// Fail-soft read: errors are logged and read as an empty roster.
    pub async fn read_all(&self) -> Vec<Customer> {
        self.try_read_all().await.unwrap_or_else(|e| {
            error!(key = %self.key, error = %e, "error reading customers");
            Vec::new()
        })
    }

    /// Fail-soft write: errors are logged and otherwise ignored.
    pub async fn write_all(&self, customers: &[Customer]) {
        if let Err(e) = self.try_write_all(customers).await {
            error!(key = %self.key, error = %e, "error writing customers");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryKvStore;

    fn customer(last: &str, first: &str, age: i64, id: i64) -> Customer {
        Customer {
            last_name: Some(last.into()),
            first_name: Some(first.into()),
            age: Some(age),
            id: Some(id),
        }
    }

    #[tokio::test]
    async fn absent_key_reads_empty() {
        let repo = CustomerRepository::new(MemoryKvStore::new(), "customers");
        assert!(repo.read_all().await.is_empty());
    }

    #[tokio::test]
    async fn write_then_read_preserves_order_and_values() {
        let repo = CustomerRepository::new(MemoryKvStore::new(), "customers");
        let roster = vec![
            customer("Z", "Bob", 30, 1),
            Customer { first_name: Some("Partial".into()), ..Default::default() },
            customer("A", "Amy", 25, 2),
        ];
        repo.write_all(&roster).await;
        assert_eq!(repo.read_all().await, roster);
    }

    #[tokio::test]
    async fn persisted_layout_is_camel_case_json_array() -> Result<(), anyhow::Error> {
        let store = MemoryKvStore::new();
        let repo = CustomerRepository::new(store.clone(), "customers");
        repo.write_all(&[customer("A", "Amy", 25, 2)]).await;
        let raw = store.get("customers").await?.expect("written");
        let v: serde_json::Value = serde_json::from_slice(&raw)?;
        assert_eq!(v, serde_json::json!([{"lastName": "A", "firstName": "Amy", "age": 25, "id": 2}]));
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_value_reads_empty_but_strict_read_errors() -> Result<(), anyhow::Error> {
        let store = MemoryKvStore::new();
        store.set("customers", b"{not json".to_vec()).await?;
        let repo = CustomerRepository::new(store, "customers");
        assert!(repo.read_all().await.is_empty());
        assert!(matches!(repo.try_read_all().await, Err(ServiceError::Serialization(_))));
        Ok(())
    }

    #[tokio::test]
    async fn store_failures_are_swallowed() {
        let store = MemoryKvStore::new();
        let repo = CustomerRepository::new(store.clone(), "customers");
        repo.write_all(&[customer("A", "Amy", 25, 2)]).await;

        store.fail_writes(true);
        repo.write_all(&[]).await;
        store.fail_writes(false);
        assert_eq!(repo.read_all().await.len(), 1);

        store.fail_reads(true);
        assert!(repo.read_all().await.is_empty());
        assert!(matches!(repo.try_read_all().await, Err(ServiceError::Store(_))));
    }
}
