use models::{Customer, ValidCustomer};
use serde::Serialize;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info, instrument, warn};

use crate::customer::repository::CustomerRepository;
use crate::errors::ValidationFailure;

const MIN_AGE: i64 = 18;

/// Result of a bulk insert. Both lists keep the input order.
#[derive(Debug, Default, Clone, Serialize, PartialEq, Eq)]
pub struct BulkAddOutcome {
    pub inserted: Vec<Customer>,
    pub failed: Vec<Customer>,
}

/// Directory of customers kept sorted by (lastName, firstName).
///
/// Every bulk insert is a sequence of whole-roster read-validate-write
/// cycles. Unless `serialize_writes` is enabled, concurrent bulk inserts and
/// clears may interleave and lose updates, admit duplicates, or bring back
/// customers that were just cleared.
pub struct CustomerService {
    repo: CustomerRepository,
    write_lock: Option<Mutex<()>>,
}

impl CustomerService {
    pub fn new(repo: CustomerRepository) -> Self {
        Self { repo, write_lock: None }
    }

    /// Hold a process-wide lock for the duration of each bulk insert and clear.
    pub fn with_serialized_writes(mut self, on: bool) -> Self {
        self.write_lock = on.then(|| Mutex::new(()));
        self
    }

    async fn write_guard(&self) -> Option<MutexGuard<'_, ()>> {
        match &self.write_lock {
            Some(lock) => Some(lock.lock().await),
            None => None,
        }
    }

    /// Check a candidate against the field rules and the current roster.
    pub fn validate(customer: &Customer, existing: &[Customer]) -> Result<ValidCustomer, ValidationFailure> {
        let valid = ValidCustomer::try_from(customer)?;

        if valid.age < MIN_AGE {
            return Err(ValidationFailure::Underage(valid.age));
        }
        if existing.iter().any(|c| c.id == Some(valid.id)) {
            return Err(ValidationFailure::DuplicateId(valid.id));
        }
        if existing.iter().any(|c| c.sort_key() == valid.sort_key()) {
            return Err(ValidationFailure::DuplicateName {
                last_name: valid.last_name,
                first_name: valid.first_name,
            });
        }
        Ok(valid)
    }

    /// Insert before the first entry whose name key is not less than the new one.
    pub fn insert_in_order(customer: ValidCustomer, mut roster: Vec<Customer>) -> Vec<Customer> {
        let pos = roster
            .iter()
            .position(|c| c.sort_key() >= customer.sort_key())
            .unwrap_or(roster.len());
        roster.insert(pos, customer.into());
        roster
    }

    /// Validate and insert each candidate in input order. Each candidate sees
    /// the roster as left by the ones before it; failures never stop the batch.
    #[instrument(skip_all, fields(candidates = candidates.len()))]
    pub async fn add_customers(&self, candidates: Vec<Customer>) -> BulkAddOutcome {
        let _guard = self.write_guard().await;

        let mut outcome = BulkAddOutcome::default();
        for candidate in candidates {
            let roster = self.repo.read_all().await;
            match Self::validate(&candidate, &roster) {
                Ok(valid) => {
                    let roster = Self::insert_in_order(valid, roster);
                    self.repo.write_all(&roster).await;
                    debug!(id = ?candidate.id, "customer inserted");
                    outcome.inserted.push(candidate);
                }
                Err(reason) => {
                    warn!(%reason, "customer rejected");
                    outcome.failed.push(candidate);
                }
            }
        }
        info!(inserted = outcome.inserted.len(), failed = outcome.failed.len(), "bulk add finished");
        outcome
    }

    pub async fn get_all(&self) -> Vec<Customer> {
        self.repo.read_all().await
    }

    /// First and last names as parallel lists, in roster order.
    pub async fn name_lists(&self) -> (Vec<Option<String>>, Vec<Option<String>>) {
        self.repo
            .read_all()
            .await
            .into_iter()
            .map(|c| (c.first_name, c.last_name))
            .unzip()
    }

    pub async fn delete_all(&self) {
        let _guard = self.write_guard().await;
        self.repo.write_all(&[]).await;
        info!(key = self.repo.key(), "roster cleared");
    }
}
