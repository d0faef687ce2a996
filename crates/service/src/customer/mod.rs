//! Customer roster: the store adapter and the directory service on top of it.

pub mod repository;
pub mod service;

pub use repository::CustomerRepository;
pub use service::{BulkAddOutcome, CustomerService};
