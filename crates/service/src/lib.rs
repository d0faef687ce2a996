//! Service layer for the customer roster.
//! - `storage`: the key-value seam and its backends.
//! - `customer`: the roster store adapter and the directory service.
//! - `errors`: store failures and the reasons a customer is rejected.

pub mod errors;
pub mod storage;
pub mod customer;
