use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("store error: {0}")]
    Store(String),
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl ServiceError {
    pub fn store(e: impl std::fmt::Display) -> Self { Self::Store(e.to_string()) }
}

impl From<serde_json::Error> for ServiceError {
    fn from(e: serde_json::Error) -> Self { Self::Serialization(e.to_string()) }
}

/// Reason a candidate customer was kept out of the roster.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationFailure {
    #[error("customer is missing required field: {0}")]
    MissingField(&'static str),
    #[error("customer has invalid age: {0}")]
    Underage(i64),
    #[error("customer with ID {0} already exists")]
    DuplicateId(i64),
    #[error("customer with name {last_name}, {first_name} already exists")]
    DuplicateName { last_name: String, first_name: String },
}

impl From<models::errors::ModelError> for ValidationFailure {
    fn from(e: models::errors::ModelError) -> Self {
        match e {
            models::errors::ModelError::MissingField(field) => Self::MissingField(field),
        }
    }
}
