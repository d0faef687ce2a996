use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("customer is missing required field: {0}")]
    MissingField(&'static str),
}
