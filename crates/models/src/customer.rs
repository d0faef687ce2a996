use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Customer record as it crosses the HTTP and storage boundaries.
/// Every field may be missing; validation decides whether it is acceptable.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub age: Option<i64>,
    #[serde(default)]
    pub id: Option<i64>,
}

impl Customer {
    /// Roster ordering key. Missing names order before present ones.
    pub fn sort_key(&self) -> (Option<&str>, Option<&str>) {
        (self.last_name.as_deref(), self.first_name.as_deref())
    }
}

/// A customer with every field present.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidCustomer {
    pub last_name: String,
    pub first_name: String,
    pub age: i64,
    pub id: i64,
}

impl ValidCustomer {
    pub fn sort_key(&self) -> (Option<&str>, Option<&str>) {
        (Some(self.last_name.as_str()), Some(self.first_name.as_str()))
    }
}

impl TryFrom<&Customer> for ValidCustomer {
    type Error = ModelError;

    /// Required fields are checked in the order firstName, lastName, age, id.
    fn try_from(c: &Customer) -> Result<Self, Self::Error> {
        let first_name = c.first_name.clone().ok_or(ModelError::MissingField("firstName"))?;
        let last_name = c.last_name.clone().ok_or(ModelError::MissingField("lastName"))?;
        let age = c.age.ok_or(ModelError::MissingField("age"))?;
        let id = c.id.ok_or(ModelError::MissingField("id"))?;
        Ok(Self { last_name, first_name, age, id })
    }
}

impl From<ValidCustomer> for Customer {
    fn from(v: ValidCustomer) -> Self {
        Self {
            last_name: Some(v.last_name),
            first_name: Some(v.first_name),
            age: Some(v.age),
            id: Some(v.id),
        }
    }
}
