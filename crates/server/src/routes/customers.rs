use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use models::Customer;
use serde::Serialize;
use service::customer::BulkAddOutcome;

use crate::errors::JsonApiError;
use crate::routes::AppState;

#[derive(Serialize)]
pub struct CustomerList {
    pub customers: Vec<Customer>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NameLists {
    pub first_names: Vec<Option<String>>,
    pub last_names: Vec<Option<String>>,
}

/// Bulk insert; per-customer rejections are reported in `failed`, not as errors.
pub async fn create_customers(
    State(state): State<AppState>,
    payload: Result<Json<Vec<Customer>>, JsonRejection>,
) -> Result<(StatusCode, Json<BulkAddOutcome>), JsonApiError> {
    let Json(candidates) = payload
        .map_err(|e| JsonApiError::new(e.status(), "Invalid Body", Some(e.body_text())))?;
    let outcome = state.customers.add_customers(candidates).await;
    Ok((StatusCode::CREATED, Json(outcome)))
}

pub async fn list_customers(State(state): State<AppState>) -> Json<CustomerList> {
    Json(CustomerList { customers: state.customers.get_all().await })
}

/// First and last names as parallel lists, in roster order.
pub async fn list_names(State(state): State<AppState>) -> Json<NameLists> {
    let (first_names, last_names) = state.customers.name_lists().await;
    Json(NameLists { first_names, last_names })
}

pub async fn delete_customers(State(state): State<AppState>) -> StatusCode {
    state.customers.delete_all().await;
    StatusCode::NO_CONTENT
}
