use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryOption {
    pub label: String,
    pub price: Decimal,
    pub days: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: i32,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    #[sqlx(json)]
    pub delivery_options: Vec<DeliveryOption>,
    pub is_active_store: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStoreRequest {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub delivery_options: Vec<DeliveryOption>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStoreRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub delivery_options: Option<Vec<DeliveryOption>>,
}

/// Validated input for inserting a pending store.
#[derive(Debug, Clone)]
pub struct NewStore {
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub delivery_options: Vec<DeliveryOption>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreRejection {
    pub store_id: i32,
    pub products_removed: u64,
}
