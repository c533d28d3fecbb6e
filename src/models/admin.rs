use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "admin_action_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AdminActionType {
    ApproveProduct,
    RejectProduct,
    ApproveStore,
    RejectStore,
}

/// Append-only audit record of a moderation decision.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AdminAction {
    pub id: i32,
    pub action_type: AdminActionType,
    pub target_id: String,
    pub details: String,
    pub admin_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAdminAction {
    pub action_type: AdminActionType,
    pub target_id: String,
    pub details: String,
    pub admin_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminActionQuery {
    pub action_type: Option<AdminActionType>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
