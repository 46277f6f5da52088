// src/models/admin.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Uma entrada da allow-list: e-mail pré-autorizado a virar ADMIN no
// próximo login. O e-mail é sempre normalizado para minúsculas.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AllowedAdmin {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub added_by: String,
    pub created_at: DateTime<Utc>,
}
