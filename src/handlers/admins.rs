// src/handlers/admins.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError, config::AppState, middleware::rbac::RequireAdmin,
    models::admin::AllowedAdmin,
};

// GET /api/admin/allowed-admins
#[utoipa::path(
    get,
    path = "/api/admin/allowed-admins",
    tag = "Team",
    responses(
        (status = 200, description = "Allow-list completa, mais recentes primeiro", body = Vec<AllowedAdmin>),
        (status = 401, description = "Sem sessão válida")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_allowed_admins(
    State(app_state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
) -> Result<impl IntoResponse, AppError> {
    let admins = app_state.admin_service.list_allowed_admins().await?;

    Ok((StatusCode::OK, Json(admins)))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddAllowedAdminPayload {
    #[schema(example = "new@x.com")]
    pub email: String,

    #[schema(example = "New Person")]
    pub name: Option<String>,
}

// POST /api/admin/allowed-admins
//
// O papel do ator é conferido dentro do AdminService: só SUPER_ADMIN
// muta a allow-list.
#[utoipa::path(
    post,
    path = "/api/admin/allowed-admins",
    tag = "Team",
    request_body = AddAllowedAdminPayload,
    responses(
        (status = 201, description = "E-mail adicionado à allow-list", body = AllowedAdmin),
        (status = 400, description = "E-mail malformado"),
        (status = 403, description = "Ator não é SUPER_ADMIN"),
        (status = 409, description = "E-mail já está na lista")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_allowed_admin(
    State(app_state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Json(payload): Json<AddAllowedAdminPayload>,
) -> Result<impl IntoResponse, AppError> {
    let admin = app_state
        .admin_service
        .add_allowed_admin(&payload.email, payload.name.as_deref(), &user)
        .await?;

    Ok((StatusCode::CREATED, Json(admin)))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RemoveAllowedAdminResponse {
    pub success: bool,
}

// DELETE /api/admin/allowed-admins/{id}
#[utoipa::path(
    delete,
    path = "/api/admin/allowed-admins/{id}",
    tag = "Team",
    params(("id" = Uuid, Path, description = "ID da entrada da allow-list")),
    responses(
        (status = 200, description = "Entrada removida", body = RemoveAllowedAdminResponse),
        (status = 403, description = "Ator não é SUPER_ADMIN, ou tentou remover o super admin"),
        (status = 404, description = "Entrada não existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn remove_allowed_admin(
    State(app_state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .admin_service
        .remove_allowed_admin(id, &user)
        .await?;

    Ok((
        StatusCode::OK,
        Json(RemoveAllowedAdminResponse { success: true }),
    ))
}
