// src/handlers/leads.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::RequireAdmin,
    models::leads::{LeadPage, LeadStatus, LeadWithHistory},
    services::lead_service::ListParams,
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListLeadsQuery {
    /// Página (começa em 1)
    pub page: Option<i64>,
    /// Itens por página
    pub limit: Option<i64>,
    /// Busca em nome, e-mail, empresa e telefone
    pub search: Option<String>,
    /// Filtro exato de estágio (ex: POTENTIAL_LEAD)
    pub status: Option<String>,
}

// GET /api/admin/leads
#[utoipa::path(
    get,
    path = "/api/admin/leads",
    tag = "Leads",
    params(ListLeadsQuery),
    responses(
        (status = 200, description = "Página de leads com a última entrada do histórico", body = LeadPage),
        (status = 400, description = "Filtro de status inválido"),
        (status = 401, description = "Sem sessão válida")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_leads(
    State(app_state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Query(query): Query<ListLeadsQuery>,
) -> Result<impl IntoResponse, AppError> {
    // Filtro de status vazio = sem filtro; valor fora do enum = 400
    let status = match query.status.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => Some(
            raw.parse::<LeadStatus>()
                .map_err(|_| AppError::InvalidStatus(raw.to_string()))?,
        ),
        None => None,
    };

    let page = app_state
        .lead_service
        .list_paged(ListParams {
            search: query.search,
            status,
            page: query.page,
            limit: query.limit,
        })
        .await?;

    Ok((StatusCode::OK, Json(page)))
}

// GET /api/admin/leads/{id}
#[utoipa::path(
    get,
    path = "/api/admin/leads/{id}",
    tag = "Leads",
    params(("id" = Uuid, Path, description = "ID do lead")),
    responses(
        (status = 200, description = "Lead com a trilha completa em ordem cronológica", body = LeadWithHistory),
        (status = 404, description = "Lead não existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_lead(
    State(app_state): State<AppState>,
    RequireAdmin(_user): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let lead = app_state.lead_service.get_with_history(id).await?;

    Ok((StatusCode::OK, Json(lead)))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusPayload {
    // String mesmo: valor fora do enum vira 400, não 422 do serde
    #[schema(example = "DISCOVERY_CALL_BOOKED")]
    pub status: String,

    #[schema(example = "Booked for Friday")]
    pub comment: Option<String>,
}

// PATCH /api/admin/leads/{id}
#[utoipa::path(
    patch,
    path = "/api/admin/leads/{id}",
    tag = "Leads",
    params(("id" = Uuid, Path, description = "ID do lead")),
    request_body = UpdateStatusPayload,
    responses(
        (status = 200, description = "Lead atualizado, com a trilha completa", body = LeadWithHistory),
        (status = 400, description = "Status inválido"),
        (status = 404, description = "Lead não existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_lead_status(
    State(app_state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    let lead = app_state
        .lead_service
        .update_status(id, &payload.status, payload.comment.as_deref(), &user.email)
        .await?;

    Ok((StatusCode::OK, Json(lead)))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailPayload {
    #[validate(length(min = 1, message = "Subject and message are required"))]
    #[schema(example = "Proposal follow-up")]
    pub subject: String,

    #[validate(length(min = 1, message = "Subject and message are required"))]
    #[schema(example = "Hi Jane, following up on our call...")]
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SendEmailResponse {
    pub success: bool,
}

// POST /api/admin/leads/{id}/email
//
// Aqui a falha do provedor É fatal (a equipe precisa saber que não saiu);
// o histórico só ganha a entrada depois que o envio deu certo.
#[utoipa::path(
    post,
    path = "/api/admin/leads/{id}/email",
    tag = "Leads",
    params(("id" = Uuid, Path, description = "ID do lead")),
    request_body = SendEmailPayload,
    responses(
        (status = 200, description = "E-mail enviado e registrado no histórico", body = SendEmailResponse),
        (status = 400, description = "Assunto ou mensagem faltando"),
        (status = 404, description = "Lead não existe"),
        (status = 500, description = "Provedor de e-mail recusou")
    ),
    security(("api_jwt" = []))
)]
pub async fn send_lead_email(
    State(app_state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Path(id): Path<Uuid>,
    Json(payload): Json<SendEmailPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let lead = app_state.lead_service.get_with_history(id).await?;

    app_state
        .email_service
        .send_outgoing_email(
            &lead.submission.email,
            &lead.submission.name,
            &payload.subject,
            &payload.message,
        )
        .await
        .map_err(|e| AppError::EmailSendError(e.to_string()))?;

    // Documenta o envio na trilha (estágio atual, assunto e corpo)
    app_state
        .lead_service
        .record_email_sent(id, &payload.subject, &payload.message, &user.email)
        .await?;

    Ok((StatusCode::OK, Json(SendEmailResponse { success: true })))
}
