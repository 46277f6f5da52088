// src/handlers/contact.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError, config::AppState, db::lead_repo::NewSubmission,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactPayload {
    #[validate(length(min = 1, message = "Missing required fields"))]
    #[schema(example = "Jane Doe")]
    pub name: String,

    #[validate(email(message = "Invalid email"))]
    #[schema(example = "jane@ex.com")]
    pub email: String,

    #[schema(example = "Acme Ltd")]
    pub company: Option<String>,
    #[schema(example = "+254 700 000000")]
    pub phone: Option<String>,

    #[validate(length(min = 1, message = "Missing required fields"))]
    #[schema(example = "General Inquiry")]
    pub service: String,

    #[validate(length(min = 1, message = "Missing required fields"))]
    #[schema(example = "Hello there, need help.")]
    pub message: String,

    pub recaptcha_token: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    pub success: bool,
    pub id: Uuid,
    pub email_sent: bool,
    #[schema(example = "Your message has been sent successfully!")]
    pub message: String,
}

// POST /api/contact
//
// A ordem importa: o lead vai para o banco PRIMEIRO; os e-mails são
// best-effort e nunca derrubam a resposta de sucesso.
#[utoipa::path(
    post,
    path = "/api/contact",
    tag = "Contact",
    request_body = ContactPayload,
    responses(
        (status = 200, description = "Lead salvo (com ou sem e-mail enviado)", body = ContactResponse),
        (status = 400, description = "Campos faltando ou reCAPTCHA reprovado"),
        (status = 500, description = "Falha ao salvar o lead")
    )
)]
pub async fn submit_contact(
    State(app_state): State<AppState>,
    Json(payload): Json<ContactPayload>,
) -> Result<impl IntoResponse, AppError> {
    // 1. Bot-check antes de tocar no banco
    let token = payload
        .recaptcha_token
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::BotCheckFailed("reCAPTCHA verification required".to_string()))?;

    if !app_state.recaptcha.verify(token).await? {
        return Err(AppError::BotCheckFailed(
            "reCAPTCHA verification failed. Please try again.".to_string(),
        ));
    }

    // 2. Valida os obrigatórios
    payload.validate().map_err(AppError::ValidationError)?;

    // 3. Salva o lead + entrada seed do histórico (caminho prioritário)
    let submission = app_state
        .lead_service
        .create_submission(NewSubmission {
            name: payload.name,
            email: payload.email,
            company: payload.company.filter(|c| !c.is_empty()),
            phone: payload.phone.filter(|p| !p.is_empty()),
            service: payload.service,
            message: payload.message,
        })
        .await?;

    // 4. Tenta os e-mails; falha vira registro, não erro
    let (email_sent, email_error) = match app_state
        .email_service
        .send_intake_emails(&submission)
        .await
    {
        Ok(()) => (true, None),
        Err(e) => {
            tracing::error!(id = %submission.id, "Falha nos e-mails de intake: {}", e);
            (false, Some(e.to_string()))
        }
    };

    app_state
        .lead_service
        .mark_email_outcome(submission.id, email_sent, email_error.as_deref())
        .await;

    // 5. Sucesso de qualquer jeito: o que importa é que o lead foi salvo
    let message = if email_sent {
        "Your message has been sent successfully!"
    } else {
        "Your information has been saved. We will contact you soon."
    };

    Ok((
        StatusCode::OK,
        Json(ContactResponse {
            success: true,
            id: submission.id,
            email_sent,
            message: message.to_string(),
        }),
    ))
}
