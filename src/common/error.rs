use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// As mensagens voltadas ao usuário ficam em inglês (o produto é em inglês);
// o detalhe técnico vai só para o log.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Status fora do enum lead_status
    #[error("Status inválido: {0}")]
    InvalidStatus(String),

    #[error("{0}")]
    NotFound(String),

    // E-mail duplicado na allow-list
    #[error("{0}")]
    Conflict(String),

    // Papel insuficiente ou tentativa de remover o super admin
    #[error("{0}")]
    Forbidden(String),

    #[error("Token inválido")]
    InvalidToken,

    // Token de reCAPTCHA ausente ou reprovado; a mensagem vai para o cliente
    #[error("{0}")]
    BotCheckFailed(String),

    // Falha do provedor de e-mail no caminho em que ela É fatal
    #[error("Falha no envio de e-mail: {0}")]
    EmailSendError(String),

    // reCAPTCHA ou Google tokeninfo fora do ar / recusando
    #[error("Falha em serviço externo: {0}")]
    UpstreamError(String),

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "One or more fields are invalid.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::InvalidStatus(_) => (StatusCode::BAD_REQUEST, "Invalid status".to_string()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Invalid or missing authentication token".to_string(),
            ),
            AppError::BotCheckFailed(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::EmailSendError(ref e) => {
                tracing::error!("Erro no envio de e-mail: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to send email".to_string(),
                )
            }
            AppError::UpstreamError(ref e) => {
                tracing::error!("Falha em serviço externo: {}", e);
                (
                    StatusCode::BAD_REQUEST,
                    "Verification failed. Please try again.".to_string(),
                )
            }

            // Todos os outros (DatabaseError, InternalServerError, JwtError)
            // viram 500 opaco. O tracing loga a mensagem detalhada.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong. Please try again later.".to_string(),
                )
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
