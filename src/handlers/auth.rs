// src/handlers/auth.rs

use axum::{Json, extract::State};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::auth::{AuthResponse, GoogleLoginPayload, User},
};

// POST /api/auth/google
//
// Negado é sempre o mesmo 403 genérico: não dizemos se o e-mail está ou
// não em alguma lista.
#[utoipa::path(
    post,
    path = "/api/auth/google",
    tag = "Auth",
    request_body = GoogleLoginPayload,
    responses(
        (status = 200, description = "Sessão criada", body = AuthResponse),
        (status = 401, description = "ID token inválido"),
        (status = 403, description = "Acesso negado")
    )
)]
pub async fn google_login(
    State(app_state): State<AppState>,
    Json(payload): Json<GoogleLoginPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    let token = app_state
        .auth_service
        .sign_in_with_google(&payload.id_token)
        .await?;

    Ok(Json(AuthResponse { token }))
}

// Handler da rota protegida /me
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Usuário da sessão atual", body = User),
        (status = 401, description = "Sem sessão válida")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_me(AuthenticatedUser(user): AuthenticatedUser) -> Json<User> {
    Json(user)
}
