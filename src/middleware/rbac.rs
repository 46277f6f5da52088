// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{common::error::AppError, models::auth::User};

// O Guardião do painel: extrator que só deixa passar ADMIN e SUPER_ADMIN.
// O auth_guard já colocou o User nos extensions; aqui só conferimos o papel.
pub struct RequireAdmin(pub User);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<User>()
            .cloned()
            .ok_or(AppError::InvalidToken)?;

        if !user.role.is_admin() {
            // Mesma resposta genérica do login: sem detalhe de por quê
            return Err(AppError::Forbidden("Access denied".to_string()));
        }

        Ok(RequireAdmin(user))
    }
}
