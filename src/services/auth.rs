// src/services/auth.rs

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{AllowedAdminRepository, UserRepository},
    models::auth::{Claims, User, UserRole},
    services::google::GoogleVerifier,
};

// Decide quem entra no painel e com qual papel.
// O e-mail do super admin é configuração injetada no startup, nunca uma
// linha editável do banco: assim ninguém consegue se trancar para fora.
#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    allowed_admin_repo: AllowedAdminRepository,
    google: GoogleVerifier,
    jwt_secret: String,
    // Sempre em minúsculas (normalizado no AppState::new)
    super_admin_email: String,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        allowed_admin_repo: AllowedAdminRepository,
        google: GoogleVerifier,
        jwt_secret: String,
        super_admin_email: String,
    ) -> Self {
        Self {
            user_repo,
            allowed_admin_repo,
            google,
            jwt_secret,
            super_admin_email,
        }
    }

    // A regra de acesso: super admin, OU conta já promovida, OU allow-list.
    // Qualquer outra coisa (inclusive e-mail vazio) é negado.
    pub async fn can_sign_in(&self, email: &str) -> Result<bool, AppError> {
        let email = email.trim().to_lowercase();
        if email.is_empty() {
            return Ok(false);
        }

        if email == self.super_admin_email {
            return Ok(true);
        }

        if let Some(user) = self.user_repo.find_by_email(&email).await? {
            if user.role.is_admin() {
                return Ok(true);
            }
        }

        Ok(self.allowed_admin_repo.find_by_email(&email).await?.is_some())
    }

    // Fluxo completo do login: ID token do Google -> e-mail verificado ->
    // gate de acesso -> conta (criada no primeiro login) -> JWT nosso.
    pub async fn sign_in_with_google(&self, id_token: &str) -> Result<String, AppError> {
        let profile = self.google.verify(id_token).await?;
        let email = profile.email.trim().to_lowercase();

        if !self.can_sign_in(&email).await? {
            // Mesma resposta para todo e-mail negado; nada indica se ele
            // está ou não em alguma lista.
            return Err(AppError::Forbidden("Access denied".to_string()));
        }

        let user = match self.user_repo.find_by_email(&email).await? {
            Some(user) => user,
            None => self.create_on_first_sign_in(&email, profile.name.as_deref()).await?,
        };

        self.create_token(user.id)
    }

    // Promoção única: o papel é decidido aqui e nunca é rebaixado depois.
    // Mudanças futuras na allow-list não mexem em contas já criadas.
    async fn create_on_first_sign_in(
        &self,
        email: &str,
        name: Option<&str>,
    ) -> Result<User, AppError> {
        let allow_listed = self.allowed_admin_repo.find_by_email(email).await?.is_some();
        let role = resolve_role(email, &self.super_admin_email, allow_listed);

        match self.user_repo.create_user(email, name, role).await {
            Ok(user) => {
                tracing::info!(email = %email, role = ?role, "👤 Conta criada no primeiro login");
                Ok(user)
            }
            // Dois primeiros logins ao mesmo tempo: o perdedor relê a conta
            Err(AppError::Conflict(_)) => self
                .user_repo
                .find_by_email(email)
                .await?
                .ok_or_else(|| AppError::InternalServerError(anyhow::anyhow!("user vanished"))),
            Err(e) => Err(e),
        }
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        self.user_repo
            .find_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)
    }

    fn create_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        let claims = Claims {
            sub: user_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}

// Papel atribuído no primeiro login
pub fn resolve_role(email: &str, super_admin_email: &str, allow_listed: bool) -> UserRole {
    if email == super_admin_email {
        UserRole::SuperAdmin
    } else if allow_listed {
        UserRole::Admin
    } else {
        UserRole::User
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn super_admin_ganha_o_papel_maximo() {
        assert_eq!(
            resolve_role("super@cosmobits.tech", "super@cosmobits.tech", false),
            UserRole::SuperAdmin
        );
        // Mesmo estando também na allow-list
        assert_eq!(
            resolve_role("super@cosmobits.tech", "super@cosmobits.tech", true),
            UserRole::SuperAdmin
        );
    }

    #[test]
    fn allow_list_promove_para_admin() {
        assert_eq!(
            resolve_role("new@x.com", "super@cosmobits.tech", true),
            UserRole::Admin
        );
    }

    #[test]
    fn desconhecido_fica_como_user() {
        assert_eq!(
            resolve_role("random@x.com", "super@cosmobits.tech", false),
            UserRole::User
        );
    }

    #[test]
    fn papeis_admin_enxergam_o_painel() {
        assert!(UserRole::Admin.is_admin());
        assert!(UserRole::SuperAdmin.is_admin());
        assert!(!UserRole::User.is_admin());
    }
}
