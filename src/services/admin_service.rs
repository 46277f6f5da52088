// src/services/admin_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::AllowedAdminRepository,
    models::{
        admin::AllowedAdmin,
        auth::{User, UserRole},
    },
};

// Gestão da allow-list. A precondição de papel mora AQUI, não na rota:
// todo método mutante recebe o ator e exige SUPER_ADMIN.
#[derive(Clone)]
pub struct AdminService {
    repo: AllowedAdminRepository,
    // Sempre em minúsculas (normalizado no AppState::new)
    super_admin_email: String,
}

impl AdminService {
    pub fn new(repo: AllowedAdminRepository, super_admin_email: String) -> Self {
        Self {
            repo,
            super_admin_email,
        }
    }

    pub async fn list_allowed_admins(&self) -> Result<Vec<AllowedAdmin>, AppError> {
        self.repo.list_all().await
    }

    pub async fn add_allowed_admin(
        &self,
        email: &str,
        name: Option<&str>,
        actor: &User,
    ) -> Result<AllowedAdmin, AppError> {
        require_super_admin(actor)?;

        let email = email.trim().to_lowercase();
        if !is_valid_email(&email) {
            return Err(validation_error("email", "Invalid email format"));
        }

        // A chave única do banco pega duplicatas; o repo traduz para Conflict
        self.repo.insert(&email, name, &actor.email).await
    }

    pub async fn remove_allowed_admin(&self, id: Uuid, actor: &User) -> Result<(), AppError> {
        require_super_admin(actor)?;

        let existing = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Allowed admin not found".to_string()))?;

        // O super admin nunca sai da lista, nem por engano
        if existing.email == self.super_admin_email {
            return Err(AppError::Forbidden(
                "Cannot remove the super admin".to_string(),
            ));
        }

        self.repo.delete(id).await
    }
}

fn require_super_admin(actor: &User) -> Result<(), AppError> {
    if actor.role != UserRole::SuperAdmin {
        return Err(AppError::Forbidden(
            "Only the super admin can manage the allowed list".to_string(),
        ));
    }
    Ok(())
}

// O formato exigido é local@dominio.tld (mesma regra do formulário da tela
// de equipe): nada de espaços, um único @, e o domínio precisa de um ponto.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

fn validation_error(field: &'static str, message: &'static str) -> AppError {
    let mut errors = validator::ValidationErrors::new();
    let mut err = validator::ValidationError::new("invalid");
    err.message = Some(message.into());
    errors.add(field.into(), err);
    AppError::ValidationError(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::{User, UserRole};
    use chrono::Utc;

    fn user(role: UserRole) -> User {
        User {
            id: Uuid::new_v4(),
            email: "someone@cosmobits.tech".to_string(),
            name: None,
            role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn so_super_admin_passa_na_precondicao() {
        assert!(require_super_admin(&user(UserRole::SuperAdmin)).is_ok());
        assert!(matches!(
            require_super_admin(&user(UserRole::Admin)),
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            require_super_admin(&user(UserRole::User)),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn valida_o_formato_local_arroba_dominio_tld() {
        assert!(is_valid_email("new@x.com"));
        assert!(is_valid_email("first.last@sub.domain.co.ke"));

        assert!(!is_valid_email(""));
        assert!(!is_valid_email("semarroba.com"));
        assert!(!is_valid_email("@x.com"));
        assert!(!is_valid_email("a@b"));          // domínio sem ponto
        assert!(!is_valid_email("a@.com"));       // host vazio
        assert!(!is_valid_email("a@b."));         // tld vazio
        assert!(!is_valid_email("a b@x.com"));    // espaço
        assert!(!is_valid_email("a@b@c.com"));    // dois @
    }
}
