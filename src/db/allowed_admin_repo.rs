// src/db/allowed_admin_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::admin::AllowedAdmin};

// Repositório da allow-list de admins. Todo e-mail chega aqui já em minúsculas.
#[derive(Clone)]
pub struct AllowedAdminRepository {
    pool: PgPool,
}

impl AllowedAdminRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Mais recentes primeiro, como a tela de equipe exibe
    pub async fn list_all(&self) -> Result<Vec<AllowedAdmin>, AppError> {
        let admins = sqlx::query_as::<_, AllowedAdmin>(
            "SELECT * FROM allowed_admins ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(admins)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<AllowedAdmin>, AppError> {
        let admin = sqlx::query_as::<_, AllowedAdmin>("SELECT * FROM allowed_admins WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(admin)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<AllowedAdmin>, AppError> {
        let admin = sqlx::query_as::<_, AllowedAdmin>("SELECT * FROM allowed_admins WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(admin)
    }

    pub async fn insert(
        &self,
        email: &str,
        name: Option<&str>,
        added_by: &str,
    ) -> Result<AllowedAdmin, AppError> {
        let admin = sqlx::query_as::<_, AllowedAdmin>(
            "INSERT INTO allowed_admins (email, name, added_by) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(email)
        .bind(name)
        .bind(added_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // Converte violação de chave única em um erro mais amigável
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::Conflict(
                        "This email is already in the allowed list".to_string(),
                    );
                }
            }
            e.into()
        })?;

        Ok(admin)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM allowed_admins WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
