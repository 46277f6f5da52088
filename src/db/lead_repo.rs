// src/db/lead_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::leads::{ContactSubmission, LeadStatus, StatusUpdate},
};

// Campos obrigatórios já validados na borda; o repositório só persiste.
#[derive(Debug)]
pub struct NewSubmission {
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub service: String,
    pub message: String,
}

// O repositório de leads, responsável por contact_submissions e status_updates.
// Os métodos de escrita recebem um executor genérico para que o service
// possa passar `&mut *tx` e manter tudo na mesma transação.
#[derive(Clone)]
pub struct LeadRepository {
    pool: PgPool,
}

impl LeadRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert_submission<'e, E>(
        &self,
        executor: E,
        new: &NewSubmission,
    ) -> Result<ContactSubmission, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let submission = sqlx::query_as::<_, ContactSubmission>(
            r#"
            INSERT INTO contact_submissions (name, email, company, phone, service, message)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.company)
        .bind(&new.phone)
        .bind(&new.service)
        .bind(&new.message)
        .fetch_one(executor)
        .await?;

        Ok(submission)
    }

    // Acrescenta uma linha à trilha de auditoria. É o ÚNICO jeito de escrever
    // em status_updates; nada nunca atualiza ou apaga linhas lá.
    pub async fn insert_status_update<'e, E>(
        &self,
        executor: E,
        contact_id: Uuid,
        status: LeadStatus,
        comment: Option<&str>,
        email_subject: Option<&str>,
        email_body: Option<&str>,
        updated_by: Option<&str>,
    ) -> Result<StatusUpdate, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entry = sqlx::query_as::<_, StatusUpdate>(
            r#"
            INSERT INTO status_updates (contact_id, status, comment, email_subject, email_body, updated_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(contact_id)
        .bind(status)
        .bind(comment)
        .bind(email_subject)
        .bind(email_body)
        .bind(updated_by)
        .fetch_one(executor)
        .await?;

        Ok(entry)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<ContactSubmission>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let submission =
            sqlx::query_as::<_, ContactSubmission>("SELECT * FROM contact_submissions WHERE id = $1")
                .bind(id)
                .fetch_optional(executor)
                .await?;

        Ok(submission)
    }

    // Troca o estágio atual e carimba updated_at. A linha de histórico
    // correspondente é inserida pelo service dentro da mesma transação.
    pub async fn set_current_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: LeadStatus,
    ) -> Result<ContactSubmission, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let submission = sqlx::query_as::<_, ContactSubmission>(
            r#"
            UPDATE contact_submissions
            SET current_status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_one(executor)
        .await?;

        Ok(submission)
    }

    pub async fn touch_updated_at<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE contact_submissions SET updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(())
    }

    // Registra o desfecho das notificações de intake (best-effort)
    pub async fn set_email_outcome(
        &self,
        id: Uuid,
        email_sent: bool,
        email_error: Option<&str>,
    ) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE contact_submissions SET email_sent = $2, email_error = $3 WHERE id = $1",
        )
        .bind(id)
        .bind(email_sent)
        .bind(email_error)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // Trilha completa, em ordem cronológica (a tela de detalhe mostra a linha do tempo)
    pub async fn list_history<'e, E>(
        &self,
        executor: E,
        contact_id: Uuid,
    ) -> Result<Vec<StatusUpdate>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let history = sqlx::query_as::<_, StatusUpdate>(
            "SELECT * FROM status_updates WHERE contact_id = $1 ORDER BY created_at ASC",
        )
        .bind(contact_id)
        .fetch_all(executor)
        .await?;

        Ok(history)
    }

    // Só a entrada mais recente de cada lead da página (resumo da listagem)
    pub async fn latest_history_entries(
        &self,
        contact_ids: &[Uuid],
    ) -> Result<Vec<StatusUpdate>, AppError> {
        let entries = sqlx::query_as::<_, StatusUpdate>(
            r#"
            SELECT DISTINCT ON (contact_id) *
            FROM status_updates
            WHERE contact_id = ANY($1)
            ORDER BY contact_id, created_at DESC
            "#,
        )
        .bind(contact_ids.to_vec())
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    // Filtro de texto (OR sobre nome/e-mail/empresa/telefone) combinado com
    // filtro exato de status. Os dois são opcionais: NULL desliga a cláusula.
    pub async fn count_filtered(
        &self,
        search: Option<&str>,
        status: Option<LeadStatus>,
    ) -> Result<i64, AppError> {
        let pattern = search.map(|s| format!("%{}%", s));

        let (total,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM contact_submissions
            WHERE ($1::text IS NULL
                   OR name ILIKE $1 OR email ILIKE $1 OR company ILIKE $1 OR phone ILIKE $1)
              AND ($2::lead_status IS NULL OR current_status = $2)
            "#,
        )
        .bind(&pattern)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    pub async fn list_filtered(
        &self,
        search: Option<&str>,
        status: Option<LeadStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ContactSubmission>, AppError> {
        let pattern = search.map(|s| format!("%{}%", s));

        let leads = sqlx::query_as::<_, ContactSubmission>(
            r#"
            SELECT *
            FROM contact_submissions
            WHERE ($1::text IS NULL
                   OR name ILIKE $1 OR email ILIKE $1 OR company ILIKE $1 OR phone ILIKE $1)
              AND ($2::lead_status IS NULL OR current_status = $2)
            ORDER BY updated_at DESC, created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(&pattern)
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(leads)
    }
}
