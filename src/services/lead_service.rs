// src/services/lead_service.rs

use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::LeadRepository,
    db::lead_repo::NewSubmission,
    models::leads::{ContactSubmission, LeadPage, LeadStatus, LeadWithHistory, Pagination, StatusUpdate},
};

// Comentário fixo da entrada seed criada junto com o lead
pub const SEED_COMMENT: &str = "New contact form submission received";

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_LIMIT: i64 = 10;

#[derive(Debug, Default)]
pub struct ListParams {
    pub search: Option<String>,
    pub status: Option<LeadStatus>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

// O coração do funil: mantém contact_submissions e a trilha de auditoria
// sempre em sincronia (toda mudança de estágio = uma linha de histórico,
// na mesma transação).
#[derive(Clone)]
pub struct LeadService {
    repo: LeadRepository,
    pool: PgPool,
}

impl LeadService {
    pub fn new(repo: LeadRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    // Cria o lead + a entrada seed do histórico, atomicamente.
    // Este é o caminho prioritário do intake: precisa estar durável no banco
    // ANTES de qualquer tentativa de e-mail.
    pub async fn create_submission(&self, new: NewSubmission) -> Result<ContactSubmission, AppError> {
        check_required(&new)?;

        let mut tx = self.pool.begin().await?;

        let submission = self.repo.insert_submission(&mut *tx, &new).await?;

        // Entrada seed: gerada pelo sistema, sem ator
        self.repo
            .insert_status_update(
                &mut *tx,
                submission.id,
                LeadStatus::PotentialLead,
                Some(SEED_COMMENT),
                None,
                None,
                None,
            )
            .await?;

        tx.commit().await?;

        tracing::info!(id = %submission.id, "🎯 Novo lead salvo");
        Ok(submission)
    }

    // Troca o estágio do lead e registra quem trocou e por quê.
    // O funil não impõe ordem: qualquer estágio pode virar qualquer outro.
    pub async fn update_status(
        &self,
        id: Uuid,
        new_status: &str,
        comment: Option<&str>,
        actor: &str,
    ) -> Result<LeadWithHistory, AppError> {
        let status: LeadStatus = new_status
            .parse()
            .map_err(|_| AppError::InvalidStatus(new_status.to_string()))?;

        let mut tx = self.pool.begin().await?;

        self.repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Lead not found".to_string()))?;

        let submission = self.repo.set_current_status(&mut *tx, id, status).await?;

        self.repo
            .insert_status_update(&mut *tx, id, status, comment, None, None, Some(actor))
            .await?;

        tx.commit().await?;

        let history = self.repo.list_history(&self.pool, id).await?;
        Ok(LeadWithHistory {
            submission,
            status_history: history,
        })
    }

    // Documenta um e-mail enviado pelo painel: entra no histórico com o
    // estágio ATUAL (não muda nada no funil) e carrega assunto + corpo.
    pub async fn record_email_sent(
        &self,
        id: Uuid,
        subject: &str,
        body: &str,
        actor: &str,
    ) -> Result<StatusUpdate, AppError> {
        let mut tx = self.pool.begin().await?;

        let submission = self
            .repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Lead not found".to_string()))?;

        let entry = self
            .repo
            .insert_status_update(
                &mut *tx,
                id,
                submission.current_status,
                Some(&email_comment(subject)),
                Some(subject),
                Some(body),
                Some(actor),
            )
            .await?;

        self.repo.touch_updated_at(&mut *tx, id).await?;

        tx.commit().await?;
        Ok(entry)
    }

    // Bookkeeping do desfecho das notificações de intake. Best-effort:
    // o lead já está salvo, então falha aqui só gera log.
    pub async fn mark_email_outcome(&self, id: Uuid, email_sent: bool, email_error: Option<&str>) {
        if let Err(e) = self.repo.set_email_outcome(id, email_sent, email_error).await {
            tracing::error!(id = %id, "Falha ao registrar desfecho do e-mail: {}", e);
        }
    }

    pub async fn get_with_history(&self, id: Uuid) -> Result<LeadWithHistory, AppError> {
        let submission = self
            .repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Lead not found".to_string()))?;

        let history = self.repo.list_history(&self.pool, id).await?;

        Ok(LeadWithHistory {
            submission,
            status_history: history,
        })
    }

    // Listagem paginada com busca. Página além do fim = lista vazia, sem erro.
    pub async fn list_paged(&self, params: ListParams) -> Result<LeadPage, AppError> {
        let (page, limit) = clamp_paging(params.page, params.limit);
        let search = params.search.as_deref().filter(|s| !s.trim().is_empty());

        let total = self.repo.count_filtered(search, params.status).await?;

        let submissions = self
            .repo
            .list_filtered(search, params.status, limit, (page - 1) * limit)
            .await?;

        let ids: Vec<Uuid> = submissions.iter().map(|s| s.id).collect();
        let mut latest: HashMap<Uuid, StatusUpdate> = self
            .repo
            .latest_history_entries(&ids)
            .await?
            .into_iter()
            .map(|entry| (entry.contact_id, entry))
            .collect();

        let leads = submissions
            .into_iter()
            .map(|submission| {
                let history = latest.remove(&submission.id).into_iter().collect();
                LeadWithHistory {
                    submission,
                    status_history: history,
                }
            })
            .collect();

        Ok(LeadPage {
            leads,
            pagination: Pagination {
                page,
                limit,
                total,
                total_pages: total_pages(total, limit),
            },
        })
    }
}

// Comentário derivado do assunto, igual ao que a trilha sempre mostrou
pub fn email_comment(subject: &str) -> String {
    format!("Email sent: \"{subject}\"")
}

// page/limit precisam ser positivos; valores ausentes ou fora disso caem
// nos padrões (1 / 10)
fn clamp_paging(page: Option<i64>, limit: Option<i64>) -> (i64, i64) {
    let page = page.unwrap_or(DEFAULT_PAGE).max(1);
    let limit = limit.unwrap_or(DEFAULT_LIMIT).max(1);
    (page, limit)
}

fn total_pages(total: i64, limit: i64) -> i64 {
    if total == 0 { 0 } else { (total + limit - 1) / limit }
}

// O formulário valida na borda com `validator`, mas o service re-checa os
// obrigatórios: nenhum chamador consegue criar lead sem eles.
fn check_required(new: &NewSubmission) -> Result<(), AppError> {
    let mut errors = validator::ValidationErrors::new();

    for (field, value) in [
        ("name", &new.name),
        ("email", &new.email),
        ("service", &new.service),
        ("message", &new.message),
    ] {
        if value.trim().is_empty() {
            let mut err = validator::ValidationError::new("required");
            err.message = Some("Missing required fields".into());
            errors.add(field.into(), err);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::ValidationError(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(name: &str, email: &str, service: &str, message: &str) -> NewSubmission {
        NewSubmission {
            name: name.to_string(),
            email: email.to_string(),
            company: None,
            phone: None,
            service: service.to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn check_required_aceita_payload_completo() {
        let new = submission(
            "Jane Doe",
            "jane@ex.com",
            "General Inquiry",
            "Hello there, need help.",
        );
        assert!(check_required(&new).is_ok());
    }

    #[test]
    fn check_required_rejeita_campos_vazios() {
        let new = submission("", "jane@ex.com", "General Inquiry", "   ");
        let err = check_required(&new).unwrap_err();

        match err {
            AppError::ValidationError(errors) => {
                let fields = errors.field_errors();
                assert!(fields.contains_key("name"));
                assert!(fields.contains_key("message"));
                assert!(!fields.contains_key("email"));
            }
            other => panic!("esperava ValidationError, veio {other:?}"),
        }
    }

    #[test]
    fn comentario_do_email_carrega_o_assunto() {
        assert_eq!(
            email_comment("Proposal follow-up"),
            "Email sent: \"Proposal follow-up\""
        );
    }

    #[test]
    fn paginacao_usa_padroes_e_corrige_valores_invalidos() {
        assert_eq!(clamp_paging(None, None), (1, 10));
        assert_eq!(clamp_paging(Some(3), Some(25)), (3, 25));
        assert_eq!(clamp_paging(Some(0), Some(-5)), (1, 1));
    }

    #[test]
    fn total_pages_arredonda_para_cima() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
    }
}
