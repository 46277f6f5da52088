// src/models/leads.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

// --- ENUMS ---

// Mapeia o CREATE TYPE lead_status do banco.
// É uma etiqueta, não uma máquina de estados com arestas: qualquer
// estágio pode virar qualquer outro.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "lead_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeadStatus {
    PotentialLead,
    FollowUpEmailSent,
    DiscoveryCallBooked,
    SuccessfulClosure,
    FailedClosure,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 5] = [
        LeadStatus::PotentialLead,
        LeadStatus::FollowUpEmailSent,
        LeadStatus::DiscoveryCallBooked,
        LeadStatus::SuccessfulClosure,
        LeadStatus::FailedClosure,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::PotentialLead => "POTENTIAL_LEAD",
            LeadStatus::FollowUpEmailSent => "FOLLOW_UP_EMAIL_SENT",
            LeadStatus::DiscoveryCallBooked => "DISCOVERY_CALL_BOOKED",
            LeadStatus::SuccessfulClosure => "SUCCESSFUL_CLOSURE",
            LeadStatus::FailedClosure => "FAILED_CLOSURE",
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// O status chega do cliente como string; valores fora do enum viram 400,
// nunca chegam ao banco.
impl FromStr for LeadStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LeadStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or(())
    }
}

// --- LEAD (O Dado) ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    pub id: Uuid,

    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub phone: Option<String>,

    pub service: String,
    pub message: String,

    pub current_status: LeadStatus,

    // Resultado do envio das notificações de intake
    pub email_sent: bool,
    pub email_error: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- HISTÓRICO (A Trilha) ---

// Uma linha da trilha de auditoria. Nunca é alterada depois de criada.
// Quando documenta um e-mail enviado, carrega assunto e corpo.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub id: Uuid,
    pub contact_id: Uuid,

    pub status: LeadStatus,
    pub comment: Option<String>,

    pub email_subject: Option<String>,
    pub email_body: Option<String>,

    // None = gerado pelo sistema (entrada seed do intake)
    pub updated_by: Option<String>,

    pub created_at: DateTime<Utc>,
}

// --- PROJEÇÕES DE LEITURA ---

// Lead + trilha de auditoria. Na tela de detalhe a trilha vem completa em
// ordem cronológica; na listagem paginada vem só a entrada mais recente.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadWithHistory {
    #[serde(flatten)]
    pub submission: ContactSubmission,
    pub status_history: Vec<StatusUpdate>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadPage {
    pub leads: Vec<LeadWithHistory>,
    pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_aceita_todos_os_status_conhecidos() {
        for status in LeadStatus::ALL {
            assert_eq!(status.as_str().parse::<LeadStatus>(), Ok(status));
        }
    }

    #[test]
    fn parse_rejeita_status_desconhecido() {
        assert!("CLOSED_WON".parse::<LeadStatus>().is_err());
        assert!("potential_lead".parse::<LeadStatus>().is_err());
        assert!("".parse::<LeadStatus>().is_err());
    }

    #[test]
    fn serde_usa_o_formato_do_banco() {
        let json = serde_json::to_string(&LeadStatus::DiscoveryCallBooked).unwrap();
        assert_eq!(json, "\"DISCOVERY_CALL_BOOKED\"");

        let back: LeadStatus = serde_json::from_str("\"FAILED_CLOSURE\"").unwrap();
        assert_eq!(back, LeadStatus::FailedClosure);
    }
}
