// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Contact (público) ---
        handlers::contact::submit_contact,

        // --- Auth ---
        handlers::auth::google_login,
        handlers::auth::get_me,

        // --- Leads ---
        handlers::leads::list_leads,
        handlers::leads::get_lead,
        handlers::leads::update_lead_status,
        handlers::leads::send_lead_email,

        // --- Team ---
        handlers::admins::list_allowed_admins,
        handlers::admins::add_allowed_admin,
        handlers::admins::remove_allowed_admin,
    ),
    components(
        schemas(
            // --- Leads ---
            models::leads::LeadStatus,
            models::leads::ContactSubmission,
            models::leads::StatusUpdate,
            models::leads::LeadWithHistory,
            models::leads::LeadPage,
            models::leads::Pagination,

            // --- Auth ---
            models::auth::UserRole,
            models::auth::User,
            models::auth::GoogleLoginPayload,
            models::auth::AuthResponse,

            // --- Team ---
            models::admin::AllowedAdmin,

            // --- Payloads ---
            handlers::contact::ContactPayload,
            handlers::contact::ContactResponse,
            handlers::leads::UpdateStatusPayload,
            handlers::leads::SendEmailPayload,
            handlers::leads::SendEmailResponse,
            handlers::admins::AddAllowedAdminPayload,
            handlers::admins::RemoveAllowedAdminResponse,
        )
    ),
    tags(
        (name = "Contact", description = "Formulário público de contato"),
        (name = "Auth", description = "Login via Google e sessão do painel"),
        (name = "Leads", description = "Funil de leads e trilha de auditoria"),
        (name = "Team", description = "Allow-list de admins (só SUPER_ADMIN muta)")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
