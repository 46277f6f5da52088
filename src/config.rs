// src/config.rs

use sqlx::{PgPool, postgres::PgPoolOptions};
use std::{env, time::Duration};

use crate::db::{AllowedAdminRepository, LeadRepository, UserRepository};
use crate::services::{
    admin_service::AdminService, auth::AuthService, email_service::EmailService,
    google::GoogleVerifier, lead_service::LeadService, recaptcha::RecaptchaVerifier,
};

// Configuração do SMTP e dos links que aparecem nos e-mails
#[derive(Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub from_address: String,
    // Caixa que recebe os alertas de lead novo (a mesma do super admin)
    pub contact_address: String,
    pub base_url: String,
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub lead_service: LeadService,
    pub auth_service: AuthService,
    pub admin_service: AdminService,
    pub email_service: EmailService,
    pub recaptcha: RecaptchaVerifier,
}

impl AppState {
    // Carrega as configurações, conecta no banco e monta o gráfico de
    // dependências. Se algo obrigatório faltar, a aplicação não sobe.
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");
        let google_client_id =
            env::var("GOOGLE_CLIENT_ID").expect("GOOGLE_CLIENT_ID deve ser definido");

        // CONTACT_EMAIL faz papel duplo: destino dos alertas de lead novo e
        // e-mail do super admin. Normalizado uma única vez, aqui.
        let contact_email = env::var("CONTACT_EMAIL")
            .expect("CONTACT_EMAIL deve ser definido")
            .trim()
            .to_lowercase();

        // Sem a secret o reCAPTCHA fica desligado (dev local)
        let recaptcha_secret = env::var("RECAPTCHA_SECRET_KEY").ok();

        let email_config = EmailConfig {
            smtp_host: env::var("SMTP_HOST").expect("SMTP_HOST deve ser definido"),
            smtp_port: env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(587),
            smtp_username: env::var("SMTP_USERNAME").expect("SMTP_USERNAME deve ser definido"),
            smtp_password: env::var("SMTP_PASSWORD").expect("SMTP_PASSWORD deve ser definido"),
            from_address: env::var("EMAIL_FROM")
                .unwrap_or_else(|_| "CosmoBits Technologies <hello@cosmobits.tech>".to_string()),
            contact_address: contact_email.clone(),
            base_url: env::var("BASE_URL")
                .unwrap_or_else(|_| "https://cosmobits.tech".to_string()),
        };

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let lead_repo = LeadRepository::new(db_pool.clone());
        let user_repo = UserRepository::new(db_pool.clone());
        let allowed_admin_repo = AllowedAdminRepository::new(db_pool.clone());

        let lead_service = LeadService::new(lead_repo, db_pool.clone());
        let auth_service = AuthService::new(
            user_repo,
            allowed_admin_repo.clone(),
            GoogleVerifier::new(google_client_id),
            jwt_secret,
            contact_email.clone(),
        );
        let admin_service = AdminService::new(allowed_admin_repo, contact_email);
        let email_service = EmailService::new(&email_config)?;
        let recaptcha = RecaptchaVerifier::new(recaptcha_secret);

        Ok(Self {
            db_pool,
            lead_service,
            auth_service,
            admin_service,
            email_service,
            recaptcha,
        })
    }
}
