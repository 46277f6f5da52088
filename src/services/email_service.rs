// src/services/email_service.rs

use askama::Template;
use chrono::Utc;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use thiserror::Error;

use crate::config::EmailConfig;
use crate::models::leads::ContactSubmission;

// --- TEMPLATES (templates/email/*.html) ---

// Alerta interno: um lead novo caiu no funil
#[derive(Template)]
#[template(path = "email/admin_notification.html")]
struct AdminNotificationHtml<'a> {
    name: &'a str,
    email: &'a str,
    company: Option<&'a str>,
    phone: Option<&'a str>,
    service: &'a str,
    message: &'a str,
    submitted_at: &'a str,
}

// Confirmação automática para quem preencheu o formulário
#[derive(Template)]
#[template(path = "email/user_confirmation.html")]
struct UserConfirmationHtml<'a> {
    name: &'a str,
    service: &'a str,
    base_url: &'a str,
}

// Mensagem avulsa escrita pela equipe no painel
#[derive(Template)]
#[template(path = "email/admin_outgoing.html")]
struct AdminOutgoingHtml<'a> {
    recipient_name: &'a str,
    message: &'a str,
    base_url: &'a str,
}

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

// Serviço de e-mails transacionais via SMTP (STARTTLS + credenciais).
#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
    // Caixa que recebe os alertas de lead novo
    contact_address: String,
    base_url: String,
}

impl EmailService {
    pub fn new(config: &EmailConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.clone(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
            contact_address: config.contact_address.clone(),
            base_url: config.base_url.clone(),
        })
    }

    // Os dois e-mails do intake, em sequência: primeiro o alerta interno,
    // e só se ele sair é que o lead recebe a confirmação. Qualquer falha
    // interrompe e volta como Err; quem chama decide o que registrar.
    pub async fn send_intake_emails(
        &self,
        submission: &ContactSubmission,
    ) -> Result<(), EmailError> {
        let submitted_at = Utc::now()
            .format("%A, %B %-d, %Y at %H:%M UTC")
            .to_string();

        let admin_html = AdminNotificationHtml {
            name: &submission.name,
            email: &submission.email,
            company: submission.company.as_deref(),
            phone: submission.phone.as_deref(),
            service: &submission.service,
            message: &submission.message,
            submitted_at: &submitted_at,
        }
        .render()?;

        let subject = format!("New Contact: {} - {}", submission.service, submission.name);
        self.send_html(
            &self.contact_address,
            &subject,
            &admin_html,
            Some(&submission.email),
        )
        .await?;

        let user_html = UserConfirmationHtml {
            name: &submission.name,
            service: &submission.service,
            base_url: &self.base_url,
        }
        .render()?;

        self.send_html(
            &submission.email,
            "Thank you for contacting CosmoBits Technologies",
            &user_html,
            None,
        )
        .await
    }

    // E-mail avulso do painel para um lead
    pub async fn send_outgoing_email(
        &self,
        to: &str,
        recipient_name: &str,
        subject: &str,
        message: &str,
    ) -> Result<(), EmailError> {
        let html = AdminOutgoingHtml {
            recipient_name,
            message,
            base_url: &self.base_url,
        }
        .render()?;

        self.send_html(to, subject, &html, None).await
    }

    async fn send_html(
        &self,
        to: &str,
        subject: &str,
        html_body: &str,
        reply_to: Option<&str>,
    ) -> Result<(), EmailError> {
        let mut builder = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .parse()
                .map_err(|_| EmailError::InvalidAddress(to.to_string()))?)
            .subject(subject);

        if let Some(reply_to) = reply_to {
            builder = builder.reply_to(
                reply_to
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(reply_to.to_string()))?,
            );
        }

        let email = builder.singlepart(
            SinglePart::builder()
                .header(ContentType::TEXT_HTML)
                .body(html_body.to_string()),
        )?;

        self.mailer.send(email).await?;

        tracing::info!(to = %to, subject = %subject, "📧 E-mail enviado");
        Ok(())
    }
}
