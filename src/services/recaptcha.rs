// src/services/recaptcha.rs

use serde::Deserialize;

use crate::common::error::AppError;

const SITEVERIFY_URL: &str = "https://www.google.com/recaptcha/api/siteverify";

// Abaixo disso o Google considera o tráfego suspeito
const MIN_SCORE: f64 = 0.5;

#[derive(Debug, Deserialize)]
struct SiteverifyResponse {
    success: bool,
    // v3 devolve score; v2 não manda o campo
    score: Option<f64>,
}

// Verificador de reCAPTCHA. O formulário público só chega ao banco
// depois que o token do cliente passa aqui.
#[derive(Clone)]
pub struct RecaptchaVerifier {
    http: reqwest::Client,
    secret: Option<String>,
}

impl RecaptchaVerifier {
    pub fn new(secret: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            secret,
        }
    }

    // Ok(true) = humano, Ok(false) = reprovado. Erro de transporte vira
    // UpstreamError (o intake responde como verificação reprovada).
    pub async fn verify(&self, token: &str) -> Result<bool, AppError> {
        let Some(secret) = &self.secret else {
            // Sem secret configurado (dev local): deixa passar, mas avisa
            tracing::warn!("⚠️ RECAPTCHA_SECRET_KEY ausente; verificação ignorada");
            return Ok(true);
        };

        let response = self
            .http
            .post(SITEVERIFY_URL)
            .form(&[("secret", secret.as_str()), ("response", token)])
            .send()
            .await
            .map_err(|e| AppError::UpstreamError(format!("reCAPTCHA request failed: {e}")))?;

        let body: SiteverifyResponse = response
            .json()
            .await
            .map_err(|e| AppError::UpstreamError(format!("reCAPTCHA response invalid: {e}")))?;

        Ok(is_human(&body))
    }
}

fn is_human(response: &SiteverifyResponse) -> bool {
    response.success && response.score.unwrap_or(0.0) >= MIN_SCORE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aprova_sucesso_com_score_alto() {
        assert!(is_human(&SiteverifyResponse {
            success: true,
            score: Some(0.9)
        }));
        assert!(is_human(&SiteverifyResponse {
            success: true,
            score: Some(0.5)
        }));
    }

    #[test]
    fn reprova_score_baixo() {
        assert!(!is_human(&SiteverifyResponse {
            success: true,
            score: Some(0.3)
        }));
    }

    #[test]
    fn reprova_sem_sucesso_mesmo_com_score() {
        assert!(!is_human(&SiteverifyResponse {
            success: false,
            score: Some(0.9)
        }));
    }

    #[test]
    fn reprova_quando_nao_ha_score() {
        // v2 não manda score; sem ele não dá para confiar
        assert!(!is_human(&SiteverifyResponse {
            success: true,
            score: None
        }));
    }
}
