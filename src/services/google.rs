// src/services/google.rs

use serde::Deserialize;

use crate::common::error::AppError;

const TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

// O que o login nos entrega: um e-mail verificado pelo Google (e o nome,
// quando vem). É a única coisa que o resto da autorização consome.
#[derive(Debug, Clone)]
pub struct GoogleProfile {
    pub email: String,
    pub name: Option<String>,
}

// Resposta do endpoint tokeninfo. email_verified chega como string "true".
#[derive(Debug, Deserialize)]
struct TokenInfo {
    aud: String,
    email: Option<String>,
    email_verified: Option<String>,
    name: Option<String>,
}

// Valida o ID token que o frontend recebeu do Google.
// Delegamos a checagem de assinatura ao próprio Google (tokeninfo) e
// conferimos aqui só o que é nosso: audience e e-mail verificado.
#[derive(Clone)]
pub struct GoogleVerifier {
    http: reqwest::Client,
    client_id: String,
}

impl GoogleVerifier {
    pub fn new(client_id: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            client_id,
        }
    }

    pub async fn verify(&self, id_token: &str) -> Result<GoogleProfile, AppError> {
        let response = self
            .http
            .get(TOKENINFO_URL)
            .query(&[("id_token", id_token)])
            .send()
            .await
            .map_err(|e| AppError::UpstreamError(format!("Google tokeninfo failed: {e}")))?;

        // Token expirado/adulterado: o Google responde 4xx
        if !response.status().is_success() {
            return Err(AppError::InvalidToken);
        }

        let info: TokenInfo = response
            .json()
            .await
            .map_err(|e| AppError::UpstreamError(format!("Google tokeninfo invalid: {e}")))?;

        check_token_info(info, &self.client_id)
    }
}

fn check_token_info(info: TokenInfo, client_id: &str) -> Result<GoogleProfile, AppError> {
    // Token emitido para outro app não vale aqui
    if info.aud != client_id {
        return Err(AppError::InvalidToken);
    }

    if info.email_verified.as_deref() != Some("true") {
        return Err(AppError::InvalidToken);
    }

    let email = info.email.ok_or(AppError::InvalidToken)?;

    Ok(GoogleProfile {
        email,
        name: info.name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(aud: &str, email: Option<&str>, verified: Option<&str>) -> TokenInfo {
        TokenInfo {
            aud: aud.to_string(),
            email: email.map(str::to_string),
            email_verified: verified.map(str::to_string),
            name: Some("Staff Person".to_string()),
        }
    }

    #[test]
    fn aceita_token_do_nosso_app_com_email_verificado() {
        let profile =
            check_token_info(info("meu-app", Some("staff@cosmobits.tech"), Some("true")), "meu-app")
                .unwrap();
        assert_eq!(profile.email, "staff@cosmobits.tech");
    }

    #[test]
    fn rejeita_audience_errada() {
        let result =
            check_token_info(info("outro-app", Some("staff@cosmobits.tech"), Some("true")), "meu-app");
        assert!(matches!(result, Err(AppError::InvalidToken)));
    }

    #[test]
    fn rejeita_email_nao_verificado() {
        let result =
            check_token_info(info("meu-app", Some("staff@cosmobits.tech"), Some("false")), "meu-app");
        assert!(matches!(result, Err(AppError::InvalidToken)));

        let result = check_token_info(info("meu-app", Some("staff@cosmobits.tech"), None), "meu-app");
        assert!(matches!(result, Err(AppError::InvalidToken)));
    }

    #[test]
    fn rejeita_token_sem_email() {
        let result = check_token_info(info("meu-app", None, Some("true")), "meu-app");
        assert!(matches!(result, Err(AppError::InvalidToken)));
    }
}
