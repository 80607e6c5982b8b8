// src/services/mailer.rs

use async_trait::async_trait;
use serde_json::json;

use crate::common::error::AppError;

const SENDGRID_URL: &str = "https://api.sendgrid.com/v3/mail/send";

#[derive(Debug, Clone)]
pub struct Email {
    pub para: String,
    pub assunto: String,
    pub html: String,
}

// Saída de e-mails. O AppState guarda um `Arc<dyn Mailer>`.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn enviar(&self, email: Email) -> Result<(), AppError>;
}

// Envio real pela API v3 do SendGrid
pub struct SendGridMailer {
    http: reqwest::Client,
    api_key: String,
    remetente: String,
}

impl SendGridMailer {
    pub fn new(http: reqwest::Client, api_key: String, remetente: String) -> Self {
        Self { http, api_key, remetente }
    }
}

#[async_trait]
impl Mailer for SendGridMailer {
    async fn enviar(&self, email: Email) -> Result<(), AppError> {
        let body = json!({
            "personalizations": [{ "to": [{ "email": email.para }] }],
            "from": { "email": self.remetente },
            "subject": email.assunto,
            "content": [{ "type": "text/html", "value": email.html }],
        });

        let resp = self
            .http
            .post(SENDGRID_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let detalhe = resp.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("SendGrid respondeu {}: {}", status, detalhe).into());
        }

        tracing::info!("📧 E-mail '{}' enviado para {}", email.assunto, email.para);
        Ok(())
    }
}

// Sem SENDGRID_API_KEY: nada é enviado. O corpo (com o link) só aparece em debug.
pub struct LogMailer;

impl LogMailer {
    fn resumo(email: &Email) -> String {
        format!("Para: {} | Assunto: {}", email.para, email.assunto)
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn enviar(&self, email: Email) -> Result<(), AppError> {
        tracing::warn!("📧 SENDGRID_API_KEY ausente, e-mail não enviado. {}", Self::resumo(&email));
        tracing::debug!("📧 Corpo do e-mail não enviado:\n{}", email.html);
        Ok(())
    }
}

pub fn email_recuperacao(para: &str, link: &str) -> Email {
    Email {
        para: para.to_string(),
        assunto: "Recuperação de Senha - Pizzaria".to_string(),
        html: format!(
            "<p>Você solicitou a recuperação de senha.</p>\
             <p><a href=\"{link}\">Clique aqui para redefinir sua senha</a></p>\
             <p>Este link expira em 15 minutos.</p>"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_de_recuperacao_contem_link() {
        let email = email_recuperacao("maria@gmail.com", "http://front/resetar?token=abc");
        assert_eq!(email.para, "maria@gmail.com");
        assert!(email.html.contains("href=\"http://front/resetar?token=abc\""));
    }

    #[test]
    fn resumo_do_log_nao_expoe_o_link() {
        let email = email_recuperacao("maria@gmail.com", "http://front/resetar?token=eyJhbGciOi.segredo");
        let resumo = LogMailer::resumo(&email);
        assert!(resumo.contains("maria@gmail.com"));
        assert!(!resumo.contains("token="));
    }

    #[tokio::test]
    async fn log_mailer_nunca_falha() {
        assert!(LogMailer.enviar(email_recuperacao("a@b.com", "x")).await.is_ok());
    }
}
