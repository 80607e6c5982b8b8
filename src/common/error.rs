// src/common/error.rs

use std::any::Any;
use std::sync::OnceLock;

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

// Definido uma única vez no bootstrap (APP_ENV=development).
static MODO_DESENVOLVIMENTO: OnceLock<bool> = OnceLock::new();

pub fn definir_modo_desenvolvimento(ativo: bool) {
    let _ = MODO_DESENVOLVIMENTO.set(ativo);
}

fn modo_desenvolvimento() -> bool {
    MODO_DESENVOLVIMENTO.get().copied().unwrap_or(false)
}

// O tipo de erro único da aplicação. Cada variante sabe o seu status HTTP.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Corpo da requisição inválido: {0}")]
    JsonRejection(#[from] JsonRejection),

    #[error("Parâmetro de rota inválido: {0}")]
    PathRejection(#[from] PathRejection),

    #[error("Parâmetros de consulta inválidos: {0}")]
    QueryRejection(#[from] QueryRejection),

    #[error("{0}")]
    BadRequest(String),

    #[error("E-mail ou senha inválidos.")]
    InvalidCredentials,

    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    // Erro HTTP devolvido pelo gateway: o status e o corpo são repassados ao cliente
    #[error("Erro na API do Asaas (status {status})")]
    Upstream { status: StatusCode, detalhe: Value },

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("Erro de comunicação HTTP: {0}")]
    HttpClientError(#[from] reqwest::Error),
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        AppError::Forbidden(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::JsonRejection(_)
            | AppError::PathRejection(_)
            | AppError::QueryRejection(_)
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Upstream { status, .. } => *status,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                })
            }
            AppError::JsonRejection(rejection) => json!({
                "error": "Corpo da requisição inválido.",
                "details": rejection.body_text(),
            }),
            AppError::PathRejection(rejection) => json!({
                "error": "Parâmetro de rota inválido.",
                "details": rejection.body_text(),
            }),
            AppError::QueryRejection(rejection) => json!({
                "error": "Parâmetros de consulta inválidos.",
                "details": rejection.body_text(),
            }),
            AppError::Upstream { detalhe, .. } => json!({
                "error": "Erro na API do Asaas.",
                "detalhe": detalhe,
            }),
            AppError::BadRequest(msg)
            | AppError::Unauthenticated(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg) => json!({ "error": msg }),
            AppError::InvalidCredentials => json!({ "error": AppError::InvalidCredentials.to_string() }),

            // Todos os outros erros (banco, bcrypt, jwt, http, anyhow) viram 500.
            e => {
                tracing::error!("🔥 Erro Interno do Servidor: {}", e);
                corpo_erro_interno(e.to_string())
            }
        };

        (status, Json(body)).into_response()
    }
}

fn corpo_erro_interno(detalhes: String) -> Value {
    if modo_desenvolvimento() {
        json!({ "error": "Ocorreu um erro inesperado.", "detalhes": detalhes })
    } else {
        json!({ "error": "Ocorreu um erro inesperado." })
    }
}

// Usado pelo CatchPanicLayer: nenhum panic escapa sem uma resposta JSON.
pub fn tratar_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detalhes = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "panic sem mensagem".to_string()
    };

    tracing::error!("❌ Panic não tratado: {}", detalhes);
    (StatusCode::INTERNAL_SERVER_ERROR, Json(corpo_erro_interno(detalhes))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::ValidationError;

    async fn corpo(resp: Response) -> Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn validation_error_lista_campos() {
        let mut errors = validator::ValidationErrors::new();
        let mut err = ValidationError::new("length");
        err.message = Some("O nome é obrigatório.".into());
        errors.add("nome", err);

        let resp = AppError::ValidationError(errors).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = corpo(resp).await;
        assert_eq!(body["details"]["nome"][0], "O nome é obrigatório.");
    }

    #[tokio::test]
    async fn upstream_repassa_status_e_corpo() {
        let resp = AppError::Upstream {
            status: StatusCode::PAYMENT_REQUIRED,
            detalhe: json!({ "errors": [{ "code": "invalid_creditCard" }] }),
        }
        .into_response();

        assert_eq!(resp.status(), StatusCode::PAYMENT_REQUIRED);
        let body = corpo(resp).await;
        assert_eq!(body["error"], "Erro na API do Asaas.");
        assert_eq!(body["detalhe"]["errors"][0]["code"], "invalid_creditCard");
    }

    #[tokio::test]
    async fn erro_interno_nao_vaza_detalhes_fora_do_desenvolvimento() {
        let resp = AppError::InternalServerError(anyhow::anyhow!("senha do banco: 123")).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = corpo(resp).await;
        assert_eq!(body["error"], "Ocorreu um erro inesperado.");
        assert!(body.get("detalhes").is_none());
    }

    #[test]
    fn status_por_variante() {
        assert_eq!(AppError::InvalidCredentials.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::forbidden("x").status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::not_found("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Conflict("x".into()).status(), StatusCode::CONFLICT);
    }
}
