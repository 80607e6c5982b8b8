// src/handlers/webhook.rs

use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    models::webhook::{WebhookPayload, WebhookResponse},
};

pub const HEADER_TOKEN_ASAAS: &str = "asaas-access-token";

#[utoipa::path(
    post,
    path = "/webhook/asaas",
    tag = "Webhook",
    request_body = WebhookPayload,
    params(
        ("asaas-access-token" = Option<String>, Header, description = "Token configurado no painel do Asaas")
    ),
    responses(
        (status = 200, description = "Evento aplicado ao pedido", body = WebhookResponse),
        (status = 400, description = "Webhook inválido"),
        (status = 401, description = "Token do webhook inválido"),
        (status = 404, description = "Pedido não encontrado")
    )
)]
pub async fn receber(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    corpo: Result<Json<WebhookPayload>, JsonRejection>,
) -> Result<Json<WebhookResponse>, AppError> {
    // O token é conferido antes de qualquer erro do corpo
    let token = headers.get(HEADER_TOKEN_ASAAS).and_then(|v| v.to_str().ok());
    app_state.webhook_service.verificar_token(token)?;

    let Json(payload) = corpo?;
    let resposta = app_state.webhook_service.processar(payload).await?;
    Ok(Json(resposta))
}
