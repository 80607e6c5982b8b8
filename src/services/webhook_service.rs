// src/services/webhook_service.rs

use crate::{
    common::error::AppError,
    db::PedidoRepository,
    models::webhook::{pedido_da_referencia, status_para_evento, WebhookPayload, WebhookResponse},
};

// Evento e pedido extraídos de uma notificação válida
pub fn extrair_evento(payload: &WebhookPayload) -> Result<(String, i32), AppError> {
    let (Some(evento), Some(payment)) = (&payload.event, &payload.payment) else {
        return Err(AppError::bad_request("Webhook inválido."));
    };

    let pedido_id = payment
        .external_reference
        .as_deref()
        .and_then(pedido_da_referencia)
        .ok_or_else(|| AppError::bad_request("Referência externa inválida."))?;

    Ok((evento.clone(), pedido_id))
}

#[derive(Clone)]
pub struct WebhookService {
    pedido_repo: PedidoRepository,
    token_esperado: Option<String>,
}

impl WebhookService {
    pub fn new(pedido_repo: PedidoRepository, token_esperado: Option<String>) -> Self {
        Self { pedido_repo, token_esperado }
    }

    // Header asaas-access-token. Sem token configurado, qualquer origem é aceita.
    pub fn verificar_token(&self, recebido: Option<&str>) -> Result<(), AppError> {
        match &self.token_esperado {
            None => Ok(()),
            Some(esperado) if recebido == Some(esperado.as_str()) => Ok(()),
            Some(_) => {
                tracing::warn!("🚫 Webhook recebido com token inválido");
                Err(AppError::Unauthenticated("Token do webhook inválido.".into()))
            }
        }
    }

    pub async fn processar(&self, payload: WebhookPayload) -> Result<WebhookResponse, AppError> {
        let (evento, pedido_id) = extrair_evento(&payload)?;
        tracing::info!("📬 Webhook do Asaas: {} para o pedido {}", evento, pedido_id);

        let pedido = self
            .pedido_repo
            .find_by_id(pedido_id)
            .await?
            .ok_or_else(|| AppError::not_found("Pedido não encontrado."))?;

        // Evento desconhecido: mantém o status atual
        let novo_status = status_para_evento(&evento).unwrap_or(pedido.status);

        let atualizado = self
            .pedido_repo
            .update_status(pedido_id, novo_status)
            .await?
            .ok_or_else(|| AppError::not_found("Pedido não encontrado."))?;

        tracing::info!("✅ Pedido {} atualizado para: {:?}", pedido_id, atualizado.status);

        Ok(WebhookResponse {
            mensagem: "Webhook processado com sucesso.".into(),
            pedido_id,
            status: atualizado.status,
        })
    }
}
