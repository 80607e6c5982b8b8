// src/models/webhook.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::pedido::StatusPedido;

const PREFIXO_REFERENCIA: &str = "pedido_";

// Notificação enviada pelo Asaas. Campos opcionais: a validação é feita no serviço.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct WebhookPayload {
    #[schema(example = "PAYMENT_CONFIRMED")]
    pub event: Option<String>,
    pub payment: Option<WebhookPayment>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayment {
    #[schema(example = "pay_080225913252")]
    pub id: Option<String>,
    #[schema(example = "pedido_42")]
    pub external_reference: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WebhookResponse {
    pub mensagem: String,
    pub pedido_id: i32,
    pub status: StatusPedido,
}

// Referência externa usada nas cobranças: "pedido_<id>"
pub fn referencia_do_pedido(pedido_id: i32) -> String {
    format!("{PREFIXO_REFERENCIA}{pedido_id}")
}

// "pedido_42" -> Some(42). Qualquer outra coisa -> None.
pub fn pedido_da_referencia(referencia: &str) -> Option<i32> {
    referencia
        .strip_prefix(PREFIXO_REFERENCIA)?
        .parse::<i32>()
        .ok()
        .filter(|id| *id > 0)
}

// Evento do Asaas -> novo status. `None` deixa o status como está.
pub fn status_para_evento(evento: &str) -> Option<StatusPedido> {
    match evento {
        "PAYMENT_CONFIRMED" | "PAYMENT_RECEIVED" => Some(StatusPedido::Pago),
        "PAYMENT_OVERDUE" => Some(StatusPedido::Atrasado),
        "PAYMENT_CANCELED" | "PAYMENT_DELETED" | "PAYMENT_REFUNDED" => Some(StatusPedido::Cancelado),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn referencia_ida_e_volta() {
        assert_eq!(referencia_do_pedido(42), "pedido_42");
        assert_eq!(pedido_da_referencia("pedido_42"), Some(42));
    }

    #[test]
    fn referencias_malformadas() {
        for referencia in ["", "pedido_", "pedido_abc", "pedido_-1", "pedido_0", "order_42", "42", "Pedido_42"] {
            assert_eq!(pedido_da_referencia(referencia), None, "aceitou {referencia:?}");
        }
    }

    #[test]
    fn mapeamento_de_eventos() {
        assert_eq!(status_para_evento("PAYMENT_CONFIRMED"), Some(StatusPedido::Pago));
        assert_eq!(status_para_evento("PAYMENT_RECEIVED"), Some(StatusPedido::Pago));
        assert_eq!(status_para_evento("PAYMENT_OVERDUE"), Some(StatusPedido::Atrasado));
        assert_eq!(status_para_evento("PAYMENT_CANCELED"), Some(StatusPedido::Cancelado));
        assert_eq!(status_para_evento("PAYMENT_CREATED"), None);
        assert_eq!(status_para_evento("qualquer coisa"), None);
    }
}
