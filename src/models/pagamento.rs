// src/models/pagamento.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// Formas de cobrança aceitas pelo Asaas ("billingType")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetodoPagamento {
    Pix,
    Boleto,
    CreditCard,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartaoPayload {
    #[schema(example = "MARIA L SILVA")]
    pub holder_name: Option<String>,
    #[schema(example = "5162306219378829")]
    pub number: Option<String>,
    #[schema(example = "05")]
    pub expiry_month: Option<String>,
    #[schema(example = "2030")]
    pub expiry_year: Option<String>,
    #[schema(example = "318")]
    pub cvv: Option<String>,
}

// Dados do cartão com todos os campos presentes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartaoCompleto {
    pub holder_name: String,
    pub number: String,
    pub expiry_month: String,
    pub expiry_year: String,
    pub cvv: String,
}

impl CartaoPayload {
    pub fn completo(&self) -> Option<CartaoCompleto> {
        fn preenchido(campo: &Option<String>) -> Option<String> {
            campo.as_deref().map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
        }

        Some(CartaoCompleto {
            holder_name: preenchido(&self.holder_name)?,
            number: preenchido(&self.number)?,
            expiry_month: preenchido(&self.expiry_month)?,
            expiry_year: preenchido(&self.expiry_year)?,
            cvv: preenchido(&self.cvv)?,
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CriarPagamentoPayload {
    #[schema(example = 42)]
    pub pedido_id: Option<i32>,
    pub metodo_pagamento: Option<MetodoPagamento>,
    pub cartao: Option<CartaoPayload>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PagamentoResponse {
    #[schema(example = "pay_080225913252")]
    pub payment_id: String,
    pub link_pagamento: Option<String>,
    // Imagem do QR Code em base64
    pub pix_qr_code: Option<String>,
    pub pix_copia_cola: Option<String>,
    #[schema(example = 141.98)]
    pub valor: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cartao() -> CartaoPayload {
        CartaoPayload {
            holder_name: Some("MARIA L SILVA".into()),
            number: Some("5162306219378829".into()),
            expiry_month: Some("05".into()),
            expiry_year: Some("2030".into()),
            cvv: Some("318".into()),
        }
    }

    #[test]
    fn cartao_completo() {
        let completo = cartao().completo().unwrap();
        assert_eq!(completo.cvv, "318");
    }

    #[test]
    fn cartao_sem_cvv_ou_com_campo_vazio() {
        let mut sem_cvv = cartao();
        sem_cvv.cvv = None;
        assert!(sem_cvv.completo().is_none());

        let mut nome_vazio = cartao();
        nome_vazio.holder_name = Some("   ".into());
        assert!(nome_vazio.completo().is_none());
    }

    #[test]
    fn metodo_pagamento_no_formato_do_asaas() {
        let metodo: MetodoPagamento = serde_json::from_str("\"CREDIT_CARD\"").unwrap();
        assert_eq!(metodo, MetodoPagamento::CreditCard);
        assert_eq!(serde_json::to_value(MetodoPagamento::Pix).unwrap(), "PIX");
        assert!(serde_json::from_str::<MetodoPagamento>("\"DINHEIRO\"").is_err());
    }
}
