// src/services/asaas.rs

use chrono::NaiveDate;
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::{common::error::AppError, models::pagamento::MetodoPagamento};

// Erros do cliente do gateway
#[derive(Debug, Error)]
pub enum AsaasError {
    // O Asaas respondeu, mas com status de erro
    #[error("Asaas respondeu {status}")]
    Api { status: StatusCode, corpo: Value },

    #[error("Falha de comunicação com o Asaas: {0}")]
    Transporte(#[from] reqwest::Error),
}

impl From<AsaasError> for AppError {
    fn from(err: AsaasError) -> Self {
        match err {
            AsaasError::Api { status, corpo } => AppError::Upstream { status, detalhe: corpo },
            AsaasError::Transporte(e) => AppError::HttpClientError(e),
        }
    }
}

// ---
// DTOs da API v3
// ---

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NovoClienteAsaas {
    pub name: String,
    pub email: String,
    pub cpf_cnpj: String,
    pub phone: String,
    pub external_reference: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClienteAsaas {
    pub id: String,
}

#[derive(Debug, Deserialize)]
struct ListaAsaas<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartaoAsaas {
    pub holder_name: String,
    pub number: String,
    pub expiry_month: String,
    pub expiry_year: String,
    pub ccv: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CobrancaRequest {
    pub customer: String,
    pub billing_type: MetodoPagamento,
    pub due_date: NaiveDate,
    pub value: Decimal,
    pub description: String,
    pub external_reference: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_card: Option<CartaoAsaas>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CobrancaAsaas {
    pub id: String,
    pub invoice_url: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PixQrCodeAsaas {
    pub encoded_image: Option<String>,
    pub payload: Option<String>,
}

// ---
// Cliente HTTP
// ---

#[derive(Clone)]
pub struct AsaasClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl AsaasClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn url(&self, caminho: &str) -> String {
        format!("{}{}", self.base_url, caminho)
    }

    // Primeiro cliente cadastrado com esta referência externa, se houver
    pub async fn buscar_cliente_por_referencia(&self, referencia: &str) -> Result<Option<ClienteAsaas>, AsaasError> {
        let resp = self
            .http
            .get(self.url("/customers"))
            .query(&[("externalReference", referencia)])
            .header("access_token", &self.api_key)
            .send()
            .await?;

        let lista: ListaAsaas<ClienteAsaas> = tratar_resposta(resp).await?;
        Ok(lista.data.into_iter().next())
    }

    pub async fn criar_cliente(&self, cliente: &NovoClienteAsaas) -> Result<ClienteAsaas, AsaasError> {
        let resp = self
            .http
            .post(self.url("/customers"))
            .header("access_token", &self.api_key)
            .json(cliente)
            .send()
            .await?;

        tratar_resposta(resp).await
    }

    pub async fn criar_cobranca(&self, cobranca: &CobrancaRequest) -> Result<CobrancaAsaas, AsaasError> {
        let resp = self
            .http
            .post(self.url("/payments"))
            .header("access_token", &self.api_key)
            .json(cobranca)
            .send()
            .await?;

        tratar_resposta(resp).await
    }

    pub async fn buscar_pix_qr_code(&self, payment_id: &str) -> Result<PixQrCodeAsaas, AsaasError> {
        let resp = self
            .http
            .get(self.url(&format!("/payments/{payment_id}/pixQrCode")))
            .header("access_token", &self.api_key)
            .send()
            .await?;

        tratar_resposta(resp).await
    }
}

async fn tratar_resposta<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, AsaasError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json::<T>().await?);
    }

    // Corpo de erro nem sempre é JSON
    let texto = resp.text().await.unwrap_or_default();
    let corpo = serde_json::from_str::<Value>(&texto).unwrap_or(Value::String(texto));
    tracing::warn!("⚠️ Asaas respondeu {}: {}", status, corpo);
    Err(AsaasError::Api { status, corpo })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn cobranca_no_formato_da_api() {
        let cobranca = CobrancaRequest {
            customer: "cus_000005219613".into(),
            billing_type: MetodoPagamento::Pix,
            due_date: NaiveDate::from_ymd_opt(2025, 12, 6).unwrap(),
            value: Decimal::from_str("141.98").unwrap(),
            description: "Pedido #42 - Pizzaria".into(),
            external_reference: "pedido_42".into(),
            credit_card: None,
        };

        let json = serde_json::to_value(&cobranca).unwrap();
        assert_eq!(json["billingType"], "PIX");
        assert_eq!(json["dueDate"], "2025-12-06");
        assert_eq!(json["value"].as_f64(), Some(141.98));
        assert_eq!(json["externalReference"], "pedido_42");
        assert!(json.get("creditCard").is_none());
    }

    #[test]
    fn erro_da_api_vira_upstream() {
        let err: AppError = AsaasError::Api {
            status: StatusCode::BAD_REQUEST,
            corpo: serde_json::json!({ "errors": [] }),
        }
        .into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(matches!(err, AppError::Upstream { .. }));
    }

    #[test]
    fn base_url_sem_barra_final() {
        let client = AsaasClient::new(reqwest::Client::new(), "https://sandbox.asaas.com/api/v3/", "chave");
        assert_eq!(client.url("/payments"), "https://sandbox.asaas.com/api/v3/payments");
    }
}
