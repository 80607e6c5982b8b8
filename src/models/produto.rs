// src/models/produto.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

// Item do cardápio. O preço sai sempre como número no JSON (serde-float).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Produto {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "frango com catupiry")]
    pub nome: String,
    #[schema(example = "molho de tomate, frango e catupiry")]
    pub descricao: String,
    #[schema(example = 70.99)]
    pub preco: Decimal,
    // Estoque informativo: nenhum pedido decrementa este valor.
    #[schema(example = 1)]
    pub quantidade: i32,
    pub imagem: String,
    pub marca: Option<String>,
    pub created_at: DateTime<Utc>,
}

// Campos de um novo produto, já validados e com os padrões aplicados.
#[derive(Debug, Clone)]
pub struct NovoProduto {
    pub nome: String,
    pub descricao: String,
    pub preco: Decimal,
    pub quantidade: i32,
    pub imagem: String,
    pub marca: Option<String>,
}

// Patch parcial: `None` mantém o valor atual.
#[derive(Debug, Clone, Default)]
pub struct AlteracaoProduto {
    pub nome: Option<String>,
    pub descricao: Option<String>,
    pub preco: Option<Decimal>,
    pub quantidade: Option<i32>,
    pub imagem: Option<String>,
    pub marca: Option<String>,
}

impl AlteracaoProduto {
    pub fn vazia(&self) -> bool {
        self.nome.is_none()
            && self.descricao.is_none()
            && self.preco.is_none()
            && self.quantidade.is_none()
            && self.imagem.is_none()
            && self.marca.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn preco_e_serializado_como_numero() {
        let produto = Produto {
            id: 1,
            nome: "marguerita".into(),
            descricao: String::new(),
            preco: Decimal::from_str("70.99").unwrap(),
            quantidade: 1,
            imagem: String::new(),
            marca: None,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&produto).unwrap();
        assert!(json["preco"].is_number());
        assert_eq!(json["preco"].as_f64(), Some(70.99));
    }

    #[test]
    fn alteracao_vazia() {
        assert!(AlteracaoProduto::default().vazia());
        let alteracao = AlteracaoProduto { quantidade: Some(3), ..Default::default() };
        assert!(!alteracao.vazia());
    }
}
