// src/models/pedido.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::models::{produto::Produto, usuario::Usuario};

// PENDENTE é o estado inicial; os outros três são finais.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "status_pedido", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusPedido {
    Pendente,
    Pago,
    Atrasado,
    Cancelado,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pedido {
    #[schema(example = 42)]
    pub id: i32,
    #[schema(example = 7)]
    pub usuario_id: i32,
    pub status: StatusPedido,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemPedido {
    pub id: i32,
    pub pedido_id: i32,
    pub produto_id: i32,
    #[schema(example = 2)]
    pub quantidade: i32,
}

// Linha do pedido com o produto embutido
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemPedidoDetalhado {
    #[serde(flatten)]
    pub item: ItemPedido,
    pub produto: Produto,
}

impl ItemPedidoDetalhado {
    pub fn subtotal(&self) -> Decimal {
        Decimal::from(self.item.quantidade) * self.produto.preco
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PedidoDetalhado {
    #[serde(flatten)]
    pub pedido: Pedido,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usuario: Option<Usuario>,
    pub itens: Vec<ItemPedidoDetalhado>,
    #[schema(example = 141.98)]
    pub total: Decimal,
}

impl PedidoDetalhado {
    pub fn new(pedido: Pedido, usuario: Option<Usuario>, itens: Vec<ItemPedidoDetalhado>) -> Self {
        let total = calcular_total(&itens);
        Self { pedido, usuario, itens, total }
    }
}

// Soma de quantidade * preço atual do produto.
pub fn calcular_total(itens: &[ItemPedidoDetalhado]) -> Decimal {
    itens.iter().map(ItemPedidoDetalhado::subtotal).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn produto(id: i32, preco: &str) -> Produto {
        Produto {
            id,
            nome: format!("produto {id}"),
            descricao: String::new(),
            preco: Decimal::from_str(preco).unwrap(),
            quantidade: 1,
            imagem: String::new(),
            marca: None,
            created_at: Utc::now(),
        }
    }

    fn item(produto: Produto, quantidade: i32) -> ItemPedidoDetalhado {
        ItemPedidoDetalhado {
            item: ItemPedido { id: 1, pedido_id: 42, produto_id: produto.id, quantidade },
            produto,
        }
    }

    #[test]
    fn total_duas_pizzas() {
        let itens = vec![item(produto(1, "70.99"), 2)];
        assert_eq!(calcular_total(&itens), Decimal::from_str("141.98").unwrap());
    }

    #[test]
    fn total_varios_itens_sem_erro_de_arredondamento() {
        let itens = vec![
            item(produto(1, "0.10"), 3),
            item(produto(2, "0.20"), 1),
            item(produto(3, "19.90"), 2),
        ];
        assert_eq!(calcular_total(&itens), Decimal::from_str("40.30").unwrap());
    }

    #[test]
    fn pedido_sem_itens_tem_total_zero() {
        assert_eq!(calcular_total(&[]), Decimal::ZERO);
    }

    #[test]
    fn status_em_maiusculas() {
        assert_eq!(serde_json::to_value(StatusPedido::Pendente).unwrap(), "PENDENTE");
        let status: StatusPedido = serde_json::from_str("\"ATRASADO\"").unwrap();
        assert_eq!(status, StatusPedido::Atrasado);
    }

    #[test]
    fn pedido_detalhado_achata_cabecalho() {
        let pedido = Pedido {
            id: 42,
            usuario_id: 7,
            status: StatusPedido::Pendente,
            created_at: Utc::now(),
        };
        let detalhado = PedidoDetalhado::new(pedido, None, vec![item(produto(1, "70.99"), 2)]);

        let json = serde_json::to_value(&detalhado).unwrap();
        assert_eq!(json["id"], 42);
        assert_eq!(json["usuarioId"], 7);
        assert_eq!(json["status"], "PENDENTE");
        assert!(json.get("usuario").is_none());
        assert_eq!(json["itens"][0]["produtoId"], 1);
        assert_eq!(json["itens"][0]["produto"]["nome"], "produto 1");
        assert_eq!(json["total"].as_f64(), Some(141.98));
    }
}
