// src/db/pedido_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, FromRow, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::{
        pedido::{ItemPedido, ItemPedidoDetalhado, Pedido, StatusPedido},
        produto::Produto,
    },
};

// Linha do JOIN itens_pedido x produtos
#[derive(Debug, FromRow)]
struct ItemComProdutoRow {
    id: i32,
    pedido_id: i32,
    produto_id: i32,
    quantidade: i32,
    produto_nome: String,
    produto_descricao: String,
    produto_preco: Decimal,
    produto_quantidade: i32,
    produto_imagem: String,
    produto_marca: Option<String>,
    produto_created_at: DateTime<Utc>,
}

impl From<ItemComProdutoRow> for ItemPedidoDetalhado {
    fn from(row: ItemComProdutoRow) -> Self {
        ItemPedidoDetalhado {
            item: ItemPedido {
                id: row.id,
                pedido_id: row.pedido_id,
                produto_id: row.produto_id,
                quantidade: row.quantidade,
            },
            produto: Produto {
                id: row.produto_id,
                nome: row.produto_nome,
                descricao: row.produto_descricao,
                preco: row.produto_preco,
                quantidade: row.produto_quantidade,
                imagem: row.produto_imagem,
                marca: row.produto_marca,
                created_at: row.produto_created_at,
            },
        }
    }
}

#[derive(Clone)]
pub struct PedidoRepository {
    pool: PgPool,
}

impl PedidoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  CRIAÇÃO (sempre dentro de uma transação do serviço)
    // =========================================================================

    pub async fn create_pedido<'e, E>(&self, executor: E, usuario_id: i32) -> Result<Pedido, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let pedido = sqlx::query_as::<_, Pedido>(
            r#"
            INSERT INTO pedidos (usuario_id, status)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(usuario_id)
        .bind(StatusPedido::Pendente)
        .fetch_one(executor)
        .await?;

        Ok(pedido)
    }

    // Insere todas as linhas de uma vez com UNNEST
    pub async fn insert_itens<'e, E>(
        &self,
        executor: E,
        pedido_id: i32,
        produto_ids: &[i32],
        quantidades: &[i32],
    ) -> Result<Vec<ItemPedido>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let itens = sqlx::query_as::<_, ItemPedido>(
            r#"
            INSERT INTO itens_pedido (pedido_id, produto_id, quantidade)
            SELECT $1, item.produto_id, item.quantidade
            FROM UNNEST($2::int4[], $3::int4[]) AS item(produto_id, quantidade)
            RETURNING *
            "#,
        )
        .bind(pedido_id)
        .bind(produto_ids)
        .bind(quantidades)
        .fetch_all(executor)
        .await?;

        Ok(itens)
    }

    // =========================================================================
    //  CONSULTAS
    // =========================================================================

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Pedido>, AppError> {
        let pedido = sqlx::query_as::<_, Pedido>("SELECT * FROM pedidos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(pedido)
    }

    // Mais recentes primeiro
    pub async fn listar_todos(&self) -> Result<Vec<Pedido>, AppError> {
        let pedidos = sqlx::query_as::<_, Pedido>("SELECT * FROM pedidos ORDER BY created_at DESC, id DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(pedidos)
    }

    pub async fn listar_por_usuario(&self, usuario_id: i32) -> Result<Vec<Pedido>, AppError> {
        let pedidos = sqlx::query_as::<_, Pedido>(
            "SELECT * FROM pedidos WHERE usuario_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(usuario_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(pedidos)
    }

    // Itens (com produto) de vários pedidos numa única consulta
    pub async fn itens_com_produto(&self, pedido_ids: &[i32]) -> Result<Vec<ItemPedidoDetalhado>, AppError> {
        let rows = sqlx::query_as::<_, ItemComProdutoRow>(
            r#"
            SELECT
                i.id, i.pedido_id, i.produto_id, i.quantidade,
                p.nome       AS produto_nome,
                p.descricao  AS produto_descricao,
                p.preco      AS produto_preco,
                p.quantidade AS produto_quantidade,
                p.imagem     AS produto_imagem,
                p.marca      AS produto_marca,
                p.created_at AS produto_created_at
            FROM itens_pedido i
            JOIN produtos p ON p.id = i.produto_id
            WHERE i.pedido_id = ANY($1)
            ORDER BY i.pedido_id, i.id
            "#,
        )
        .bind(pedido_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ItemPedidoDetalhado::from).collect())
    }

    // =========================================================================
    //  ALTERAÇÕES
    // =========================================================================

    // Atribuição simples: reaplicar o mesmo status não muda nada
    pub async fn update_status(&self, id: i32, status: StatusPedido) -> Result<Option<Pedido>, AppError> {
        let pedido = sqlx::query_as::<_, Pedido>(
            "UPDATE pedidos SET status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;
        Ok(pedido)
    }

    // Os itens saem junto (ON DELETE CASCADE)
    pub async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM pedidos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
