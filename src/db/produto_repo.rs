// src/db/produto_repo.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::produto::{AlteracaoProduto, NovoProduto, Produto},
};

#[derive(Clone)]
pub struct ProdutoRepository {
    pool: PgPool,
}

impl ProdutoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Filtro por marca: igualdade exata, sem diferenciar maiúsculas
    pub async fn listar(&self, marca: Option<&str>) -> Result<Vec<Produto>, AppError> {
        let produtos = sqlx::query_as::<_, Produto>(
            r#"
            SELECT * FROM produtos
            WHERE ($1::text IS NULL OR LOWER(marca) = LOWER($1))
            ORDER BY id
            "#,
        )
        .bind(marca)
        .fetch_all(&self.pool)
        .await?;
        Ok(produtos)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Produto>, AppError> {
        let produto = sqlx::query_as::<_, Produto>("SELECT * FROM produtos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(produto)
    }

    // Busca em lote: devolve só os ids que existem
    pub async fn ids_existentes(&self, ids: &[i32]) -> Result<Vec<i32>, AppError> {
        let encontrados = sqlx::query_scalar::<_, i32>("SELECT id FROM produtos WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(encontrados)
    }

    pub async fn create(&self, novo: &NovoProduto) -> Result<Produto, AppError> {
        let produto = sqlx::query_as::<_, Produto>(
            r#"
            INSERT INTO produtos (nome, descricao, preco, quantidade, imagem, marca)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&novo.nome)
        .bind(&novo.descricao)
        .bind(novo.preco)
        .bind(novo.quantidade)
        .bind(&novo.imagem)
        .bind(&novo.marca)
        .fetch_one(&self.pool)
        .await?;
        Ok(produto)
    }

    // Atualiza só o que veio preenchido. `None` se o produto não existe.
    pub async fn update(&self, id: i32, alteracao: &AlteracaoProduto) -> Result<Option<Produto>, AppError> {
        let produto = sqlx::query_as::<_, Produto>(
            r#"
            UPDATE produtos SET
                nome       = COALESCE($2, nome),
                descricao  = COALESCE($3, descricao),
                preco      = COALESCE($4, preco),
                quantidade = COALESCE($5, quantidade),
                imagem     = COALESCE($6, imagem),
                marca      = COALESCE($7, marca)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&alteracao.nome)
        .bind(&alteracao.descricao)
        .bind(alteracao.preco)
        .bind(alteracao.quantidade)
        .bind(&alteracao.imagem)
        .bind(&alteracao.marca)
        .fetch_optional(&self.pool)
        .await?;
        Ok(produto)
    }

    // Produto que já aparece em algum pedido não pode ser apagado (FK RESTRICT)
    pub async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM produtos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_foreign_key_violation() {
                        return AppError::Conflict(
                            "Produto já utilizado em pedidos e não pode ser removido.".into(),
                        );
                    }
                }
                AppError::from(e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}
