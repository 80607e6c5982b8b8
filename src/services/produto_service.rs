// src/services/produto_service.rs

use crate::{
    common::error::AppError,
    db::ProdutoRepository,
    models::produto::{AlteracaoProduto, NovoProduto, Produto},
};

#[derive(Clone)]
pub struct ProdutoService {
    produto_repo: ProdutoRepository,
}

impl ProdutoService {
    pub fn new(produto_repo: ProdutoRepository) -> Self {
        Self { produto_repo }
    }

    pub async fn criar(&self, novo: NovoProduto) -> Result<Produto, AppError> {
        let produto = self.produto_repo.create(&novo).await?;
        tracing::info!("🍕 Produto {} cadastrado: {}", produto.id, produto.nome);
        Ok(produto)
    }

    pub async fn listar(&self, marca: Option<&str>) -> Result<Vec<Produto>, AppError> {
        let marca = marca.map(str::trim).filter(|m| !m.is_empty());
        self.produto_repo.listar(marca).await
    }

    pub async fn buscar(&self, id: i32) -> Result<Produto, AppError> {
        self.produto_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Produto não encontrado."))
    }

    pub async fn atualizar(&self, id: i32, alteracao: AlteracaoProduto) -> Result<Produto, AppError> {
        // Nada para alterar: devolve o produto como está
        if alteracao.vazia() {
            return self.buscar(id).await;
        }

        self.produto_repo
            .update(id, &alteracao)
            .await?
            .ok_or_else(|| AppError::not_found("Produto não encontrado."))
    }

    pub async fn remover(&self, id: i32) -> Result<(), AppError> {
        if !self.produto_repo.delete(id).await? {
            return Err(AppError::not_found("Produto não encontrado."));
        }
        tracing::info!("🗑️ Produto {} removido", id);
        Ok(())
    }
}
