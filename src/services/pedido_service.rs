// src/services/pedido_service.rs

use std::collections::HashMap;

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{PedidoRepository, ProdutoRepository, UsuarioRepository},
    models::{
        pedido::{ItemPedidoDetalhado, Pedido, PedidoDetalhado, StatusPedido},
        usuario::{TipoUsuario, Usuario},
    },
};

// Linha pedida pelo cliente, ainda não persistida
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemSolicitado {
    pub produto_id: i32,
    pub quantidade: i32,
}

pub fn validar_itens(itens: &[ItemSolicitado]) -> Result<(), AppError> {
    if itens.is_empty() {
        return Err(AppError::bad_request("Carrinho vazio ou inválido."));
    }
    if itens.iter().any(|it| it.produto_id <= 0 || it.quantidade <= 0) {
        return Err(AppError::bad_request("Cada item precisa de produtoId e quantidade > 0."));
    }
    Ok(())
}

// Ids pedidos que não existem no catálogo, sem repetição e na ordem do carrinho
pub fn produtos_faltantes(solicitados: &[i32], encontrados: &[i32]) -> Vec<i32> {
    let mut faltantes: Vec<i32> = Vec::new();
    for id in solicitados {
        if !encontrados.contains(id) && !faltantes.contains(id) {
            faltantes.push(*id);
        }
    }
    faltantes
}

#[derive(Clone)]
pub struct PedidoService {
    pool: PgPool,
    pedido_repo: PedidoRepository,
    produto_repo: ProdutoRepository,
    usuario_repo: UsuarioRepository,
}

impl PedidoService {
    pub fn new(
        pool: PgPool,
        pedido_repo: PedidoRepository,
        produto_repo: ProdutoRepository,
        usuario_repo: UsuarioRepository,
    ) -> Self {
        Self { pool, pedido_repo, produto_repo, usuario_repo }
    }

    // --- CRIAÇÃO ---

    pub async fn criar(&self, usuario_id: i32, itens: &[ItemSolicitado]) -> Result<PedidoDetalhado, AppError> {
        validar_itens(itens)?;

        // 1. Todos os produtos precisam existir (uma única consulta)
        let ids: Vec<i32> = itens.iter().map(|it| it.produto_id).collect();
        let encontrados = self.produto_repo.ids_existentes(&ids).await?;
        let faltantes = produtos_faltantes(&ids, &encontrados);
        if !faltantes.is_empty() {
            let lista = faltantes.iter().map(i32::to_string).collect::<Vec<_>>().join(", ");
            return Err(AppError::bad_request(format!("Produtos não encontrados: {lista}")));
        }

        // 2. Pedido + itens na mesma transação
        let quantidades: Vec<i32> = itens.iter().map(|it| it.quantidade).collect();

        let mut tx = self.pool.begin().await?;
        let pedido = self.pedido_repo.create_pedido(&mut *tx, usuario_id).await?;
        self.pedido_repo
            .insert_itens(&mut *tx, pedido.id, &ids, &quantidades)
            .await?; // Se falhar, o drop do tx desfaz o pedido
        tx.commit().await?;

        tracing::info!("🧾 Pedido {} criado pelo usuário {} com {} itens", pedido.id, usuario_id, itens.len());

        // 3. Resposta completa (dono, itens e produtos)
        let mut detalhados = self.detalhar(vec![pedido], true).await?;
        detalhados
            .pop()
            .ok_or_else(|| anyhow::anyhow!("Pedido recém-criado não encontrado").into())
    }

    // --- CONSULTAS ---

    pub async fn listar_todos(&self) -> Result<Vec<PedidoDetalhado>, AppError> {
        let pedidos = self.pedido_repo.listar_todos().await?;
        self.detalhar(pedidos, true).await
    }

    pub async fn listar_por_usuario(&self, usuario_id: i32) -> Result<Vec<PedidoDetalhado>, AppError> {
        let pedidos = self.pedido_repo.listar_por_usuario(usuario_id).await?;
        self.detalhar(pedidos, false).await
    }

    // Pedido com itens e produtos (sem o dono)
    pub async fn buscar_detalhado(&self, id: i32) -> Result<Option<PedidoDetalhado>, AppError> {
        let Some(pedido) = self.pedido_repo.find_by_id(id).await? else {
            return Ok(None);
        };
        Ok(self.detalhar(vec![pedido], false).await?.pop())
    }

    // Dono do pedido ou GERENTE
    pub async fn buscar_para_usuario(
        &self,
        id: i32,
        usuario_id: i32,
        tipo: TipoUsuario,
    ) -> Result<PedidoDetalhado, AppError> {
        let pedido = self
            .buscar_detalhado(id)
            .await?
            .ok_or_else(|| AppError::not_found("Pedido não encontrado."))?;

        if tipo != TipoUsuario::Gerente && pedido.pedido.usuario_id != usuario_id {
            return Err(AppError::forbidden("Você não tem permissão para ver este pedido."));
        }
        Ok(pedido)
    }

    // --- ALTERAÇÕES (GERENTE) ---

    pub async fn atualizar_status(&self, id: i32, status: StatusPedido) -> Result<Pedido, AppError> {
        let pedido = self
            .pedido_repo
            .update_status(id, status)
            .await?
            .ok_or_else(|| AppError::not_found("Pedido não encontrado."))?;

        tracing::info!("🧾 Pedido {} atualizado para {:?}", id, status);
        Ok(pedido)
    }

    pub async fn remover(&self, id: i32) -> Result<(), AppError> {
        if !self.pedido_repo.delete(id).await? {
            return Err(AppError::not_found("Pedido não encontrado."));
        }
        tracing::info!("🗑️ Pedido {} removido", id);
        Ok(())
    }

    // Monta os pedidos detalhados com duas consultas (itens e, se pedido, donos)
    async fn detalhar(&self, pedidos: Vec<Pedido>, incluir_usuario: bool) -> Result<Vec<PedidoDetalhado>, AppError> {
        if pedidos.is_empty() {
            return Ok(Vec::new());
        }

        let pedido_ids: Vec<i32> = pedidos.iter().map(|p| p.id).collect();

        let mut itens_por_pedido: HashMap<i32, Vec<ItemPedidoDetalhado>> = HashMap::new();
        for item in self.pedido_repo.itens_com_produto(&pedido_ids).await? {
            itens_por_pedido.entry(item.item.pedido_id).or_default().push(item);
        }

        let mut usuarios: HashMap<i32, Usuario> = HashMap::new();
        if incluir_usuario {
            let mut usuario_ids: Vec<i32> = pedidos.iter().map(|p| p.usuario_id).collect();
            usuario_ids.sort_unstable();
            usuario_ids.dedup();
            usuarios = self
                .usuario_repo
                .find_by_ids(&usuario_ids)
                .await?
                .into_iter()
                .map(|u| (u.id, u))
                .collect();
        }

        Ok(pedidos
            .into_iter()
            .map(|pedido| {
                let itens = itens_por_pedido.remove(&pedido.id).unwrap_or_default();
                let usuario = usuarios.get(&pedido.usuario_id).cloned();
                PedidoDetalhado::new(pedido, usuario, itens)
            })
            .collect())
    }
}
