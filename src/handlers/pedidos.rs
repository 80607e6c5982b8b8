// src/handlers/pedidos.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::UsuarioAutenticado,
    models::{
        pedido::{Pedido, PedidoDetalhado, StatusPedido},
        usuario::MensagemResponse,
    },
    services::pedido_service::ItemSolicitado,
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemPedidoPayload {
    // Valores ausentes viram 0 e caem na validação de itens
    #[serde(default, alias = "id")]
    #[schema(example = 1)]
    pub produto_id: i32,
    #[serde(default, alias = "qtd")]
    #[schema(example = 2)]
    pub quantidade: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CriarPedidoPayload {
    #[serde(default)]
    pub itens: Vec<ItemPedidoPayload>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AtualizarPedidoPayload {
    pub status: Option<StatusPedido>,
}

#[utoipa::path(
    post,
    path = "/pedidos",
    tag = "Pedidos",
    request_body = CriarPedidoPayload,
    responses(
        (status = 201, description = "Pedido criado como PENDENTE", body = PedidoDetalhado),
        (status = 400, description = "Carrinho inválido ou produtos inexistentes")
    ),
    security(("api_jwt" = []))
)]
pub async fn criar(
    State(app_state): State<AppState>,
    usuario: UsuarioAutenticado,
    WithRejection(Json(payload), _): WithRejection<Json<CriarPedidoPayload>, AppError>,
) -> Result<(StatusCode, Json<PedidoDetalhado>), AppError> {
    let itens: Vec<ItemSolicitado> = payload
        .itens
        .iter()
        .map(|it| ItemSolicitado { produto_id: it.produto_id, quantidade: it.quantidade })
        .collect();

    let pedido = app_state.pedido_service.criar(usuario.id, &itens).await?;
    Ok((StatusCode::CREATED, Json(pedido)))
}

#[utoipa::path(
    get,
    path = "/pedidos",
    tag = "Pedidos",
    responses(
        (status = 200, description = "Todos os pedidos, mais recentes primeiro", body = Vec<PedidoDetalhado>),
        (status = 403, description = "Apenas gerentes")
    ),
    security(("api_jwt" = []))
)]
pub async fn listar_todos(State(app_state): State<AppState>) -> Result<Json<Vec<PedidoDetalhado>>, AppError> {
    let pedidos = app_state.pedido_service.listar_todos().await?;
    Ok(Json(pedidos))
}

#[utoipa::path(
    get,
    path = "/meus-pedidos",
    tag = "Pedidos",
    responses(
        (status = 200, description = "Pedidos do usuário autenticado", body = Vec<PedidoDetalhado>)
    ),
    security(("api_jwt" = []))
)]
pub async fn meus_pedidos(
    State(app_state): State<AppState>,
    usuario: UsuarioAutenticado,
) -> Result<Json<Vec<PedidoDetalhado>>, AppError> {
    let pedidos = app_state.pedido_service.listar_por_usuario(usuario.id).await?;
    Ok(Json(pedidos))
}

#[utoipa::path(
    get,
    path = "/pedidos/{id}",
    tag = "Pedidos",
    params(("id" = i32, Path, description = "ID do pedido")),
    responses(
        (status = 200, description = "Pedido detalhado", body = PedidoDetalhado),
        (status = 403, description = "Pedido de outro usuário"),
        (status = 404, description = "Pedido não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn buscar(
    State(app_state): State<AppState>,
    usuario: UsuarioAutenticado,
    WithRejection(Path(id), _): WithRejection<Path<i32>, AppError>,
) -> Result<Json<PedidoDetalhado>, AppError> {
    let pedido = app_state
        .pedido_service
        .buscar_para_usuario(id, usuario.id, usuario.tipo)
        .await?;
    Ok(Json(pedido))
}

#[utoipa::path(
    put,
    path = "/pedidos/{id}",
    tag = "Pedidos",
    request_body = AtualizarPedidoPayload,
    params(("id" = i32, Path, description = "ID do pedido")),
    responses(
        (status = 200, description = "Status atualizado", body = Pedido),
        (status = 400, description = "Status inválido"),
        (status = 404, description = "Pedido não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn atualizar(
    State(app_state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, AppError>,
    WithRejection(Json(payload), _): WithRejection<Json<AtualizarPedidoPayload>, AppError>,
) -> Result<Json<Pedido>, AppError> {
    let status = payload
        .status
        .ok_or_else(|| AppError::bad_request("O campo 'status' é obrigatório."))?;

    let pedido = app_state.pedido_service.atualizar_status(id, status).await?;
    Ok(Json(pedido))
}

#[utoipa::path(
    delete,
    path = "/pedidos/{id}",
    tag = "Pedidos",
    params(("id" = i32, Path, description = "ID do pedido")),
    responses(
        (status = 200, description = "Pedido removido", body = MensagemResponse),
        (status = 404, description = "Pedido não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn remover(
    State(app_state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, AppError>,
) -> Result<Json<MensagemResponse>, AppError> {
    app_state.pedido_service.remover(id).await?;
    Ok(Json(MensagemResponse::new("Pedido removido com sucesso.")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aceita_apelidos_id_e_qtd() {
        let payload: CriarPedidoPayload =
            serde_json::from_str(r#"{"itens":[{"id":1,"qtd":2},{"produtoId":3,"quantidade":1}]}"#).unwrap();
        assert_eq!(payload.itens[0].produto_id, 1);
        assert_eq!(payload.itens[0].quantidade, 2);
        assert_eq!(payload.itens[1].produto_id, 3);
    }

    #[test]
    fn campos_ausentes_viram_zero() {
        let payload: CriarPedidoPayload = serde_json::from_str(r#"{"itens":[{}]}"#).unwrap();
        assert_eq!(payload.itens[0].produto_id, 0);
        assert_eq!(payload.itens[0].quantidade, 0);
    }

    #[test]
    fn sem_itens_vira_lista_vazia() {
        let payload: CriarPedidoPayload = serde_json::from_str("{}").unwrap();
        assert!(payload.itens.is_empty());
    }

    #[test]
    fn status_desconhecido_nao_desserializa() {
        assert!(serde_json::from_str::<AtualizarPedidoPayload>(r#"{"status":"ENTREGUE"}"#).is_err());
        let ok: AtualizarPedidoPayload = serde_json::from_str(r#"{"status":"PAGO"}"#).unwrap();
        assert_eq!(ok.status, Some(StatusPedido::Pago));
    }
}
