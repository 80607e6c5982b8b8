// src/handlers/pagamentos.rs

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::WithRejection;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::UsuarioAutenticado,
    models::pagamento::{CriarPagamentoPayload, PagamentoResponse},
};

#[utoipa::path(
    post,
    path = "/pagamentos",
    tag = "Pagamentos",
    request_body = CriarPagamentoPayload,
    responses(
        (status = 201, description = "Cobrança criada no Asaas", body = PagamentoResponse),
        (status = 400, description = "Dados inválidos ou pedido já processado"),
        (status = 403, description = "Pedido de outro usuário"),
        (status = 404, description = "Pedido não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn criar(
    State(app_state): State<AppState>,
    usuario: UsuarioAutenticado,
    WithRejection(Json(payload), _): WithRejection<Json<CriarPagamentoPayload>, AppError>,
) -> Result<(StatusCode, Json<PagamentoResponse>), AppError> {
    let pagamento = app_state
        .pagamento_service
        .criar_pagamento(usuario.id, &payload)
        .await?;

    Ok((StatusCode::CREATED, Json(pagamento)))
}
