// src/handlers/index.rs

use axum::{
    extract::State,
    http::{Method, StatusCode, Uri},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::config::AppState;

const ROTAS: &[&str] = &[
    "POST /usuarios",
    "POST /usuarios/login",
    "POST /usuarios/recuperar-senha",
    "POST /usuarios/resetar-senha",
    "GET /usuarios",
    "GET /produtos",
    "GET /produtos/{id}",
    "POST /produtos",
    "PUT /produtos/{id}",
    "DELETE /produtos/{id}",
    "POST /pedidos",
    "GET /meus-pedidos",
    "GET /pedidos",
    "GET /pedidos/{id}",
    "PUT /pedidos/{id}",
    "DELETE /pedidos/{id}",
    "POST /pagamentos",
    "POST /webhook/asaas",
    "GET /health",
    "GET /swagger-ui",
];

#[derive(Debug, Serialize, ToSchema)]
pub struct IndexResponse {
    pub titulo: String,
    pub rotas: Vec<String>,
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Sistema",
    responses((status = 200, description = "Rotas disponíveis", body = IndexResponse))
)]
pub async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        titulo: "API da Pizzaria".to_string(),
        rotas: ROTAS.iter().map(|r| r.to_string()).collect(),
    })
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Sistema",
    responses(
        (status = 200, description = "API e banco de dados no ar"),
        (status = 503, description = "Banco de dados indisponível")
    )
)]
pub async fn health(State(app_state): State<AppState>) -> impl IntoResponse {
    match sqlx::query("SELECT 1").execute(&app_state.db_pool).await {
        Ok(_) => (StatusCode::OK, "OK"),
        Err(e) => {
            tracing::error!("❌ Health check falhou: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "Banco de dados indisponível")
        }
    }
}

// Fallback para qualquer rota não registrada
pub async fn rota_nao_encontrada(method: Method, uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Rota não encontrada",
            "path": uri.path(),
            "method": method.as_str(),
        })),
    )
}
