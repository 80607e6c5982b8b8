// src/routes.rs

use axum::{
    http::{HeaderName, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    common::error::tratar_panic,
    config::AppState,
    docs::ApiDoc,
    handlers,
    middleware::{auth::auth_guard, rbac::gerente_guard},
};

// Monta a aplicação completa. Usado pelo main e pelos testes de integração.
pub fn router(app_state: AppState) -> Router {
    // Rotas públicas (sem autenticação)
    let public = Router::new()
        .route("/", get(handlers::index::index))
        .route("/health", get(handlers::index::health))
        .route("/usuarios", post(handlers::usuarios::cadastrar))
        .route("/usuarios/login", post(handlers::usuarios::login))
        .route("/usuarios/recuperar-senha", post(handlers::usuarios::recuperar_senha))
        .route("/usuarios/resetar-senha", post(handlers::usuarios::resetar_senha))
        .route("/produtos", get(handlers::produtos::listar))
        .route("/produtos/{id}", get(handlers::produtos::buscar))
        .route("/webhook/asaas", post(handlers::webhook::receber));

    // Qualquer usuário logado
    let autenticado = Router::new()
        .route("/pedidos", post(handlers::pedidos::criar))
        .route("/meus-pedidos", get(handlers::pedidos::meus_pedidos))
        .route("/pedidos/{id}", get(handlers::pedidos::buscar))
        .route("/pagamentos", post(handlers::pagamentos::criar))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    // Apenas GERENTE. O auth_guard é a camada externa, então roda primeiro.
    let gerente = Router::new()
        .route("/usuarios", get(handlers::usuarios::listar))
        .route("/produtos", post(handlers::produtos::criar))
        .route(
            "/produtos/{id}",
            put(handlers::produtos::atualizar).delete(handlers::produtos::remover),
        )
        .route("/pedidos", get(handlers::pedidos::listar_todos))
        .route(
            "/pedidos/{id}",
            put(handlers::pedidos::atualizar).delete(handlers::pedidos::remover),
        )
        .layer(axum_middleware::from_fn(gerente_guard))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    let cors = cors_layer(&app_state.config.cors_origin);

    public
        .merge(autenticado)
        .merge(gerente)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(handlers::index::rota_nao_encontrada)
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(tratar_panic))
}

// "*" libera qualquer origem; senão, lista separada por vírgulas
fn cors_layer(origens: &str) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            HeaderName::from_static("asaas-access-token"),
        ]);

    if origens.trim() == "*" {
        return base.allow_origin(Any);
    }

    let lista: Vec<HeaderValue> = origens
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(valor) => Some(valor),
            Err(_) => {
                tracing::warn!("⚠️ Origem CORS ignorada: '{}'", o);
                None
            }
        })
        .collect();

    base.allow_origin(AllowOrigin::list(lista))
}
