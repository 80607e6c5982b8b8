// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Sistema ---
        handlers::index::index,
        handlers::index::health,

        // --- Usuários ---
        handlers::usuarios::cadastrar,
        handlers::usuarios::login,
        handlers::usuarios::listar,
        handlers::usuarios::recuperar_senha,
        handlers::usuarios::resetar_senha,

        // --- Produtos ---
        handlers::produtos::criar,
        handlers::produtos::listar,
        handlers::produtos::buscar,
        handlers::produtos::atualizar,
        handlers::produtos::remover,

        // --- Pedidos ---
        handlers::pedidos::criar,
        handlers::pedidos::listar_todos,
        handlers::pedidos::meus_pedidos,
        handlers::pedidos::buscar,
        handlers::pedidos::atualizar,
        handlers::pedidos::remover,

        // --- Pagamentos ---
        handlers::pagamentos::criar,
        handlers::webhook::receber,
    ),
    components(
        schemas(
            // --- Usuários ---
            models::usuario::TipoUsuario,
            models::usuario::Usuario,
            models::usuario::CadastroUsuarioPayload,
            models::usuario::LoginPayload,
            models::usuario::RecuperarSenhaPayload,
            models::usuario::ResetarSenhaPayload,
            models::usuario::AuthResponse,
            models::usuario::MensagemResponse,

            // --- Produtos ---
            models::produto::Produto,
            handlers::produtos::CriarProdutoPayload,
            handlers::produtos::AtualizarProdutoPayload,

            // --- Pedidos ---
            models::pedido::StatusPedido,
            models::pedido::Pedido,
            models::pedido::ItemPedido,
            models::pedido::ItemPedidoDetalhado,
            models::pedido::PedidoDetalhado,
            handlers::pedidos::CriarPedidoPayload,
            handlers::pedidos::ItemPedidoPayload,
            handlers::pedidos::AtualizarPedidoPayload,

            // --- Pagamentos ---
            models::pagamento::MetodoPagamento,
            models::pagamento::CartaoPayload,
            models::pagamento::CriarPagamentoPayload,
            models::pagamento::PagamentoResponse,
            models::webhook::WebhookPayload,
            models::webhook::WebhookPayment,
            models::webhook::WebhookResponse,

            handlers::index::IndexResponse,
        )
    ),
    tags(
        (name = "Sistema", description = "Índice e saúde da API"),
        (name = "Usuários", description = "Cadastro, login e recuperação de senha"),
        (name = "Produtos", description = "Cardápio da pizzaria"),
        (name = "Pedidos", description = "Pedidos e seus itens"),
        (name = "Pagamentos", description = "Cobranças no Asaas"),
        (name = "Webhook", description = "Notificações do Asaas")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documento_lista_rotas_e_esquema_de_seguranca() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/pedidos/{id}"));
        assert!(doc.paths.paths.contains_key("/webhook/asaas"));
        let componentes = doc.components.expect("components");
        assert!(componentes.security_schemes.contains_key("api_jwt"));
    }
}
