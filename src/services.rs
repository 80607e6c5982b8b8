pub mod auth;
pub mod mailer;
pub mod asaas;
pub mod usuario_service;
pub mod produto_service;
pub mod pedido_service;
pub mod pagamento_service;
pub mod webhook_service;
