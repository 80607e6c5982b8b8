pub mod usuario;
pub mod produto;
pub mod pedido;
pub mod pagamento;
pub mod webhook;
