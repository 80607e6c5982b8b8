pub mod index;
pub mod pagamentos;
pub mod pedidos;
pub mod produtos;
pub mod usuarios;
pub mod webhook;
