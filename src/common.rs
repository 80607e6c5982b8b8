pub mod error;
pub mod cpf;
