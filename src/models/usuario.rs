// src/models/usuario.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::common::cpf::cpf_tem_onze_digitos;

// Papel do usuário. GERENTE gerencia catálogo, pedidos e usuários.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "tipo_usuario", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TipoUsuario {
    Cliente,
    Gerente,
}

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Usuario {
    #[schema(example = 7)]
    pub id: i32,
    #[schema(example = "Maria Luiza")]
    pub nome: String,
    #[schema(example = "12345678909")]
    pub cpf: String,
    #[schema(example = "maria@gmail.com")]
    pub email: String,
    #[schema(example = "19999999999")]
    pub telefone: String,

    #[serde(skip_serializing)] // Nunca sai na resposta
    #[schema(ignore)]
    pub senha: String,

    pub tipo: TipoUsuario,
    pub created_at: DateTime<Utc>,
}

fn validar_cpf(cpf: &str) -> Result<(), ValidationError> {
    if !cpf_tem_onze_digitos(cpf) {
        let mut err = ValidationError::new("cpf");
        err.message = Some("O CPF deve conter 11 dígitos.".into());
        return Err(err);
    }
    Ok(())
}

// Dados para cadastro de um novo usuário
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CadastroUsuarioPayload {
    #[validate(
        required(message = "O campo 'nome' é obrigatório."),
        length(min = 1, message = "O campo 'nome' é obrigatório.")
    )]
    #[schema(example = "Maria Luiza")]
    pub nome: Option<String>,

    #[validate(
        required(message = "O campo 'email' é obrigatório."),
        email(message = "O e-mail fornecido é inválido.")
    )]
    #[schema(example = "maria@gmail.com")]
    pub email: Option<String>,

    #[validate(
        required(message = "O campo 'telefone' é obrigatório."),
        length(min = 1, message = "O campo 'telefone' é obrigatório.")
    )]
    #[schema(example = "19999999999")]
    pub telefone: Option<String>,

    #[validate(
        required(message = "O campo 'senha' é obrigatório."),
        length(min = 6, message = "A senha deve ter no mínimo 6 caracteres.")
    )]
    #[schema(example = "senha123")]
    pub senha: Option<String>,

    #[validate(
        required(message = "O campo 'cpf' é obrigatório."),
        custom(function = "validar_cpf")
    )]
    #[schema(example = "123.456.789-09")]
    pub cpf: Option<String>,
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginPayload {
    #[validate(length(min = 1, message = "O campo 'email' é obrigatório."))]
    #[serde(default)]
    pub email: String,
    #[validate(length(min = 1, message = "O campo 'senha' é obrigatório."))]
    #[serde(default)]
    pub senha: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RecuperarSenhaPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetarSenhaPayload {
    #[validate(length(min = 1, message = "O token é obrigatório."))]
    #[serde(default)]
    pub token: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    #[serde(default)]
    pub nova_senha: String,
}

// Resposta de autenticação (cadastro e login)
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub usuario: Usuario,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MensagemResponse {
    pub mensagem: String,
}

impl MensagemResponse {
    pub fn new(mensagem: impl Into<String>) -> Self {
        Self { mensagem: mensagem.into() }
    }
}

// Estrutura de dados ("claims") dentro do JWT de sessão
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,          // ID do usuário
    pub email: String,
    pub tipo: TipoUsuario,
    pub exp: usize,
    pub iat: usize,
}

// Claims do token de recuperação de senha (segredo próprio, vida curta)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimsRecuperacao {
    pub sub: i32,
    pub finalidade: String,
    pub exp: usize,
    pub iat: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload_valido() -> CadastroUsuarioPayload {
        CadastroUsuarioPayload {
            nome: Some("Maria".into()),
            email: Some("maria@gmail.com".into()),
            telefone: Some("19999999999".into()),
            senha: Some("senha123".into()),
            cpf: Some("123.456.789-09".into()),
        }
    }

    #[test]
    fn cadastro_valido_passa() {
        assert!(payload_valido().validate().is_ok());
    }

    #[test]
    fn cpf_curto_e_rejeitado() {
        let mut payload = payload_valido();
        payload.cpf = Some("000.000.000.0".into());

        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("cpf"));
    }

    #[test]
    fn campos_ausentes_sao_rejeitados() {
        let payload = CadastroUsuarioPayload {
            nome: None,
            email: None,
            telefone: None,
            senha: None,
            cpf: None,
        };

        let errors = payload.validate().unwrap_err();
        let campos = errors.field_errors();
        for campo in ["nome", "email", "telefone", "senha", "cpf"] {
            assert!(campos.contains_key(campo), "faltou erro para {campo}");
        }
    }

    #[test]
    fn email_invalido_e_rejeitado() {
        let mut payload = payload_valido();
        payload.email = Some("maria.gmail.com".into());
        assert!(payload.validate().unwrap_err().field_errors().contains_key("email"));
    }

    #[test]
    fn senha_nunca_e_serializada() {
        let usuario = Usuario {
            id: 1,
            nome: "Maria".into(),
            cpf: "12345678909".into(),
            email: "maria@gmail.com".into(),
            telefone: "19999999999".into(),
            senha: "$2b$12$hash".into(),
            tipo: TipoUsuario::Cliente,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&usuario).unwrap();
        assert!(json.get("senha").is_none());
        assert_eq!(json["tipo"], "CLIENTE");
        assert!(json.get("createdAt").is_some());
    }
}
