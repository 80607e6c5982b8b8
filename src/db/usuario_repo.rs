// src/db/usuario_repo.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::usuario::{TipoUsuario, Usuario},
};

const SELECT_USUARIO: &str =
    "SELECT id, nome, cpf, email, telefone, senha, tipo, created_at FROM usuarios";

// O repositório de usuários, responsável por todas as interações com a tabela 'usuarios'
#[derive(Clone)]
pub struct UsuarioRepository {
    pool: PgPool,
}

impl UsuarioRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Usuario>, AppError> {
        let usuario = sqlx::query_as::<_, Usuario>(&format!("{SELECT_USUARIO} WHERE email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(usuario)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Usuario>, AppError> {
        let usuario = sqlx::query_as::<_, Usuario>(&format!("{SELECT_USUARIO} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(usuario)
    }

    pub async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<Usuario>, AppError> {
        let usuarios = sqlx::query_as::<_, Usuario>(&format!("{SELECT_USUARIO} WHERE id = ANY($1)"))
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(usuarios)
    }

    // Verificação prévia de duplicidade, antes de gastar tempo com o bcrypt
    pub async fn find_by_email_ou_cpf(&self, email: &str, cpf: &str) -> Result<Option<Usuario>, AppError> {
        let usuario = sqlx::query_as::<_, Usuario>(&format!(
            "{SELECT_USUARIO} WHERE email = $1 OR cpf = $2 LIMIT 1"
        ))
        .bind(email)
        .bind(cpf)
        .fetch_optional(&self.pool)
        .await?;
        Ok(usuario)
    }

    pub async fn listar(&self) -> Result<Vec<Usuario>, AppError> {
        let usuarios = sqlx::query_as::<_, Usuario>(&format!("{SELECT_USUARIO} ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;
        Ok(usuarios)
    }

    // Cria um novo usuário no banco de dados.
    // A violação de unicidade vira 409, com a mensagem do campo que colidiu.
    pub async fn create_usuario(
        &self,
        nome: &str,
        cpf: &str,
        email: &str,
        telefone: &str,
        senha_hash: &str,
        tipo: TipoUsuario,
    ) -> Result<Usuario, AppError> {
        sqlx::query_as::<_, Usuario>(
            r#"
            INSERT INTO usuarios (nome, cpf, email, telefone, senha, tipo)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, nome, cpf, email, telefone, senha, tipo, created_at
            "#,
        )
        .bind(nome)
        .bind(cpf)
        .bind(email)
        .bind(telefone)
        .bind(senha_hash)
        .bind(tipo)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return match db_err.constraint() {
                        Some("usuarios_cpf_key") => AppError::Conflict("CPF já cadastrado.".into()),
                        _ => AppError::Conflict("E-mail já cadastrado.".into()),
                    };
                }
            }
            e.into()
        })
    }

    // Retorna false se o usuário não existe mais
    pub async fn atualizar_senha(&self, id: i32, senha_hash: &str) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE usuarios SET senha = $1 WHERE id = $2")
            .bind(senha_hash)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
