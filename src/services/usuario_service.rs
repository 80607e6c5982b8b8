// src/services/usuario_service.rs

use std::sync::Arc;

use crate::{
    common::{cpf::normalizar_cpf, error::AppError},
    db::UsuarioRepository,
    models::usuario::{AuthResponse, TipoUsuario, Usuario},
    services::{
        auth::AuthService,
        mailer::{email_recuperacao, Mailer},
    },
};

pub const MENSAGEM_RECUPERACAO: &str = "Se o e-mail estiver cadastrado, você receberá instruções.";

#[derive(Clone)]
pub struct UsuarioService {
    usuario_repo: UsuarioRepository,
    auth_service: AuthService,
    mailer: Arc<dyn Mailer>,
    reset_link_base: String,
}

impl UsuarioService {
    pub fn new(
        usuario_repo: UsuarioRepository,
        auth_service: AuthService,
        mailer: Arc<dyn Mailer>,
        reset_link_base: String,
    ) -> Self {
        Self { usuario_repo, auth_service, mailer, reset_link_base }
    }

    // Cadastro público: todo usuário nasce CLIENTE
    pub async fn cadastrar(
        &self,
        nome: &str,
        email: &str,
        telefone: &str,
        senha: &str,
        cpf: &str,
    ) -> Result<AuthResponse, AppError> {
        let email = email.trim().to_lowercase();
        let cpf = normalizar_cpf(cpf);

        // 1. Duplicidade antes do hashing. A constraint do banco ainda cobre a corrida.
        if let Some(existente) = self.usuario_repo.find_by_email_ou_cpf(&email, &cpf).await? {
            let msg = if existente.email == email { "E-mail já cadastrado." } else { "CPF já cadastrado." };
            return Err(AppError::Conflict(msg.into()));
        }

        // 2. Hashing
        let senha_hash = self.auth_service.hash_senha(senha).await?;

        // 3. Persistência
        let usuario = self
            .usuario_repo
            .create_usuario(nome.trim(), &cpf, &email, telefone.trim(), &senha_hash, TipoUsuario::Cliente)
            .await?;

        tracing::info!("👤 Usuário {} cadastrado", usuario.id);

        // 4. Token
        let token = self.auth_service.criar_token(&usuario)?;
        Ok(AuthResponse { token, usuario })
    }

    // E-mail desconhecido e senha errada produzem exatamente o mesmo erro
    pub async fn login(&self, email: &str, senha: &str) -> Result<AuthResponse, AppError> {
        let email = email.trim().to_lowercase();

        let usuario = self
            .usuario_repo
            .find_by_email(&email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !self.auth_service.verificar_senha(senha, &usuario.senha).await? {
            return Err(AppError::InvalidCredentials);
        }

        let token = self.auth_service.criar_token(&usuario)?;
        Ok(AuthResponse { token, usuario })
    }

    pub async fn listar(&self) -> Result<Vec<Usuario>, AppError> {
        self.usuario_repo.listar().await
    }

    // A resposta é a mesma exista ou não o e-mail
    pub async fn solicitar_recuperacao(&self, email: &str) -> Result<(), AppError> {
        let email = email.trim().to_lowercase();

        let Some(usuario) = self.usuario_repo.find_by_email(&email).await? else {
            tracing::info!("🔑 Recuperação solicitada para e-mail não cadastrado");
            return Ok(());
        };

        let token = self.auth_service.criar_token_recuperacao(usuario.id)?;
        let link = format!("{}?token={}", self.reset_link_base, token);

        self.mailer.enviar(email_recuperacao(&usuario.email, &link)).await?;
        tracing::info!("🔑 Link de recuperação gerado para o usuário {}", usuario.id);
        Ok(())
    }

    pub async fn resetar_senha(&self, token: &str, nova_senha: &str) -> Result<(), AppError> {
        let usuario_id = self.auth_service.validar_token_recuperacao(token)?;
        let senha_hash = self.auth_service.hash_senha(nova_senha).await?;

        if !self.usuario_repo.atualizar_senha(usuario_id, &senha_hash).await? {
            return Err(AppError::not_found("Usuário não encontrado."));
        }

        tracing::info!("🔑 Senha redefinida para o usuário {}", usuario_id);
        Ok(())
    }
}
