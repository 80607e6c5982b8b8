// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    common::error::definir_modo_desenvolvimento,
    db::{PedidoRepository, ProdutoRepository, UsuarioRepository},
    services::{
        asaas::AsaasClient,
        auth::AuthService,
        mailer::{LogMailer, Mailer, SendGridMailer},
        pagamento_service::PagamentoService,
        pedido_service::PedidoService,
        produto_service::ProdutoService,
        usuario_service::UsuarioService,
        webhook_service::WebhookService,
    },
};

pub const ASAAS_SANDBOX_URL: &str = "https://sandbox.asaas.com/api/v3";

// Tudo que vem do ambiente (.env)
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_secret_recuperacao: String,
    pub jwt_expiracao_horas: i64,
    pub port: u16,
    pub cors_origin: String,
    pub modo_desenvolvimento: bool,
    pub asaas_api_key: String,
    pub asaas_base_url: String,
    pub asaas_webhook_token: Option<String>,
    pub asaas_timeout: Duration,
    pub sendgrid_api_key: Option<String>,
    pub email_remetente: String,
    pub reset_link_base: String,
}

fn var_opcional(nome: &str) -> Option<String> {
    env::var(nome).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn var_obrigatoria(nome: &str) -> anyhow::Result<String> {
    var_opcional(nome).with_context(|| format!("{nome} deve ser definida"))
}

fn var_numerica<T: std::str::FromStr>(nome: &str, padrao: T) -> anyhow::Result<T> {
    match var_opcional(nome) {
        Some(valor) => valor.parse().map_err(|_| anyhow::anyhow!("{nome} inválida: '{valor}'")),
        None => Ok(padrao),
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let jwt_secret = var_obrigatoria("JWT_SECRET")?;
        let jwt_secret_recuperacao =
            var_opcional("JWT_SECRET_RECUPERACAO").unwrap_or_else(|| format!("{jwt_secret}_recuperacao"));

        Ok(Self {
            database_url: var_obrigatoria("DATABASE_URL")?,
            jwt_secret,
            jwt_secret_recuperacao,
            jwt_expiracao_horas: var_numerica("JWT_EXPIRACAO_HORAS", 2)?,
            port: var_numerica("PORT", 5000)?,
            cors_origin: var_opcional("CORS_ORIGIN").unwrap_or_else(|| "*".to_string()),
            modo_desenvolvimento: var_opcional("APP_ENV").as_deref() == Some("development"),
            asaas_api_key: var_obrigatoria("ASAAS_API_KEY")?,
            asaas_base_url: var_opcional("ASAAS_BASE_URL").unwrap_or_else(|| ASAAS_SANDBOX_URL.to_string()),
            asaas_webhook_token: var_opcional("ASAAS_WEBHOOK_TOKEN"),
            asaas_timeout: Duration::from_secs(var_numerica("ASAAS_TIMEOUT_SEGUNDOS", 30)?),
            sendgrid_api_key: var_opcional("SENDGRID_API_KEY"),
            email_remetente: var_opcional("EMAIL_REMETENTE")
                .unwrap_or_else(|| "contato@pizzaria.com.br".to_string()),
            reset_link_base: var_opcional("RESET_LINK_BASE")
                .unwrap_or_else(|| "http://localhost:5173/resetar-senha".to_string()),
        })
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Arc<Config>,
    pub auth_service: AuthService,
    pub usuario_service: UsuarioService,
    pub produto_service: ProdutoService,
    pub pedido_service: PedidoService,
    pub pagamento_service: PagamentoService,
    pub webhook_service: WebhookService,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Self::with_pool(config, db_pool)
    }

    // --- Monta o gráfico de dependências ---
    pub fn with_pool(config: Config, db_pool: PgPool) -> anyhow::Result<Self> {
        definir_modo_desenvolvimento(config.modo_desenvolvimento);

        let http = reqwest::Client::builder()
            .timeout(config.asaas_timeout)
            .build()
            .context("Falha ao criar o cliente HTTP")?;

        let mailer: Arc<dyn Mailer> = match &config.sendgrid_api_key {
            Some(api_key) => Arc::new(SendGridMailer::new(
                http.clone(),
                api_key.clone(),
                config.email_remetente.clone(),
            )),
            None => {
                tracing::warn!("⚠️ SENDGRID_API_KEY não definida: e-mails serão apenas registrados no log.");
                Arc::new(LogMailer)
            }
        };

        if config.asaas_webhook_token.is_none() {
            tracing::warn!("⚠️ ASAAS_WEBHOOK_TOKEN não definido: o webhook aceitará qualquer origem.");
        }

        let usuario_repo = UsuarioRepository::new(db_pool.clone());
        let produto_repo = ProdutoRepository::new(db_pool.clone());
        let pedido_repo = PedidoRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            config.jwt_secret.clone(),
            config.jwt_secret_recuperacao.clone(),
            config.jwt_expiracao_horas,
        );
        let usuario_service = UsuarioService::new(
            usuario_repo.clone(),
            auth_service.clone(),
            mailer,
            config.reset_link_base.clone(),
        );
        let produto_service = ProdutoService::new(produto_repo.clone());
        let pedido_service = PedidoService::new(
            db_pool.clone(),
            pedido_repo.clone(),
            produto_repo,
            usuario_repo.clone(),
        );
        let asaas = AsaasClient::new(http, config.asaas_base_url.clone(), config.asaas_api_key.clone());
        let pagamento_service = PagamentoService::new(pedido_service.clone(), usuario_repo, asaas);
        let webhook_service = WebhookService::new(pedido_repo, config.asaas_webhook_token.clone());

        Ok(Self {
            db_pool,
            config: Arc::new(config),
            auth_service,
            usuario_service,
            produto_service,
            pedido_service,
            pagamento_service,
            webhook_service,
        })
    }
}
