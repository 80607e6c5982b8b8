// src/handlers/produtos.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::{
    common::error::AppError,
    config::AppState,
    models::{
        produto::{AlteracaoProduto, NovoProduto, Produto},
        usuario::MensagemResponse,
    },
};

// Limites da coluna NUMERIC(10, 2)
const CASAS_DECIMAIS_PRECO: u32 = 2;

fn preco_maximo() -> Decimal {
    Decimal::new(9_999_999_999, CASAS_DECIMAIS_PRECO)
}

fn erro_preco(msg: &'static str) -> ValidationError {
    let mut err = ValidationError::new("range");
    err.message = Some(msg.into());
    err
}

fn validate_preco(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = erro_preco("O preço não pode ser negativo.");
        err.add_param("min".into(), &0.0);
        return Err(err);
    }
    if *val > preco_maximo() {
        let mut err = erro_preco("O preço deve ser no máximo 99999999.99.");
        err.add_param("max".into(), &preco_maximo().to_string());
        return Err(err);
    }
    if val.normalize().scale() > CASAS_DECIMAIS_PRECO {
        return Err(erro_preco("O preço deve ter no máximo 2 casas decimais."));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CriarProdutoPayload {
    #[validate(
        required(message = "O campo 'nome' é obrigatório."),
        length(min = 1, message = "O campo 'nome' é obrigatório.")
    )]
    #[schema(example = "frango com catupiry")]
    pub nome: Option<String>,

    #[schema(example = "molho de tomate, frango e catupiry")]
    pub descricao: Option<String>,

    #[validate(
        required(message = "O campo 'preco' é obrigatório."),
        custom(function = "validate_preco")
    )]
    #[schema(example = 70.99)]
    pub preco: Option<Decimal>,

    #[validate(range(min = 0, message = "A quantidade não pode ser negativa."))]
    #[schema(example = 1)]
    pub quantidade: Option<i32>,

    pub imagem: Option<String>,
    pub marca: Option<String>,
}

// Todos opcionais: só o que vier é alterado
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AtualizarProdutoPayload {
    #[validate(length(min = 1, message = "O campo 'nome' não pode ser vazio."))]
    pub nome: Option<String>,
    pub descricao: Option<String>,
    #[validate(custom(function = "validate_preco"))]
    pub preco: Option<Decimal>,
    #[validate(range(min = 0, message = "A quantidade não pode ser negativa."))]
    pub quantidade: Option<i32>,
    pub imagem: Option<String>,
    pub marca: Option<String>,
}

impl From<AtualizarProdutoPayload> for AlteracaoProduto {
    fn from(p: AtualizarProdutoPayload) -> Self {
        Self {
            nome: p.nome.map(|n| n.trim().to_string()),
            descricao: p.descricao,
            preco: p.preco,
            quantidade: p.quantidade,
            imagem: p.imagem,
            marca: p.marca,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FiltroProdutos {
    /// Marca exata, sem diferenciar maiúsculas
    pub marca: Option<String>,
}

#[utoipa::path(
    post,
    path = "/produtos",
    tag = "Produtos",
    request_body = CriarProdutoPayload,
    responses(
        (status = 201, description = "Produto criado", body = Produto),
        (status = 400, description = "Campos inválidos"),
        (status = 403, description = "Apenas gerentes")
    ),
    security(("api_jwt" = []))
)]
pub async fn criar(
    State(app_state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<CriarProdutoPayload>, AppError>,
) -> Result<(StatusCode, Json<Produto>), AppError> {
    payload.validate()?;

    let (Some(nome), Some(preco)) = (payload.nome, payload.preco) else {
        return Err(AppError::bad_request("Nome e preço são obrigatórios."));
    };

    let novo = NovoProduto {
        nome: nome.trim().to_string(),
        descricao: payload.descricao.unwrap_or_default(),
        preco,
        quantidade: payload.quantidade.unwrap_or(0),
        imagem: payload.imagem.unwrap_or_default(),
        marca: payload.marca,
    };

    let produto = app_state.produto_service.criar(novo).await?;
    Ok((StatusCode::CREATED, Json(produto)))
}

#[utoipa::path(
    get,
    path = "/produtos",
    tag = "Produtos",
    params(FiltroProdutos),
    responses(
        (status = 200, description = "Cardápio", body = Vec<Produto>)
    )
)]
pub async fn listar(
    State(app_state): State<AppState>,
    WithRejection(Query(filtro), _): WithRejection<Query<FiltroProdutos>, AppError>,
) -> Result<Json<Vec<Produto>>, AppError> {
    let produtos = app_state.produto_service.listar(filtro.marca.as_deref()).await?;
    Ok(Json(produtos))
}

#[utoipa::path(
    get,
    path = "/produtos/{id}",
    tag = "Produtos",
    params(("id" = i32, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Produto", body = Produto),
        (status = 404, description = "Produto não encontrado")
    )
)]
pub async fn buscar(
    State(app_state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, AppError>,
) -> Result<Json<Produto>, AppError> {
    let produto = app_state.produto_service.buscar(id).await?;
    Ok(Json(produto))
}

#[utoipa::path(
    put,
    path = "/produtos/{id}",
    tag = "Produtos",
    request_body = AtualizarProdutoPayload,
    params(("id" = i32, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Produto atualizado", body = Produto),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn atualizar(
    State(app_state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, AppError>,
    WithRejection(Json(payload), _): WithRejection<Json<AtualizarProdutoPayload>, AppError>,
) -> Result<Json<Produto>, AppError> {
    payload.validate()?;

    let produto = app_state.produto_service.atualizar(id, payload.into()).await?;
    Ok(Json(produto))
}

#[utoipa::path(
    delete,
    path = "/produtos/{id}",
    tag = "Produtos",
    params(("id" = i32, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Produto removido", body = MensagemResponse),
        (status = 404, description = "Produto não encontrado"),
        (status = 409, description = "Produto presente em pedidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn remover(
    State(app_state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, AppError>,
) -> Result<Json<MensagemResponse>, AppError> {
    app_state.produto_service.remover(id).await?;
    Ok(Json(MensagemResponse::new("Produto removido com sucesso.")))
}
