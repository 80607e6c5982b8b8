// src/handlers/usuarios.rs

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::WithRejection;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::usuario::{
        AuthResponse, CadastroUsuarioPayload, LoginPayload, MensagemResponse, RecuperarSenhaPayload,
        ResetarSenhaPayload, Usuario,
    },
    services::usuario_service::MENSAGEM_RECUPERACAO,
};

// Cadastro público
#[utoipa::path(
    post,
    path = "/usuarios",
    tag = "Usuários",
    request_body = CadastroUsuarioPayload,
    responses(
        (status = 201, description = "Usuário criado", body = AuthResponse),
        (status = 400, description = "Campos inválidos"),
        (status = 409, description = "E-mail ou CPF já cadastrado")
    )
)]
pub async fn cadastrar(
    State(app_state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<CadastroUsuarioPayload>, AppError>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    payload.validate()?;

    // Após o validate os campos obrigatórios estão presentes
    let (Some(nome), Some(email), Some(telefone), Some(senha), Some(cpf)) =
        (payload.nome, payload.email, payload.telefone, payload.senha, payload.cpf)
    else {
        return Err(AppError::bad_request("Todos os campos são obrigatórios."));
    };

    let resposta = app_state
        .usuario_service
        .cadastrar(&nome, &email, &telefone, &senha, &cpf)
        .await?;

    Ok((StatusCode::CREATED, Json(resposta)))
}

#[utoipa::path(
    post,
    path = "/usuarios/login",
    tag = "Usuários",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Login realizado", body = AuthResponse),
        (status = 401, description = "E-mail ou senha inválidos")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<LoginPayload>, AppError>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate()?;

    let resposta = app_state.usuario_service.login(&payload.email, &payload.senha).await?;
    Ok(Json(resposta))
}

#[utoipa::path(
    get,
    path = "/usuarios",
    tag = "Usuários",
    responses(
        (status = 200, description = "Todos os usuários", body = Vec<Usuario>),
        (status = 403, description = "Apenas gerentes")
    ),
    security(("api_jwt" = []))
)]
pub async fn listar(State(app_state): State<AppState>) -> Result<Json<Vec<Usuario>>, AppError> {
    let usuarios = app_state.usuario_service.listar().await?;
    Ok(Json(usuarios))
}

// Sempre responde a mesma mensagem, exista ou não o e-mail
#[utoipa::path(
    post,
    path = "/usuarios/recuperar-senha",
    tag = "Usuários",
    request_body = RecuperarSenhaPayload,
    responses(
        (status = 200, description = "Instruções enviadas, se o e-mail existir", body = MensagemResponse)
    )
)]
pub async fn recuperar_senha(
    State(app_state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<RecuperarSenhaPayload>, AppError>,
) -> Result<Json<MensagemResponse>, AppError> {
    payload.validate()?;

    app_state.usuario_service.solicitar_recuperacao(&payload.email).await?;
    Ok(Json(MensagemResponse::new(MENSAGEM_RECUPERACAO)))
}

#[utoipa::path(
    post,
    path = "/usuarios/resetar-senha",
    tag = "Usuários",
    request_body = ResetarSenhaPayload,
    responses(
        (status = 200, description = "Senha redefinida", body = MensagemResponse),
        (status = 400, description = "Token inválido ou expirado")
    )
)]
pub async fn resetar_senha(
    State(app_state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<ResetarSenhaPayload>, AppError>,
) -> Result<Json<MensagemResponse>, AppError> {
    payload.validate()?;

    app_state
        .usuario_service
        .resetar_senha(&payload.token, &payload.nova_senha)
        .await?;

    Ok(Json(MensagemResponse::new("Senha redefinida com sucesso.")))
}
