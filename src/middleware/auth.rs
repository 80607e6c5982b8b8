// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    typed_header::TypedHeaderRejection,
    TypedHeader,
};

use crate::{common::error::AppError, config::AppState, models::usuario::TipoUsuario};

// Identidade extraída do token e anexada à requisição
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsuarioAutenticado {
    pub id: i32,
    pub tipo: TipoUsuario,
}

// O middleware em si: sem token válido a requisição não chega ao handler
pub async fn auth_guard(
    State(app_state): State<AppState>,
    bearer: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let TypedHeader(Authorization(bearer)) = bearer.map_err(|rejection| {
        if rejection.is_missing() {
            AppError::Unauthenticated("Token de autenticação não fornecido.".into())
        } else {
            AppError::Unauthenticated("Formato de token inválido. Use: Bearer <token>".into())
        }
    })?;

    let claims = app_state.auth_service.validar_token(bearer.token())?;

    // Insere o usuário nos "extensions" da requisição
    request.extensions_mut().insert(UsuarioAutenticado {
        id: claims.sub,
        tipo: claims.tipo,
    });

    Ok(next.run(request).await)
}

// Extrator para obter o usuário autenticado diretamente nos handlers
impl<S> FromRequestParts<S> for UsuarioAutenticado
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<UsuarioAutenticado>()
            .copied()
            .ok_or_else(|| AppError::Unauthenticated("Usuário não autenticado.".into()))
    }
}
