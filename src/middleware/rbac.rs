// src/middleware/rbac.rs

use axum::{extract::Request, middleware::Next, response::Response};

use crate::{
    common::error::AppError,
    middleware::auth::UsuarioAutenticado,
    models::usuario::TipoUsuario,
};

// Deve rodar depois do auth_guard: exige tipo GERENTE
pub async fn gerente_guard(request: Request, next: Next) -> Result<Response, AppError> {
    let usuario = request
        .extensions()
        .get::<UsuarioAutenticado>()
        .copied()
        .ok_or_else(|| AppError::Unauthenticated("Usuário não autenticado.".into()))?;

    if usuario.tipo != TipoUsuario::Gerente {
        tracing::warn!("🚫 Usuário {} tentou acessar rota de gerente", usuario.id);
        return Err(AppError::forbidden(
            "Acesso negado. Apenas gerentes podem acessar este recurso.",
        ));
    }

    Ok(next.run(request).await)
}
