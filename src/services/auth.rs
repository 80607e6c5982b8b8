// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};

use crate::{
    common::error::AppError,
    models::usuario::{Claims, ClaimsRecuperacao, Usuario},
};

const FINALIDADE_RECUPERACAO: &str = "recuperacao";
const VALIDADE_RECUPERACAO_MINUTOS: i64 = 15;

// Hash de senha (bcrypt) e emissão/validação dos JWTs. Não toca no banco.
#[derive(Clone)]
pub struct AuthService {
    jwt_secret: String,
    jwt_secret_recuperacao: String,
    expiracao_horas: i64,
}

impl AuthService {
    pub fn new(jwt_secret: String, jwt_secret_recuperacao: String, expiracao_horas: i64) -> Self {
        Self { jwt_secret, jwt_secret_recuperacao, expiracao_horas }
    }

    // O bcrypt é CPU-bound: roda fora do executor assíncrono
    pub async fn hash_senha(&self, senha: &str) -> Result<String, AppError> {
        let senha = senha.to_owned();
        let senha_hash = tokio::task::spawn_blocking(move || hash(&senha, bcrypt::DEFAULT_COST))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
        Ok(senha_hash)
    }

    pub async fn verificar_senha(&self, senha: &str, senha_hash: &str) -> Result<bool, AppError> {
        let senha = senha.to_owned();
        let senha_hash = senha_hash.to_owned();
        let valida = tokio::task::spawn_blocking(move || verify(&senha, &senha_hash))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;
        Ok(valida)
    }

    pub fn criar_token(&self, usuario: &Usuario) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::hours(self.expiracao_horas);

        let claims = Claims {
            sub: usuario.id,
            email: usuario.email.clone(),
            tipo: usuario.tipo,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }

    // Assinatura e expiração. A mensagem distingue token expirado de token inválido.
    pub fn validar_token(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AppError::Unauthenticated("Token expirado.".into()),
            _ => AppError::Unauthenticated("Token inválido.".into()),
        })
    }

    pub fn criar_token_recuperacao(&self, usuario_id: i32) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::minutes(VALIDADE_RECUPERACAO_MINUTOS);

        let claims = ClaimsRecuperacao {
            sub: usuario_id,
            finalidade: FINALIDADE_RECUPERACAO.to_string(),
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret_recuperacao.as_ref()),
        )?)
    }

    // Devolve o id do usuário dono do token de recuperação
    pub fn validar_token_recuperacao(&self, token: &str) -> Result<i32, AppError> {
        let invalido = || AppError::bad_request("Token inválido ou expirado.");

        let claims = decode::<ClaimsRecuperacao>(
            token,
            &DecodingKey::from_secret(self.jwt_secret_recuperacao.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| invalido())?
        .claims;

        if claims.finalidade != FINALIDADE_RECUPERACAO {
            return Err(invalido());
        }
        Ok(claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::usuario::TipoUsuario;

    fn service() -> AuthService {
        AuthService::new("segredo-de-teste".into(), "segredo-recuperacao".into(), 2)
    }

    fn usuario(tipo: TipoUsuario) -> Usuario {
        Usuario {
            id: 7,
            nome: "Maria".into(),
            cpf: "12345678909".into(),
            email: "maria@gmail.com".into(),
            telefone: "19999999999".into(),
            senha: String::new(),
            tipo,
            created_at: Utc::now(),
        }
    }

    fn token_expirado(secret: &str) -> String {
        let passado = Utc::now() - chrono::Duration::hours(3);
        let claims = Claims {
            sub: 7,
            email: "maria@gmail.com".into(),
            tipo: TipoUsuario::Cliente,
            exp: passado.timestamp() as usize,
            iat: (passado - chrono::Duration::hours(2)).timestamp() as usize,
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_ref())).unwrap()
    }

    #[test]
    fn token_carrega_id_e_tipo() {
        let service = service();
        let token = service.criar_token(&usuario(TipoUsuario::Gerente)).unwrap();

        let claims = service.validar_token(&token).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.tipo, TipoUsuario::Gerente);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn token_de_outro_segredo_e_invalido() {
        let outro = AuthService::new("outro".into(), "x".into(), 2);
        let token = outro.criar_token(&usuario(TipoUsuario::Cliente)).unwrap();

        match service().validar_token(&token) {
            Err(AppError::Unauthenticated(msg)) => assert_eq!(msg, "Token inválido."),
            other => panic!("esperava 401, veio {other:?}"),
        }
    }

    #[test]
    fn token_expirado_tem_mensagem_propria() {
        let token = token_expirado("segredo-de-teste");
        match service().validar_token(&token) {
            Err(AppError::Unauthenticated(msg)) => assert_eq!(msg, "Token expirado."),
            other => panic!("esperava 401, veio {other:?}"),
        }
    }

    #[test]
    fn token_de_sessao_nao_serve_para_recuperacao() {
        let service = service();
        let sessao = service.criar_token(&usuario(TipoUsuario::Cliente)).unwrap();
        assert!(matches!(service.validar_token_recuperacao(&sessao), Err(AppError::BadRequest(_))));

        let recuperacao = service.criar_token_recuperacao(7).unwrap();
        assert_eq!(service.validar_token_recuperacao(&recuperacao).unwrap(), 7);
        assert!(service.validar_token(&recuperacao).is_err());
    }

    #[tokio::test]
    async fn hash_e_verificacao_de_senha() {
        let service = service();
        let senha_hash = service.hash_senha("senha123").await.unwrap();

        assert_ne!(senha_hash, "senha123");
        assert!(service.verificar_senha("senha123", &senha_hash).await.unwrap());
        assert!(!service.verificar_senha("senha errada", &senha_hash).await.unwrap());
    }
}
