// src/services/auth.rs

use bcrypt::verify;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{TenancyRepository, UserRepository},
    models::auth::{Claims, LoginResponse, MeResponse, Papel, PerfilUsuario, Usuario},
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    tenancy_repo: TenancyRepository,
    jwt_secret: String,
    pool: PgPool,
}

// Decisão pura de acesso a um tenant. Mantida fora do `impl` para ser
// testável sem banco: recebe tudo o que a regra precisa e nada mais.
//
// Ordem dos vetos: vínculo → empresa bloqueada → restaurante bloqueado.
// Admin da plataforma ignora vínculo e papel, mas não o bloqueio.
pub fn decidir_acesso(
    is_admin: bool,
    papel: Option<Papel>,
    papel_minimo: Papel,
    restaurante_ativo: bool,
    cliente_ativo: bool,
) -> Result<(), AppError> {
    if !is_admin {
        let papel = papel.ok_or(AppError::AcessoNegado)?;
        if papel_minimo == Papel::Admin && papel != Papel::Admin {
            return Err(AppError::AcessoNegado);
        }
    }
    if !cliente_ativo {
        return Err(AppError::EmpresaBloqueada);
    }
    if !restaurante_ativo {
        return Err(AppError::RestauranteBloqueado);
    }
    Ok(())
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        tenancy_repo: TenancyRepository,
        jwt_secret: String,
        pool: PgPool,
    ) -> Self {
        Self {
            user_repo,
            tenancy_repo,
            jwt_secret,
            pool,
        }
    }

    pub async fn login(&self, email: &str, senha: &str) -> Result<LoginResponse, AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::CredenciaisInvalidas)?;

        let senha_clone = senha.to_owned();
        let senha_hash_clone = user.senha_hash.clone();

        // bcrypt é caro: roda em uma thread de bloqueio
        let senha_valida = tokio::task::spawn_blocking(move || {
            verify(&senha_clone, &senha_hash_clone)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !senha_valida {
            return Err(AppError::CredenciaisInvalidas);
        }

        if !user.ativo {
            return Err(AppError::UsuarioInativo);
        }

        let token = self.create_token(user.id)?;

        let restaurantes = self
            .user_repo
            .listar_restaurantes_do_usuario(&self.pool, user.id)
            .await?;

        Ok(LoginResponse {
            access_token: token,
            token_type: "bearer".to_string(),
            user: PerfilUsuario {
                id: user.id,
                nome: user.nome,
                email: user.email,
                is_admin: user.is_admin,
                cliente_id: user.cliente_id,
                restaurantes,
            },
        })
    }

    pub async fn validate_token(&self, token: &str) -> Result<Usuario, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::TokenInvalido)?;

        let user = self
            .user_repo
            .find_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::TokenInvalido)?;

        if !user.ativo {
            return Err(AppError::UsuarioInativo);
        }
        Ok(user)
    }

    pub async fn perfil(&self, user: &Usuario) -> Result<MeResponse, AppError> {
        let restaurantes = self.user_repo.listar_vinculos(&self.pool, user.id).await?;
        Ok(MeResponse {
            id: user.id,
            nome: user.nome.clone(),
            email: user.email.clone(),
            is_admin: user.is_admin,
            cliente_id: user.cliente_id,
            restaurantes,
        })
    }

    // Rotas /api/admin/* exigem admin da plataforma.
    pub fn garantir_admin(&self, user: &Usuario) -> Result<(), AppError> {
        if user.is_admin {
            Ok(())
        } else {
            Err(AppError::AcessoNegado)
        }
    }

    // Rotas /api/tenant/{id}/* exigem vínculo com o restaurante, papel
    // suficiente e empresa/restaurante ativos.
    pub async fn garantir_acesso_restaurante(
        &self,
        user: &Usuario,
        restaurante_id: Uuid,
        papel_minimo: Papel,
    ) -> Result<(), AppError> {
        let status = self
            .tenancy_repo
            .status_acesso(&self.pool, restaurante_id)
            .await?
            .ok_or(AppError::NaoEncontrado("Restaurante"))?;

        let papel = self
            .user_repo
            .papel_no_restaurante(&self.pool, user.id, restaurante_id)
            .await?;

        decidir_acesso(
            user.is_admin,
            papel,
            papel_minimo,
            status.restaurante_ativo,
            status.cliente_ativo,
        )
    }

    fn create_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        let claims = Claims {
            sub: user_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leitura_acessa_restaurante_ativo() {
        assert!(decidir_acesso(false, Some(Papel::Leitura), Papel::Leitura, true, true).is_ok());
    }

    #[test]
    fn leitura_nao_gerencia_restaurante() {
        let err = decidir_acesso(false, Some(Papel::Leitura), Papel::Admin, true, true);
        assert!(matches!(err, Err(AppError::AcessoNegado)));
    }

    #[test]
    fn sem_vinculo_nao_acessa() {
        let err = decidir_acesso(false, None, Papel::Leitura, true, true);
        assert!(matches!(err, Err(AppError::AcessoNegado)));
    }

    #[test]
    fn empresa_bloqueada_derruba_todos_os_usuarios() {
        // Bloquear a empresa nega acesso mesmo a quem é admin do restaurante;
        // reativar restaura o acesso.
        let err = decidir_acesso(false, Some(Papel::Admin), Papel::Leitura, true, false);
        assert!(matches!(err, Err(AppError::EmpresaBloqueada)));

        assert!(decidir_acesso(false, Some(Papel::Admin), Papel::Leitura, true, true).is_ok());
    }

    #[test]
    fn restaurante_bloqueado_independe_da_empresa() {
        let err = decidir_acesso(false, Some(Papel::Admin), Papel::Leitura, false, true);
        assert!(matches!(err, Err(AppError::RestauranteBloqueado)));
    }

    #[test]
    fn admin_da_plataforma_dispensa_vinculo() {
        assert!(decidir_acesso(true, None, Papel::Admin, true, true).is_ok());
    }

    #[test]
    fn admin_da_plataforma_nao_passa_por_bloqueio() {
        let err = decidir_acesso(true, None, Papel::Leitura, true, false);
        assert!(matches!(err, Err(AppError::EmpresaBloqueada)));
    }
}
