// src/services/usuario_service.rs

use bcrypt::hash;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{TenancyRepository, UserRepository},
    models::auth::{Papel, Usuario, VinculoRestaurante},
};

// Usuário na visão de um restaurante: papel achatado em um booleano,
// como o painel da cozinha espera.
#[derive(Debug, Serialize, ToSchema)]
pub struct UsuarioTenantResponse {
    pub id: Uuid,
    pub nome: String,
    pub email: String,
    pub ativo: bool,
    pub is_admin_restaurante: bool,
}

// Vínculo no formato que o painel admin envia e lê.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GrantRestaurante {
    pub tenant_id: Uuid,
    #[serde(default)]
    pub is_admin_restaurante: bool,
}

// Usuário com a lista de restaurantes e papéis, para o painel admin.
#[derive(Debug, Serialize, ToSchema)]
pub struct UsuarioComVinculos {
    #[serde(flatten)]
    pub usuario: Usuario,
    pub restaurantes: Vec<VinculoRestaurante>,
}

pub struct NovoUsuario<'a> {
    pub cliente_id: Option<Uuid>,
    pub nome: &'a str,
    pub email: &'a str,
    pub senha: &'a str,
    pub is_admin: bool,
    pub restaurantes: Option<Vec<GrantRestaurante>>,
}

pub struct AtualizacaoUsuario<'a> {
    pub nome: Option<&'a str>,
    pub email: Option<&'a str>,
    pub senha: Option<&'a str>,
    pub is_admin: Option<bool>,
    pub ativo: Option<bool>,
    // None = mantém os vínculos; Some(v) = substitui o conjunto inteiro
    pub restaurantes: Option<Vec<GrantRestaurante>>,
}

#[derive(Clone)]
pub struct UsuarioService {
    user_repo: UserRepository,
    tenancy_repo: TenancyRepository,
    pool: PgPool,
}

async fn gerar_hash(senha: &str) -> Result<String, AppError> {
    let senha = senha.to_owned();
    let hashed = tokio::task::spawn_blocking(move || hash(&senha, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
    Ok(hashed)
}

impl UsuarioService {
    pub fn new(user_repo: UserRepository, tenancy_repo: TenancyRepository, pool: PgPool) -> Self {
        Self {
            user_repo,
            tenancy_repo,
            pool,
        }
    }

    pub async fn listar(&self) -> Result<Vec<UsuarioComVinculos>, AppError> {
        let usuarios = self.user_repo.listar(&self.pool).await?;
        let mut completos = Vec::with_capacity(usuarios.len());
        for usuario in usuarios {
            let restaurantes = self
                .user_repo
                .listar_vinculos(&self.pool, usuario.id)
                .await?;
            completos.push(UsuarioComVinculos {
                usuario,
                restaurantes,
            });
        }
        Ok(completos)
    }

    pub async fn buscar(&self, id: Uuid) -> Result<UsuarioComVinculos, AppError> {
        let usuario = self
            .user_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NaoEncontrado("Usuário"))?;
        let restaurantes = self.user_repo.listar_vinculos(&self.pool, id).await?;
        Ok(UsuarioComVinculos {
            usuario,
            restaurantes,
        })
    }

    // GET /api/admin/usuarios/{id}/tenants — o formato que o formulário
    // de edição do painel consome.
    pub async fn listar_grants(&self, id: Uuid) -> Result<Vec<GrantRestaurante>, AppError> {
        let vinculos = self.user_repo.listar_vinculos(&self.pool, id).await?;
        Ok(vinculos
            .into_iter()
            .map(|v| GrantRestaurante {
                tenant_id: v.tenant_id,
                is_admin_restaurante: v.papel == Papel::Admin,
            })
            .collect())
    }

    pub async fn criar(&self, dados: NovoUsuario<'_>) -> Result<Usuario, AppError> {
        // cliente_id é obrigatório para quem não é admin da plataforma.
        // Um usuário sem nenhum vínculo é aceito: fica sem acesso a tenant
        // até um admin conceder.
        if !dados.is_admin && dados.cliente_id.is_none() {
            return Err(AppError::RegraDeNegocio(
                "cliente_id é obrigatório para usuários não-admin".to_string(),
            ));
        }

        if let Some(cliente_id) = dados.cliente_id {
            self.tenancy_repo
                .buscar_cliente(&self.pool, cliente_id)
                .await?
                .ok_or(AppError::NaoEncontrado("Cliente"))?;
        }

        let senha_hash = gerar_hash(dados.senha).await?;

        let mut tx = self.pool.begin().await?;

        let usuario = self
            .user_repo
            .criar(
                &mut *tx,
                dados.cliente_id,
                dados.nome,
                dados.email,
                &senha_hash,
                dados.is_admin,
            )
            .await?;

        if let Some(grants) = dados.restaurantes {
            self.aplicar_grants(&mut tx, usuario.id, usuario.cliente_id, grants)
                .await?;
        }

        tx.commit().await?;
        Ok(usuario)
    }

    pub async fn atualizar(
        &self,
        id: Uuid,
        dados: AtualizacaoUsuario<'_>,
    ) -> Result<Usuario, AppError> {
        // Senha em branco = não rotaciona
        let senha_hash = match dados.senha {
            Some(senha) if !senha.is_empty() => Some(gerar_hash(senha).await?),
            _ => None,
        };

        let mut tx = self.pool.begin().await?;

        let usuario = self
            .user_repo
            .atualizar(
                &mut *tx,
                id,
                dados.nome,
                dados.email,
                senha_hash.as_deref(),
                dados.is_admin,
                dados.ativo,
            )
            .await?;

        if let Some(grants) = dados.restaurantes {
            // O conjunto enviado substitui todos os vínculos anteriores
            self.user_repo.remover_vinculos(&mut *tx, id).await?;
            self.aplicar_grants(&mut tx, id, usuario.cliente_id, grants)
                .await?;
        }

        tx.commit().await?;
        Ok(usuario)
    }

    pub async fn deletar(&self, id: Uuid) -> Result<(), AppError> {
        // A cascata do banco revoga os vínculos
        self.user_repo.deletar(&self.pool, id).await
    }

    // ---
    // Gestão de usuários pelo admin do restaurante
    // ---

    pub async fn listar_do_restaurante(
        &self,
        restaurante_id: Uuid,
    ) -> Result<Vec<UsuarioTenantResponse>, AppError> {
        let usuarios = self
            .user_repo
            .listar_do_restaurante(&self.pool, restaurante_id)
            .await?;
        Ok(usuarios
            .into_iter()
            .map(|u| UsuarioTenantResponse {
                id: u.id,
                nome: u.nome,
                email: u.email,
                ativo: u.ativo,
                is_admin_restaurante: u.papel == Papel::Admin,
            })
            .collect())
    }

    // Cria um usuário já vinculado ao restaurante, sob a mesma empresa.
    pub async fn criar_no_restaurante(
        &self,
        restaurante_id: Uuid,
        nome: &str,
        email: &str,
        senha: &str,
        is_admin_restaurante: bool,
    ) -> Result<UsuarioTenantResponse, AppError> {
        let restaurante = self
            .tenancy_repo
            .buscar_restaurante(&self.pool, restaurante_id)
            .await?
            .ok_or(AppError::NaoEncontrado("Restaurante"))?;

        let senha_hash = gerar_hash(senha).await?;

        let mut tx = self.pool.begin().await?;

        let usuario = self
            .user_repo
            .criar(
                &mut *tx,
                Some(restaurante.cliente_id),
                nome,
                email,
                &senha_hash,
                false,
            )
            .await?;

        let papel = if is_admin_restaurante {
            Papel::Admin
        } else {
            Papel::Leitura
        };
        self.user_repo
            .inserir_vinculo(&mut *tx, usuario.id, restaurante_id, papel)
            .await?;

        tx.commit().await?;

        Ok(UsuarioTenantResponse {
            id: usuario.id,
            nome: usuario.nome,
            email: usuario.email,
            ativo: usuario.ativo,
            is_admin_restaurante,
        })
    }

    pub async fn atualizar_no_restaurante(
        &self,
        restaurante_id: Uuid,
        usuario_id: Uuid,
        nome: Option<&str>,
        email: Option<&str>,
        senha: Option<&str>,
        is_admin_restaurante: Option<bool>,
    ) -> Result<UsuarioTenantResponse, AppError> {
        // O usuário precisa pertencer ao restaurante
        let papel_atual = self
            .user_repo
            .papel_no_restaurante(&self.pool, usuario_id, restaurante_id)
            .await?
            .ok_or(AppError::NaoEncontrado("Usuário"))?;

        let senha_hash = match senha {
            Some(senha) if !senha.is_empty() => Some(gerar_hash(senha).await?),
            _ => None,
        };

        let mut tx = self.pool.begin().await?;

        let usuario = self
            .user_repo
            .atualizar(
                &mut *tx,
                usuario_id,
                nome,
                email,
                senha_hash.as_deref(),
                None,
                None,
            )
            .await?;

        let papel = match is_admin_restaurante {
            Some(true) => Papel::Admin,
            Some(false) => Papel::Leitura,
            None => papel_atual,
        };
        self.user_repo
            .inserir_vinculo(&mut *tx, usuario_id, restaurante_id, papel)
            .await?;

        tx.commit().await?;

        Ok(UsuarioTenantResponse {
            id: usuario.id,
            nome: usuario.nome,
            email: usuario.email,
            ativo: usuario.ativo,
            is_admin_restaurante: papel == Papel::Admin,
        })
    }

    pub async fn deletar_do_restaurante(
        &self,
        restaurante_id: Uuid,
        usuario_id: Uuid,
    ) -> Result<(), AppError> {
        self.user_repo
            .papel_no_restaurante(&self.pool, usuario_id, restaurante_id)
            .await?
            .ok_or(AppError::NaoEncontrado("Usuário"))?;
        self.user_repo.deletar(&self.pool, usuario_id).await
    }

    // Vínculos só são concedidos a restaurantes da mesma empresa do usuário;
    // grants para restaurantes de terceiros são ignorados em silêncio.
    async fn aplicar_grants(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        usuario_id: Uuid,
        cliente_id: Option<Uuid>,
        grants: Vec<GrantRestaurante>,
    ) -> Result<(), AppError> {
        for grant in grants {
            if let Some(cliente_id) = cliente_id {
                let pertence = self
                    .tenancy_repo
                    .restaurante_do_cliente(&mut **tx, grant.tenant_id, cliente_id)
                    .await?;
                if !pertence {
                    continue;
                }
            }

            let papel = if grant.is_admin_restaurante {
                Papel::Admin
            } else {
                Papel::Leitura
            };
            self.user_repo
                .inserir_vinculo(&mut **tx, usuario_id, grant.tenant_id, papel)
                .await?;
        }
        Ok(())
    }
}
