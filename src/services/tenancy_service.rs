// src/services/tenancy_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::TenancyRepository,
    models::tenancy::{Cliente, Restaurante, ToggleStatusResponse},
};

#[derive(Clone)]
pub struct TenancyService {
    tenancy_repo: TenancyRepository,
    pool: PgPool,
}

pub struct NovoCliente<'a> {
    pub nome_empresa: &'a str,
    pub email: Option<&'a str>,
    pub telefone: Option<&'a str>,
    pub cnpj: Option<&'a str>,
    pub endereco: Option<&'a str>,
    pub cidade: Option<&'a str>,
    pub estado: Option<&'a str>,
}

pub struct NovoRestaurante<'a> {
    pub cliente_id: Uuid,
    pub nome: &'a str,
    pub slug: &'a str,
    pub email: Option<&'a str>,
    pub telefone: Option<&'a str>,
    pub cnpj: Option<&'a str>,
    pub endereco: Option<&'a str>,
}

// Normaliza o slug para URL: minúsculas, sem espaços nas pontas.
pub fn normalizar_slug(slug: &str) -> String {
    slug.trim().to_lowercase()
}

impl TenancyService {
    pub fn new(tenancy_repo: TenancyRepository, pool: PgPool) -> Self {
        Self { tenancy_repo, pool }
    }

    // ---
    // Clientes
    // ---

    pub async fn listar_clientes(&self) -> Result<Vec<Cliente>, AppError> {
        self.tenancy_repo.listar_clientes(&self.pool).await
    }

    pub async fn buscar_cliente(&self, id: Uuid) -> Result<Cliente, AppError> {
        self.tenancy_repo
            .buscar_cliente(&self.pool, id)
            .await?
            .ok_or(AppError::NaoEncontrado("Cliente"))
    }

    pub async fn criar_cliente(&self, dados: NovoCliente<'_>) -> Result<Cliente, AppError> {
        self.tenancy_repo
            .criar_cliente(
                &self.pool,
                dados.nome_empresa,
                dados.email,
                dados.telefone,
                dados.cnpj,
                dados.endereco,
                dados.cidade,
                dados.estado,
            )
            .await
    }

    pub async fn atualizar_cliente(
        &self,
        id: Uuid,
        dados: NovoCliente<'_>,
    ) -> Result<Cliente, AppError> {
        self.tenancy_repo
            .atualizar_cliente(
                &self.pool,
                id,
                Some(dados.nome_empresa),
                dados.email,
                dados.telefone,
                dados.cnpj,
                dados.endereco,
                dados.cidade,
                dados.estado,
            )
            .await
    }

    pub async fn deletar_cliente(&self, id: Uuid) -> Result<(), AppError> {
        self.tenancy_repo.deletar_cliente(&self.pool, id).await
    }

    pub async fn alternar_status_cliente(
        &self,
        id: Uuid,
    ) -> Result<ToggleStatusResponse, AppError> {
        let cliente = self
            .tenancy_repo
            .alternar_status_cliente(&self.pool, id)
            .await?;
        let message = if cliente.ativo {
            "Empresa desbloqueada".to_string()
        } else {
            "Empresa bloqueada".to_string()
        };
        Ok(ToggleStatusResponse {
            id: cliente.id,
            nome: cliente.nome_empresa,
            ativo: cliente.ativo,
            message,
        })
    }

    pub async fn listar_restaurantes_do_cliente(
        &self,
        cliente_id: Uuid,
    ) -> Result<Vec<Restaurante>, AppError> {
        // 404 explícito se a empresa não existir
        self.buscar_cliente(cliente_id).await?;
        self.tenancy_repo
            .listar_restaurantes(&self.pool, Some(cliente_id))
            .await
    }

    // ---
    // Restaurantes
    // ---

    pub async fn listar_restaurantes(
        &self,
        cliente_id: Option<Uuid>,
    ) -> Result<Vec<Restaurante>, AppError> {
        self.tenancy_repo
            .listar_restaurantes(&self.pool, cliente_id)
            .await
    }

    pub async fn buscar_restaurante(&self, id: Uuid) -> Result<Restaurante, AppError> {
        self.tenancy_repo
            .buscar_restaurante(&self.pool, id)
            .await?
            .ok_or(AppError::NaoEncontrado("Restaurante"))
    }

    pub async fn criar_restaurante(
        &self,
        dados: NovoRestaurante<'_>,
    ) -> Result<Restaurante, AppError> {
        // A empresa dona precisa existir
        self.buscar_cliente(dados.cliente_id).await?;

        let slug = normalizar_slug(dados.slug);
        self.tenancy_repo
            .criar_restaurante(
                &self.pool,
                dados.cliente_id,
                dados.nome,
                &slug,
                dados.email,
                dados.telefone,
                dados.cnpj,
                dados.endereco,
            )
            .await
    }

    pub async fn atualizar_restaurante(
        &self,
        id: Uuid,
        nome: Option<&str>,
        slug: Option<&str>,
        email: Option<&str>,
        telefone: Option<&str>,
        cnpj: Option<&str>,
        endereco: Option<&str>,
    ) -> Result<Restaurante, AppError> {
        let slug = slug.map(normalizar_slug);
        self.tenancy_repo
            .atualizar_restaurante(
                &self.pool,
                id,
                nome,
                slug.as_deref(),
                email,
                telefone,
                cnpj,
                endereco,
            )
            .await
    }

    pub async fn deletar_restaurante(&self, id: Uuid) -> Result<(), AppError> {
        self.tenancy_repo.deletar_restaurante(&self.pool, id).await
    }

    pub async fn alternar_status_restaurante(
        &self,
        id: Uuid,
    ) -> Result<ToggleStatusResponse, AppError> {
        let restaurante = self
            .tenancy_repo
            .alternar_status_restaurante(&self.pool, id)
            .await?;
        let message = if restaurante.ativo {
            "Restaurante desbloqueado".to_string()
        } else {
            "Restaurante bloqueado".to_string()
        };
        Ok(ToggleStatusResponse {
            id: restaurante.id,
            nome: restaurante.nome,
            ativo: restaurante.ativo,
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::normalizar_slug;

    #[test]
    fn slug_vira_minusculo_sem_espacos() {
        assert_eq!(normalizar_slug("  Cantina-Da-Nona "), "cantina-da-nona");
        assert_eq!(normalizar_slug("bistro01"), "bistro01");
    }
}
