// src/db/tenancy_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::tenancy::{Cliente, Restaurante, StatusAcesso},
};

// Repositório do diretório: empresas (clientes) e restaurantes (tenants).
#[derive(Clone)]
pub struct TenancyRepository {
    pool: PgPool,
}

impl TenancyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Clientes (empresas)
    // ---

    pub async fn listar_clientes<'e, E>(&self, executor: E) -> Result<Vec<Cliente>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // Bloqueados por último, como o painel espera.
        let clientes = sqlx::query_as::<_, Cliente>(
            "SELECT * FROM clientes ORDER BY ativo DESC, nome_empresa ASC",
        )
        .fetch_all(executor)
        .await?;
        Ok(clientes)
    }

    pub async fn buscar_cliente<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Cliente>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let cliente = sqlx::query_as::<_, Cliente>("SELECT * FROM clientes WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(cliente)
    }

    pub async fn criar_cliente<'e, E>(
        &self,
        executor: E,
        nome_empresa: &str,
        email: Option<&str>,
        telefone: Option<&str>,
        cnpj: Option<&str>,
        endereco: Option<&str>,
        cidade: Option<&str>,
        estado: Option<&str>,
    ) -> Result<Cliente, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Cliente>(
            r#"
            INSERT INTO clientes (nome_empresa, email, telefone, cnpj, endereco, cidade, estado)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(nome_empresa)
        .bind(email)
        .bind(telefone)
        .bind(cnpj)
        .bind(endereco)
        .bind(cidade)
        .bind(estado)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::EmailJaCadastrado;
                }
            }
            e.into()
        })
    }

    pub async fn atualizar_cliente<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        nome_empresa: Option<&str>,
        email: Option<&str>,
        telefone: Option<&str>,
        cnpj: Option<&str>,
        endereco: Option<&str>,
        cidade: Option<&str>,
        estado: Option<&str>,
    ) -> Result<Cliente, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let cliente = sqlx::query_as::<_, Cliente>(
            r#"
            UPDATE clientes SET
                nome_empresa = COALESCE($2, nome_empresa),
                email = COALESCE($3, email),
                telefone = COALESCE($4, telefone),
                cnpj = COALESCE($5, cnpj),
                endereco = COALESCE($6, endereco),
                cidade = COALESCE($7, cidade),
                estado = COALESCE($8, estado),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(nome_empresa)
        .bind(email)
        .bind(telefone)
        .bind(cnpj)
        .bind(endereco)
        .bind(cidade)
        .bind(estado)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NaoEncontrado("Cliente"))?;
        Ok(cliente)
    }

    // O banco cuida da cascata (restaurantes, usuários, estoque).
    pub async fn deletar_cliente<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM clientes WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NaoEncontrado("Cliente"));
        }
        Ok(())
    }

    pub async fn alternar_status_cliente<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Cliente, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let cliente = sqlx::query_as::<_, Cliente>(
            r#"
            UPDATE clientes SET ativo = NOT ativo, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NaoEncontrado("Cliente"))?;
        Ok(cliente)
    }

    // ---
    // Restaurantes (tenants)
    // ---

    pub async fn listar_restaurantes<'e, E>(
        &self,
        executor: E,
        cliente_id: Option<Uuid>,
    ) -> Result<Vec<Restaurante>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let restaurantes = sqlx::query_as::<_, Restaurante>(
            r#"
            SELECT * FROM restaurantes
            WHERE ($1::uuid IS NULL OR cliente_id = $1)
            ORDER BY nome ASC
            "#,
        )
        .bind(cliente_id)
        .fetch_all(executor)
        .await?;
        Ok(restaurantes)
    }

    pub async fn buscar_restaurante<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Restaurante>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let restaurante =
            sqlx::query_as::<_, Restaurante>("SELECT * FROM restaurantes WHERE id = $1")
                .bind(id)
                .fetch_optional(executor)
                .await?;
        Ok(restaurante)
    }

    pub async fn criar_restaurante<'e, E>(
        &self,
        executor: E,
        cliente_id: Uuid,
        nome: &str,
        slug: &str,
        email: Option<&str>,
        telefone: Option<&str>,
        cnpj: Option<&str>,
        endereco: Option<&str>,
    ) -> Result<Restaurante, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Restaurante>(
            r#"
            INSERT INTO restaurantes (cliente_id, nome, slug, email, telefone, cnpj, endereco)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(cliente_id)
        .bind(nome)
        .bind(slug)
        .bind(email)
        .bind(telefone)
        .bind(cnpj)
        .bind(endereco)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::SlugJaCadastrado;
                }
            }
            e.into()
        })
    }

    // cliente_id é imutável: um restaurante não troca de empresa.
    pub async fn atualizar_restaurante<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        nome: Option<&str>,
        slug: Option<&str>,
        email: Option<&str>,
        telefone: Option<&str>,
        cnpj: Option<&str>,
        endereco: Option<&str>,
    ) -> Result<Restaurante, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Restaurante>(
            r#"
            UPDATE restaurantes SET
                nome = COALESCE($2, nome),
                slug = COALESCE($3, slug),
                email = COALESCE($4, email),
                telefone = COALESCE($5, telefone),
                cnpj = COALESCE($6, cnpj),
                endereco = COALESCE($7, endereco),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(nome)
        .bind(slug)
        .bind(email)
        .bind(telefone)
        .bind(cnpj)
        .bind(endereco)
        .fetch_optional(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::SlugJaCadastrado;
                }
            }
            AppError::from(e)
        })?
        .ok_or(AppError::NaoEncontrado("Restaurante"))
    }

    pub async fn deletar_restaurante<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM restaurantes WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NaoEncontrado("Restaurante"));
        }
        Ok(())
    }

    pub async fn alternar_status_restaurante<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Restaurante, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let restaurante = sqlx::query_as::<_, Restaurante>(
            r#"
            UPDATE restaurantes SET ativo = NOT ativo, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NaoEncontrado("Restaurante"))?;
        Ok(restaurante)
    }

    // Par (restaurante ativo, empresa ativa) para a decisão de acesso.
    pub async fn status_acesso<'e, E>(
        &self,
        executor: E,
        restaurante_id: Uuid,
    ) -> Result<Option<StatusAcesso>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let status = sqlx::query_as::<_, StatusAcesso>(
            r#"
            SELECT r.ativo AS restaurante_ativo, c.ativo AS cliente_ativo
            FROM restaurantes r
            JOIN clientes c ON c.id = r.cliente_id
            WHERE r.id = $1
            "#,
        )
        .bind(restaurante_id)
        .fetch_optional(executor)
        .await?;
        Ok(status)
    }

    // Restaurante pertence ao cliente? Usado ao conceder vínculos.
    pub async fn restaurante_do_cliente<'e, E>(
        &self,
        executor: E,
        restaurante_id: Uuid,
        cliente_id: Uuid,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let existe = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM restaurantes WHERE id = $1 AND cliente_id = $2)",
        )
        .bind(restaurante_id)
        .bind(cliente_id)
        .fetch_one(executor)
        .await?;
        Ok(existe)
    }
}
