// src/db/user_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::{Papel, RestauranteResumo, Usuario, VinculoRestaurante},
};

// Linha de usuário com o papel que ele tem em um restaurante específico.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UsuarioDoRestaurante {
    pub id: Uuid,
    pub nome: String,
    pub email: String,
    pub ativo: bool,
    pub papel: Papel,
}

// O repositório de usuários: todas as interações com a tabela 'usuarios'
// e com a tabela de vínculos 'usuario_restaurantes'.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca um usuário pelo seu e-mail
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Usuario>, AppError> {
        let user = sqlx::query_as::<_, Usuario>("SELECT * FROM usuarios WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    // Busca um usuário pelo seu ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Usuario>, AppError> {
        let user = sqlx::query_as::<_, Usuario>("SELECT * FROM usuarios WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn listar<'e, E>(&self, executor: E) -> Result<Vec<Usuario>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let usuarios =
            sqlx::query_as::<_, Usuario>("SELECT * FROM usuarios ORDER BY nome ASC")
                .fetch_all(executor)
                .await?;
        Ok(usuarios)
    }

    // Lista os usuários que possuem vínculo com um restaurante específico,
    // já com o papel de cada um.
    pub async fn listar_do_restaurante<'e, E>(
        &self,
        executor: E,
        restaurante_id: Uuid,
    ) -> Result<Vec<UsuarioDoRestaurante>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let usuarios = sqlx::query_as::<_, UsuarioDoRestaurante>(
            r#"
            SELECT u.id, u.nome, u.email, u.ativo, ur.papel
            FROM usuarios u
            JOIN usuario_restaurantes ur ON ur.usuario_id = u.id
            WHERE ur.restaurante_id = $1
            ORDER BY u.nome ASC
            "#,
        )
        .bind(restaurante_id)
        .fetch_all(executor)
        .await?;
        Ok(usuarios)
    }

    pub async fn criar<'e, E>(
        &self,
        executor: E,
        cliente_id: Option<Uuid>,
        nome: &str,
        email: &str,
        senha_hash: &str,
        is_admin: bool,
    ) -> Result<Usuario, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Usuario>(
            r#"
            INSERT INTO usuarios (cliente_id, nome, email, senha_hash, is_admin)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(cliente_id)
        .bind(nome)
        .bind(email)
        .bind(senha_hash)
        .bind(is_admin)
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

    // Atualização parcial: campos nulos mantêm o valor atual (COALESCE).
    pub async fn atualizar<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        nome: Option<&str>,
        email: Option<&str>,
        senha_hash: Option<&str>,
        is_admin: Option<bool>,
        ativo: Option<bool>,
    ) -> Result<Usuario, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let usuario = sqlx::query_as::<_, Usuario>(
            r#"
            UPDATE usuarios SET
                nome = COALESCE($2, nome),
                email = COALESCE($3, email),
                senha_hash = COALESCE($4, senha_hash),
                is_admin = COALESCE($5, is_admin),
                ativo = COALESCE($6, ativo),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(nome)
        .bind(email)
        .bind(senha_hash)
        .bind(is_admin)
        .bind(ativo)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NaoEncontrado("Usuário"))?;
        Ok(usuario)
    }

    pub async fn deletar<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM usuarios WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NaoEncontrado("Usuário"));
        }
        Ok(())
    }

    // ---
    // Vínculos usuário ↔ restaurante
    // ---

    pub async fn listar_vinculos<'e, E>(
        &self,
        executor: E,
        usuario_id: Uuid,
    ) -> Result<Vec<VinculoRestaurante>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let vinculos = sqlx::query_as::<_, VinculoRestaurante>(
            r#"
            SELECT ur.restaurante_id AS tenant_id, r.nome, r.ativo, ur.papel
            FROM usuario_restaurantes ur
            JOIN restaurantes r ON r.id = ur.restaurante_id
            WHERE ur.usuario_id = $1
            ORDER BY r.nome ASC
            "#,
        )
        .bind(usuario_id)
        .fetch_all(executor)
        .await?;
        Ok(vinculos)
    }

    // Restaurantes acessíveis, no formato resumido da resposta de login.
    pub async fn listar_restaurantes_do_usuario<'e, E>(
        &self,
        executor: E,
        usuario_id: Uuid,
    ) -> Result<Vec<RestauranteResumo>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let restaurantes = sqlx::query_as::<_, RestauranteResumo>(
            r#"
            SELECT r.id, r.nome, r.slug
            FROM usuario_restaurantes ur
            JOIN restaurantes r ON r.id = ur.restaurante_id
            WHERE ur.usuario_id = $1
            ORDER BY r.nome ASC
            "#,
        )
        .bind(usuario_id)
        .fetch_all(executor)
        .await?;
        Ok(restaurantes)
    }

    // Papel do usuário em um restaurante (None = sem vínculo).
    pub async fn papel_no_restaurante<'e, E>(
        &self,
        executor: E,
        usuario_id: Uuid,
        restaurante_id: Uuid,
    ) -> Result<Option<Papel>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let papel = sqlx::query_scalar::<_, Papel>(
            r#"
            SELECT papel FROM usuario_restaurantes
            WHERE usuario_id = $1 AND restaurante_id = $2
            "#,
        )
        .bind(usuario_id)
        .bind(restaurante_id)
        .fetch_optional(executor)
        .await?;
        Ok(papel)
    }

    pub async fn remover_vinculos<'e, E>(
        &self,
        executor: E,
        usuario_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM usuario_restaurantes WHERE usuario_id = $1")
            .bind(usuario_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn inserir_vinculo<'e, E>(
        &self,
        executor: E,
        usuario_id: Uuid,
        restaurante_id: Uuid,
        papel: Papel,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO usuario_restaurantes (usuario_id, restaurante_id, papel)
            VALUES ($1, $2, $3)
            ON CONFLICT (usuario_id, restaurante_id) DO UPDATE SET papel = $3
            "#,
        )
        .bind(usuario_id)
        .bind(restaurante_id)
        .bind(papel)
        .execute(executor)
        .await?;
        Ok(())
    }
}
