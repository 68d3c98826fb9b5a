// src/db/inventory_repo.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, FromRow, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::inventory::{Alimento, Lote, Movimentacao, MovimentacaoDetalhada, TipoMovimentacao},
};

// Lote junto do nome/unidade do alimento, para os alertas de validade.
#[derive(Debug, Clone, FromRow)]
pub struct LoteComAlimento {
    #[sqlx(flatten)]
    pub lote: Lote,
    pub alimento_nome: String,
    pub alimento_unidade: Option<String>,
    pub alimento_categoria: Option<String>,
}

#[derive(Clone)]
pub struct InventoryRepository {
    pool: PgPool,
}

impl InventoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Alimentos
    // ---

    // Filtros de categoria e busca são server-side: o cliente é só renderização.
    pub async fn listar_alimentos<'e, E>(
        &self,
        executor: E,
        restaurante_id: Uuid,
        categoria: Option<&str>,
        busca: Option<&str>,
    ) -> Result<Vec<Alimento>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let alimentos = sqlx::query_as::<_, Alimento>(
            r#"
            SELECT * FROM alimentos
            WHERE restaurante_id = $1
              AND ($2::text IS NULL OR categoria = $2)
              AND ($3::text IS NULL OR nome ILIKE '%' || $3 || '%')
            ORDER BY nome ASC
            "#,
        )
        .bind(restaurante_id)
        .bind(categoria)
        .bind(busca)
        .fetch_all(executor)
        .await?;
        Ok(alimentos)
    }

    pub async fn buscar_alimento<'e, E>(
        &self,
        executor: E,
        restaurante_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Alimento>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let alimento = sqlx::query_as::<_, Alimento>(
            "SELECT * FROM alimentos WHERE id = $1 AND restaurante_id = $2",
        )
        .bind(id)
        .bind(restaurante_id)
        .fetch_optional(executor)
        .await?;
        Ok(alimento)
    }

    // Trava a linha do alimento dentro da transação corrente.
    // Movimentações concorrentes sobre o mesmo item serializam aqui.
    pub async fn buscar_alimento_para_atualizacao<'e, E>(
        &self,
        executor: E,
        restaurante_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Alimento>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let alimento = sqlx::query_as::<_, Alimento>(
            "SELECT * FROM alimentos WHERE id = $1 AND restaurante_id = $2 FOR UPDATE",
        )
        .bind(id)
        .bind(restaurante_id)
        .fetch_optional(executor)
        .await?;
        Ok(alimento)
    }

    // Todo alimento nasce com estoque zero; entradas vêm depois.
    pub async fn criar_alimento<'e, E>(
        &self,
        executor: E,
        restaurante_id: Uuid,
        nome: &str,
        categoria: Option<&str>,
        unidade_medida: Option<&str>,
        quantidade_minima: Decimal,
        tipo_embalagem: Option<&str>,
        unidades_por_embalagem: Option<Decimal>,
    ) -> Result<Alimento, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let alimento = sqlx::query_as::<_, Alimento>(
            r#"
            INSERT INTO alimentos
                (restaurante_id, nome, categoria, unidade_medida, quantidade_minima,
                 tipo_embalagem, unidades_por_embalagem)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(restaurante_id)
        .bind(nome)
        .bind(categoria)
        .bind(unidade_medida)
        .bind(quantidade_minima)
        .bind(tipo_embalagem)
        .bind(unidades_por_embalagem)
        .fetch_one(executor)
        .await?;
        Ok(alimento)
    }

    pub async fn atualizar_alimento<'e, E>(
        &self,
        executor: E,
        restaurante_id: Uuid,
        id: Uuid,
        nome: Option<&str>,
        categoria: Option<&str>,
        unidade_medida: Option<&str>,
        quantidade_minima: Option<Decimal>,
        tipo_embalagem: Option<&str>,
        unidades_por_embalagem: Option<Decimal>,
    ) -> Result<Alimento, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let alimento = sqlx::query_as::<_, Alimento>(
            r#"
            UPDATE alimentos SET
                nome = COALESCE($3, nome),
                categoria = COALESCE($4, categoria),
                unidade_medida = COALESCE($5, unidade_medida),
                quantidade_minima = COALESCE($6, quantidade_minima),
                tipo_embalagem = COALESCE($7, tipo_embalagem),
                unidades_por_embalagem = COALESCE($8, unidades_por_embalagem),
                updated_at = now()
            WHERE id = $1 AND restaurante_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(restaurante_id)
        .bind(nome)
        .bind(categoria)
        .bind(unidade_medida)
        .bind(quantidade_minima)
        .bind(tipo_embalagem)
        .bind(unidades_por_embalagem)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NaoEncontrado("Alimento"))?;
        Ok(alimento)
    }

    // O banco cascateia movimentações e lotes do item.
    pub async fn deletar_alimento<'e, E>(
        &self,
        executor: E,
        restaurante_id: Uuid,
        id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM alimentos WHERE id = $1 AND restaurante_id = $2")
            .bind(id)
            .bind(restaurante_id)
            .execute(executor)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NaoEncontrado("Alimento"));
        }
        Ok(())
    }

    pub async fn atualizar_estoque<'e, E>(
        &self,
        executor: E,
        alimento_id: Uuid,
        quantidade_nova: Decimal,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            "UPDATE alimentos SET quantidade_estoque = $2, updated_at = now() WHERE id = $1",
        )
        .bind(alimento_id)
        .bind(quantidade_nova)
        .execute(executor)
        .await?;
        Ok(())
    }

    // ---
    // Movimentações (append-only: nunca há UPDATE/DELETE aqui)
    // ---

    pub async fn inserir_movimentacao<'e, E>(
        &self,
        executor: E,
        restaurante_id: Uuid,
        alimento_id: Uuid,
        usuario_id: Uuid,
        tipo: TipoMovimentacao,
        quantidade: Decimal,
        quantidade_anterior: Decimal,
        quantidade_nova: Decimal,
        observacao: Option<&str>,
        qr_code_usado: Option<&str>,
        data_producao: Option<NaiveDate>,
        data_validade: Option<NaiveDate>,
    ) -> Result<Movimentacao, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let movimentacao = sqlx::query_as::<_, Movimentacao>(
            r#"
            INSERT INTO movimentacoes
                (restaurante_id, alimento_id, usuario_id, tipo, quantidade,
                 quantidade_anterior, quantidade_nova, observacao, qr_code_usado,
                 data_producao, data_validade)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(restaurante_id)
        .bind(alimento_id)
        .bind(usuario_id)
        .bind(tipo)
        .bind(quantidade)
        .bind(quantidade_anterior)
        .bind(quantidade_nova)
        .bind(observacao)
        .bind(qr_code_usado)
        .bind(data_producao)
        .bind(data_validade)
        .fetch_one(executor)
        .await?;
        Ok(movimentacao)
    }

    pub async fn buscar_movimentacao<'e, E>(
        &self,
        executor: E,
        restaurante_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Movimentacao>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let movimentacao = sqlx::query_as::<_, Movimentacao>(
            "SELECT * FROM movimentacoes WHERE id = $1 AND restaurante_id = $2",
        )
        .bind(id)
        .bind(restaurante_id)
        .fetch_optional(executor)
        .await?;
        Ok(movimentacao)
    }

    pub async fn listar_movimentacoes<'e, E>(
        &self,
        executor: E,
        restaurante_id: Uuid,
        tipo: Option<TipoMovimentacao>,
        data_inicio: Option<DateTime<Utc>>,
        data_fim: Option<DateTime<Utc>>,
    ) -> Result<Vec<MovimentacaoDetalhada>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let movimentacoes = sqlx::query_as::<_, MovimentacaoDetalhada>(
            r#"
            SELECT
                m.id,
                m.alimento_id,
                a.nome AS alimento_nome,
                m.tipo,
                m.quantidade,
                m.quantidade_anterior,
                m.quantidade_nova,
                u.nome AS usuario_nome,
                m.observacao,
                a.unidade_medida,
                m.created_at AS data_hora,
                l.qr_code AS qr_code_gerado,
                m.data_producao,
                m.data_validade,
                CASE WHEN l.id IS NULL THEN NULL
                     ELSE l.quantidade_usada >= l.quantidade
                END AS usado
            FROM movimentacoes m
            JOIN alimentos a ON a.id = m.alimento_id
            JOIN usuarios u ON u.id = m.usuario_id
            LEFT JOIN lotes l ON l.movimentacao_id = m.id
            WHERE m.restaurante_id = $1
              AND ($2::tipo_movimentacao IS NULL OR m.tipo = $2)
              AND ($3::timestamptz IS NULL OR m.created_at >= $3)
              AND ($4::timestamptz IS NULL OR m.created_at <= $4)
            ORDER BY m.created_at DESC
            "#,
        )
        .bind(restaurante_id)
        .bind(tipo)
        .bind(data_inicio)
        .bind(data_fim)
        .fetch_all(executor)
        .await?;
        Ok(movimentacoes)
    }

    // ---
    // Lotes (QR batches)
    // ---

    pub async fn inserir_lote<'e, E>(
        &self,
        executor: E,
        restaurante_id: Uuid,
        alimento_id: Uuid,
        movimentacao_id: Uuid,
        lote_numero: &str,
        qr_code: &str,
        quantidade: Decimal,
        data_producao: NaiveDate,
        data_validade: NaiveDate,
    ) -> Result<Lote, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lote = sqlx::query_as::<_, Lote>(
            r#"
            INSERT INTO lotes
                (restaurante_id, alimento_id, movimentacao_id, lote_numero, qr_code,
                 quantidade, data_producao, data_validade)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(restaurante_id)
        .bind(alimento_id)
        .bind(movimentacao_id)
        .bind(lote_numero)
        .bind(qr_code)
        .bind(quantidade)
        .bind(data_producao)
        .bind(data_validade)
        .fetch_one(executor)
        .await?;
        Ok(lote)
    }

    pub async fn buscar_lote_por_codigo<'e, E>(
        &self,
        executor: E,
        restaurante_id: Uuid,
        qr_code: &str,
    ) -> Result<Option<Lote>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lote = sqlx::query_as::<_, Lote>(
            "SELECT * FROM lotes WHERE qr_code = $1 AND restaurante_id = $2",
        )
        .bind(qr_code)
        .bind(restaurante_id)
        .fetch_optional(executor)
        .await?;
        Ok(lote)
    }

    // FOR UPDATE: dois scans simultâneos do mesmo código serializam nesta
    // linha, garantindo que quantidade_usada nunca ultrapasse a original.
    pub async fn buscar_lote_por_codigo_para_atualizacao<'e, E>(
        &self,
        executor: E,
        restaurante_id: Uuid,
        qr_code: &str,
    ) -> Result<Option<Lote>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lote = sqlx::query_as::<_, Lote>(
            "SELECT * FROM lotes WHERE qr_code = $1 AND restaurante_id = $2 FOR UPDATE",
        )
        .bind(qr_code)
        .bind(restaurante_id)
        .fetch_optional(executor)
        .await?;
        Ok(lote)
    }

    pub async fn buscar_lote_da_movimentacao<'e, E>(
        &self,
        executor: E,
        restaurante_id: Uuid,
        movimentacao_id: Uuid,
    ) -> Result<Option<Lote>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lote = sqlx::query_as::<_, Lote>(
            "SELECT * FROM lotes WHERE movimentacao_id = $1 AND restaurante_id = $2",
        )
        .bind(movimentacao_id)
        .bind(restaurante_id)
        .fetch_optional(executor)
        .await?;
        Ok(lote)
    }

    pub async fn registrar_consumo_lote<'e, E>(
        &self,
        executor: E,
        lote_id: Uuid,
        quantidade_usada: Decimal,
    ) -> Result<Lote, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lote = sqlx::query_as::<_, Lote>(
            "UPDATE lotes SET quantidade_usada = $2 WHERE id = $1 RETURNING *",
        )
        .bind(lote_id)
        .bind(quantidade_usada)
        .fetch_one(executor)
        .await?;
        Ok(lote)
    }

    // Lotes não esgotados vencendo dentro da janela [hoje, limite].
    pub async fn listar_lotes_vencendo<'e, E>(
        &self,
        executor: E,
        restaurante_id: Uuid,
        hoje: NaiveDate,
        limite: NaiveDate,
    ) -> Result<Vec<LoteComAlimento>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lotes = sqlx::query_as::<_, LoteComAlimento>(
            r#"
            SELECT l.*, a.nome AS alimento_nome, a.unidade_medida AS alimento_unidade,
                   a.categoria AS alimento_categoria
            FROM lotes l
            JOIN alimentos a ON a.id = l.alimento_id
            WHERE l.restaurante_id = $1
              AND l.quantidade_usada < l.quantidade
              AND l.data_validade >= $2
              AND l.data_validade <= $3
            ORDER BY l.data_validade ASC
            "#,
        )
        .bind(restaurante_id)
        .bind(hoje)
        .bind(limite)
        .fetch_all(executor)
        .await?;
        Ok(lotes)
    }

    // Lotes não esgotados já vencidos.
    pub async fn listar_lotes_vencidos<'e, E>(
        &self,
        executor: E,
        restaurante_id: Uuid,
        hoje: NaiveDate,
    ) -> Result<Vec<LoteComAlimento>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lotes = sqlx::query_as::<_, LoteComAlimento>(
            r#"
            SELECT l.*, a.nome AS alimento_nome, a.unidade_medida AS alimento_unidade,
                   a.categoria AS alimento_categoria
            FROM lotes l
            JOIN alimentos a ON a.id = l.alimento_id
            WHERE l.restaurante_id = $1
              AND l.quantidade_usada < l.quantidade
              AND l.data_validade < $2
            ORDER BY l.data_validade ASC
            "#,
        )
        .bind(restaurante_id)
        .bind(hoje)
        .fetch_all(executor)
        .await?;
        Ok(lotes)
    }
}
