// src/handlers/movimentacoes.rs

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::{
        auth::Papel,
        inventory::{MovimentacaoCriada, MovimentacaoDetalhada, TipoMovimentacao},
    },
    services::inventory_service::NovaMovimentacao,
};

fn validate_positive(val: &Decimal) -> Result<(), ValidationError> {
    if *val <= Decimal::ZERO {
        let mut err = ValidationError::new("range");
        err.message = Some("A quantidade deve ser maior que zero.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CriarMovimentacaoPayload {
    pub alimento_id: Uuid,

    #[schema(example = "entrada")]
    pub tipo: TipoMovimentacao,

    #[validate(custom(function = "validate_positive"))]
    pub quantidade: Decimal,

    pub observacao: Option<String>,

    // Entrada com as duas datas emite um lote com QR code
    pub data_producao: Option<NaiveDate>,
    pub data_validade: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListarMovimentacoesQuery {
    pub tipo: Option<TipoMovimentacao>,
    // ISO: "2025-01-07" ou "2025-01-07T10:30:00Z"
    pub data_inicio: Option<String>,
    pub data_fim: Option<String>,
}

// Filtros de data aceitam timestamp completo ou só a data.
// Data pura no fim do intervalo fecha no último instante do dia.
fn parse_data_filtro(valor: &str, fim_do_dia: bool) -> Result<DateTime<Utc>, AppError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(valor) {
        return Ok(dt.with_timezone(&Utc));
    }
    let data: NaiveDate = valor.parse().map_err(|_| {
        AppError::RegraDeNegocio(format!("Data inválida no filtro: {}", valor))
    })?;
    let hora = if fim_do_dia {
        NaiveTime::from_hms_opt(23, 59, 59).unwrap()
    } else {
        NaiveTime::from_hms_opt(0, 0, 0).unwrap()
    };
    Ok(DateTime::from_naive_utc_and_offset(data.and_time(hora), Utc))
}

// POST /api/tenant/{tenant_id}/movimentacoes
#[utoipa::path(
    post,
    path = "/api/tenant/{tenant_id}/movimentacoes",
    tag = "Tenant - Movimentações",
    params(("tenant_id" = Uuid, Path, description = "ID do restaurante")),
    request_body = CriarMovimentacaoPayload,
    responses(
        (status = 201, description = "Movimentação registrada; entradas com datas trazem qr_code_gerado", body = MovimentacaoCriada),
        (status = 400, description = "Estoque insuficiente ou dados inválidos"),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn criar_movimentacao(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(tenant_id): Path<Uuid>,
    Json(payload): Json<CriarMovimentacaoPayload>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .auth_service
        .garantir_acesso_restaurante(&user, tenant_id, Papel::Admin)
        .await?;
    payload.validate().map_err(AppError::ValidationError)?;

    let criada = app_state
        .inventory_service
        .registrar_movimentacao(
            tenant_id,
            user.id,
            NovaMovimentacao {
                alimento_id: payload.alimento_id,
                tipo: payload.tipo,
                quantidade: payload.quantidade,
                observacao: payload.observacao.as_deref(),
                data_producao: payload.data_producao,
                data_validade: payload.data_validade,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(criada)))
}

// GET /api/tenant/{tenant_id}/movimentacoes
#[utoipa::path(
    get,
    path = "/api/tenant/{tenant_id}/movimentacoes",
    tag = "Tenant - Movimentações",
    params(
        ("tenant_id" = Uuid, Path, description = "ID do restaurante"),
        ListarMovimentacoesQuery
    ),
    responses((status = 200, description = "Histórico, mais recentes primeiro", body = Vec<MovimentacaoDetalhada>)),
    security(("api_jwt" = []))
)]
pub async fn listar_movimentacoes(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(tenant_id): Path<Uuid>,
    Query(query): Query<ListarMovimentacoesQuery>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .auth_service
        .garantir_acesso_restaurante(&user, tenant_id, Papel::Leitura)
        .await?;

    let data_inicio = query
        .data_inicio
        .as_deref()
        .map(|v| parse_data_filtro(v, false))
        .transpose()?;
    let data_fim = query
        .data_fim
        .as_deref()
        .map(|v| parse_data_filtro(v, true))
        .transpose()?;

    let movimentacoes = app_state
        .inventory_service
        .listar_movimentacoes(tenant_id, query.tipo, data_inicio, data_fim)
        .await?;
    Ok(Json(movimentacoes))
}

// GET /api/tenant/{tenant_id}/movimentacoes/{movimentacao_id}/etiqueta
#[utoipa::path(
    get,
    path = "/api/tenant/{tenant_id}/movimentacoes/{movimentacao_id}/etiqueta",
    tag = "Tenant - Movimentações",
    params(
        ("tenant_id" = Uuid, Path, description = "ID do restaurante"),
        ("movimentacao_id" = Uuid, Path, description = "ID da movimentação de entrada")
    ),
    responses(
        (status = 200, description = "Etiqueta em PDF com QR code", body = Vec<u8>, content_type = "application/pdf"),
        (status = 400, description = "Movimentação não possui QR code gerado"),
        (status = 404, description = "Movimentação de entrada não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn gerar_etiqueta(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path((tenant_id, movimentacao_id)): Path<(Uuid, Uuid)>,
) -> Result<Response, AppError> {
    app_state
        .auth_service
        .garantir_acesso_restaurante(&user, tenant_id, Papel::Leitura)
        .await?;

    let pdf_bytes = app_state
        .etiqueta_service
        .gerar_etiqueta_pdf(&app_state.db_pool, tenant_id, movimentacao_id)
        .await?;

    // Headers para o navegador baixar ou mostrar o PDF
    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"etiqueta_{}.pdf\"", movimentacao_id),
        ),
    ];

    Ok((headers, pdf_bytes).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filtro_aceita_data_pura_e_timestamp() {
        let inicio = parse_data_filtro("2025-01-07", false).unwrap();
        assert_eq!(inicio.to_rfc3339(), "2025-01-07T00:00:00+00:00");

        let fim = parse_data_filtro("2025-01-07", true).unwrap();
        assert_eq!(fim.to_rfc3339(), "2025-01-07T23:59:59+00:00");

        let exato = parse_data_filtro("2025-01-07T10:30:00Z", false).unwrap();
        assert_eq!(exato.to_rfc3339(), "2025-01-07T10:30:00+00:00");
    }

    #[test]
    fn filtro_rejeita_lixo() {
        assert!(parse_data_filtro("ontem", false).is_err());
    }
}
