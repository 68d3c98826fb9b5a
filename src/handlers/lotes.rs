// src/handlers/lotes.rs

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::{
        auth::Papel,
        inventory::{AlertasLotes, LoteVencendo},
    },
};

fn dias_padrao() -> i64 {
    3
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct JanelaDiasQuery {
    // Janela de dias à frente para considerar um lote "vencendo"
    #[serde(default = "dias_padrao")]
    pub dias: i64,
}

// GET /api/tenant/{tenant_id}/lotes/vencendo
#[utoipa::path(
    get,
    path = "/api/tenant/{tenant_id}/lotes/vencendo",
    tag = "Tenant - Lotes",
    params(
        ("tenant_id" = Uuid, Path, description = "ID do restaurante"),
        JanelaDiasQuery
    ),
    responses((status = 200, description = "Lotes não esgotados vencendo na janela, com urgência", body = Vec<LoteVencendo>)),
    security(("api_jwt" = []))
)]
pub async fn listar_lotes_vencendo(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(tenant_id): Path<Uuid>,
    Query(query): Query<JanelaDiasQuery>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .auth_service
        .garantir_acesso_restaurante(&user, tenant_id, Papel::Leitura)
        .await?;

    let hoje = Utc::now().date_naive();
    let lotes = app_state
        .inventory_service
        .lotes_vencendo(tenant_id, query.dias, hoje)
        .await?;
    Ok(Json(lotes))
}

// GET /api/tenant/{tenant_id}/lotes/alertas
// Vencidos + vencendo em uma resposta só, para o alerta de login da cozinha.
#[utoipa::path(
    get,
    path = "/api/tenant/{tenant_id}/lotes/alertas",
    tag = "Tenant - Lotes",
    params(
        ("tenant_id" = Uuid, Path, description = "ID do restaurante"),
        JanelaDiasQuery
    ),
    responses((status = 200, body = AlertasLotes)),
    security(("api_jwt" = []))
)]
pub async fn listar_alertas_lotes(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(tenant_id): Path<Uuid>,
    Query(query): Query<JanelaDiasQuery>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .auth_service
        .garantir_acesso_restaurante(&user, tenant_id, Papel::Leitura)
        .await?;

    let hoje = Utc::now().date_naive();
    let alertas = app_state
        .inventory_service
        .alertas_lotes(tenant_id, query.dias, hoje)
        .await?;
    Ok(Json(alertas))
}
