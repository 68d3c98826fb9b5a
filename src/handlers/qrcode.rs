// src/handlers/qrcode.rs

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::{
        auth::Papel,
        inventory::{UsarQrResponse, ValidarQrResponse},
    },
};

// O scanner manda o código na query string; versões antigas do app da
// cozinha também repetem no corpo JSON. Aceitamos os dois.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ValidarQrQuery {
    pub qr_code: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ValidarQrPayload {
    pub qr_code: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct UsarQrQuery {
    pub qr_code: String,
    // Ausente = consome todo o restante do lote
    pub quantidade_usada: Option<Decimal>,
}

// POST /api/tenant/{tenant_id}/qrcode/validar
// Somente leitura: nunca muda o estado do lote.
#[utoipa::path(
    post,
    path = "/api/tenant/{tenant_id}/qrcode/validar",
    tag = "Tenant - QR Code",
    params(
        ("tenant_id" = Uuid, Path, description = "ID do restaurante"),
        ValidarQrQuery
    ),
    request_body = ValidarQrPayload,
    responses(
        (status = 200, description = "Resultado da validação; código desconhecido vem com valido=false", body = ValidarQrResponse)
    ),
    security(("api_jwt" = []))
)]
pub async fn validar_qrcode(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(tenant_id): Path<Uuid>,
    Query(query): Query<ValidarQrQuery>,
    body: axum::body::Bytes,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .auth_service
        .garantir_acesso_restaurante(&user, tenant_id, Papel::Leitura)
        .await?;

    let qr_code = query
        .qr_code
        .or_else(|| {
            serde_json::from_slice::<ValidarQrPayload>(&body)
                .ok()
                .and_then(|b| b.qr_code)
        })
        .ok_or_else(|| AppError::RegraDeNegocio("qr_code é obrigatório".to_string()))?;

    let hoje = Utc::now().date_naive();
    let resposta = app_state
        .inventory_service
        .validar_qrcode(tenant_id, &qr_code, hoje)
        .await?;
    Ok(Json(resposta))
}

// POST /api/tenant/{tenant_id}/qrcode/usar
// Baixa atômica: lote, estoque do alimento e saída no histórico andam
// juntos ou nada acontece.
#[utoipa::path(
    post,
    path = "/api/tenant/{tenant_id}/qrcode/usar",
    tag = "Tenant - QR Code",
    params(
        ("tenant_id" = Uuid, Path, description = "ID do restaurante"),
        UsarQrQuery
    ),
    responses(
        (status = 200, description = "Baixa realizada", body = UsarQrResponse),
        (status = 400, description = "Quantidade indisponível no lote ou estoque insuficiente"),
        (status = 404, description = "QR Code não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn usar_qrcode(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(tenant_id): Path<Uuid>,
    Query(query): Query<UsarQrQuery>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .auth_service
        .garantir_acesso_restaurante(&user, tenant_id, Papel::Leitura)
        .await?;

    let resposta = app_state
        .inventory_service
        .usar_qrcode(tenant_id, user.id, &query.qr_code, query.quantidade_usada)
        .await?;
    Ok(Json(resposta))
}
