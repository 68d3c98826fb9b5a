// src/handlers/alimentos.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::{auth::Papel, inventory::Alimento},
};

// ---
// Validações customizadas
// ---
fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

fn validate_positive(val: &Decimal) -> Result<(), ValidationError> {
    if *val <= Decimal::ZERO {
        let mut err = ValidationError::new("range");
        err.message = Some("O valor deve ser maior que zero.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CriarAlimentoPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    #[schema(example = "Arroz")]
    pub nome: String,

    #[schema(example = "Grãos")]
    pub categoria: Option<String>,

    #[schema(example = "kg")]
    pub unidade_medida: Option<String>,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)] // Sem o campo no JSON, assume 0
    pub quantidade_minima: Decimal,

    #[schema(example = "caixa")]
    pub tipo_embalagem: Option<String>,

    #[validate(custom(function = "validate_positive"))]
    pub unidades_por_embalagem: Option<Decimal>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AtualizarAlimentoPayload {
    pub nome: Option<String>,
    pub categoria: Option<String>,
    pub unidade_medida: Option<String>,

    #[validate(custom(function = "validate_not_negative"))]
    pub quantidade_minima: Option<Decimal>,

    pub tipo_embalagem: Option<String>,

    #[validate(custom(function = "validate_positive"))]
    pub unidades_por_embalagem: Option<Decimal>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListarAlimentosQuery {
    pub categoria: Option<String>,
    // Busca por nome (case-insensitive, substring). Sempre server-side:
    // o front-end é só renderização.
    pub search: Option<String>,
}

// GET /api/tenant/{tenant_id}/alimentos
#[utoipa::path(
    get,
    path = "/api/tenant/{tenant_id}/alimentos",
    tag = "Tenant - Alimentos",
    params(
        ("tenant_id" = Uuid, Path, description = "ID do restaurante"),
        ListarAlimentosQuery
    ),
    responses((status = 200, description = "Snapshot atual do estoque", body = Vec<Alimento>)),
    security(("api_jwt" = []))
)]
pub async fn listar_alimentos(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(tenant_id): Path<Uuid>,
    Query(query): Query<ListarAlimentosQuery>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .auth_service
        .garantir_acesso_restaurante(&user, tenant_id, Papel::Leitura)
        .await?;

    let alimentos = app_state
        .inventory_service
        .listar_alimentos(
            tenant_id,
            query.categoria.as_deref(),
            query.search.as_deref(),
        )
        .await?;
    Ok(Json(alimentos))
}

// GET /api/tenant/{tenant_id}/alimentos/{alimento_id}
#[utoipa::path(
    get,
    path = "/api/tenant/{tenant_id}/alimentos/{alimento_id}",
    tag = "Tenant - Alimentos",
    params(
        ("tenant_id" = Uuid, Path, description = "ID do restaurante"),
        ("alimento_id" = Uuid, Path, description = "ID do alimento")
    ),
    responses(
        (status = 200, body = Alimento),
        (status = 404, description = "Alimento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn obter_alimento(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path((tenant_id, alimento_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .auth_service
        .garantir_acesso_restaurante(&user, tenant_id, Papel::Leitura)
        .await?;

    let alimento = app_state
        .inventory_service
        .buscar_alimento(tenant_id, alimento_id)
        .await?;
    Ok(Json(alimento))
}

// POST /api/tenant/{tenant_id}/alimentos
// Todo alimento nasce com estoque zero: entradas vêm via movimentações.
#[utoipa::path(
    post,
    path = "/api/tenant/{tenant_id}/alimentos",
    tag = "Tenant - Alimentos",
    params(("tenant_id" = Uuid, Path, description = "ID do restaurante")),
    request_body = CriarAlimentoPayload,
    responses(
        (status = 201, description = "Alimento criado com estoque zero", body = Alimento),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn criar_alimento(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(tenant_id): Path<Uuid>,
    Json(payload): Json<CriarAlimentoPayload>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .auth_service
        .garantir_acesso_restaurante(&user, tenant_id, Papel::Admin)
        .await?;
    payload.validate().map_err(AppError::ValidationError)?;

    let alimento = app_state
        .inventory_service
        .criar_alimento(
            tenant_id,
            &payload.nome,
            payload.categoria.as_deref(),
            payload.unidade_medida.as_deref(),
            payload.quantidade_minima,
            payload.tipo_embalagem.as_deref(),
            payload.unidades_por_embalagem,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(alimento)))
}

// PUT /api/tenant/{tenant_id}/alimentos/{alimento_id}
// Atualização parcial: estoque atual fica de fora de propósito, ele só
// muda via movimentações.
#[utoipa::path(
    put,
    path = "/api/tenant/{tenant_id}/alimentos/{alimento_id}",
    tag = "Tenant - Alimentos",
    params(
        ("tenant_id" = Uuid, Path, description = "ID do restaurante"),
        ("alimento_id" = Uuid, Path, description = "ID do alimento")
    ),
    request_body = AtualizarAlimentoPayload,
    responses(
        (status = 200, body = Alimento),
        (status = 404, description = "Alimento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn atualizar_alimento(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path((tenant_id, alimento_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<AtualizarAlimentoPayload>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .auth_service
        .garantir_acesso_restaurante(&user, tenant_id, Papel::Admin)
        .await?;
    payload.validate().map_err(AppError::ValidationError)?;

    let alimento = app_state
        .inventory_service
        .atualizar_alimento(
            tenant_id,
            alimento_id,
            payload.nome.as_deref(),
            payload.categoria.as_deref(),
            payload.unidade_medida.as_deref(),
            payload.quantidade_minima,
            payload.tipo_embalagem.as_deref(),
            payload.unidades_por_embalagem,
        )
        .await?;
    Ok(Json(alimento))
}

// DELETE /api/tenant/{tenant_id}/alimentos/{alimento_id}
// Destrutivo: leva junto as movimentações e os lotes do item.
#[utoipa::path(
    delete,
    path = "/api/tenant/{tenant_id}/alimentos/{alimento_id}",
    tag = "Tenant - Alimentos",
    params(
        ("tenant_id" = Uuid, Path, description = "ID do restaurante"),
        ("alimento_id" = Uuid, Path, description = "ID do alimento")
    ),
    responses(
        (status = 204, description = "Alimento, movimentações e lotes removidos"),
        (status = 404, description = "Alimento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn deletar_alimento(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path((tenant_id, alimento_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .auth_service
        .garantir_acesso_restaurante(&user, tenant_id, Papel::Admin)
        .await?;
    app_state
        .inventory_service
        .deletar_alimento(tenant_id, alimento_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
