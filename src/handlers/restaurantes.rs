// src/handlers/restaurantes.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::tenancy::{Restaurante, ToggleStatusResponse},
    services::tenancy_service::NovoRestaurante,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CriarRestaurantePayload {
    pub cliente_id: Uuid,

    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    #[schema(example = "Cantina da Nona")]
    pub nome: String,

    // Subdomínio do restaurante: único no sistema inteiro
    #[validate(length(min = 2, message = "O slug deve ter no mínimo 2 caracteres."))]
    #[schema(example = "cantina-da-nona")]
    pub slug: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,

    pub telefone: Option<String>,
    pub cnpj: Option<String>,
    pub endereco: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AtualizarRestaurantePayload {
    pub nome: Option<String>,
    pub slug: Option<String>,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,

    pub telefone: Option<String>,
    pub cnpj: Option<String>,
    pub endereco: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListarRestaurantesQuery {
    // Filtra os restaurantes de uma empresa específica
    pub cliente_id: Option<Uuid>,
}

// GET /api/admin/restaurantes
#[utoipa::path(
    get,
    path = "/api/admin/restaurantes",
    tag = "Admin - Restaurantes",
    params(ListarRestaurantesQuery),
    responses((status = 200, body = Vec<Restaurante>)),
    security(("api_jwt" = []))
)]
pub async fn listar_restaurantes(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<ListarRestaurantesQuery>,
) -> Result<impl IntoResponse, AppError> {
    app_state.auth_service.garantir_admin(&user)?;
    let restaurantes = app_state
        .tenancy_service
        .listar_restaurantes(query.cliente_id)
        .await?;
    Ok(Json(restaurantes))
}

// GET /api/admin/restaurantes/{id}
#[utoipa::path(
    get,
    path = "/api/admin/restaurantes/{id}",
    tag = "Admin - Restaurantes",
    params(("id" = Uuid, Path, description = "ID do restaurante")),
    responses(
        (status = 200, body = Restaurante),
        (status = 404, description = "Restaurante não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn obter_restaurante(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.auth_service.garantir_admin(&user)?;
    let restaurante = app_state.tenancy_service.buscar_restaurante(id).await?;
    Ok(Json(restaurante))
}

// POST /api/admin/restaurantes
#[utoipa::path(
    post,
    path = "/api/admin/restaurantes",
    tag = "Admin - Restaurantes",
    request_body = CriarRestaurantePayload,
    responses(
        (status = 201, description = "Restaurante criado", body = Restaurante),
        (status = 400, description = "Dados inválidos ou slug já cadastrado"),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn criar_restaurante(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CriarRestaurantePayload>,
) -> Result<impl IntoResponse, AppError> {
    app_state.auth_service.garantir_admin(&user)?;
    payload.validate().map_err(AppError::ValidationError)?;

    let restaurante = app_state
        .tenancy_service
        .criar_restaurante(NovoRestaurante {
            cliente_id: payload.cliente_id,
            nome: &payload.nome,
            slug: &payload.slug,
            email: payload.email.as_deref(),
            telefone: payload.telefone.as_deref(),
            cnpj: payload.cnpj.as_deref(),
            endereco: payload.endereco.as_deref(),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(restaurante)))
}

// PUT /api/admin/restaurantes/{id}
#[utoipa::path(
    put,
    path = "/api/admin/restaurantes/{id}",
    tag = "Admin - Restaurantes",
    params(("id" = Uuid, Path, description = "ID do restaurante")),
    request_body = AtualizarRestaurantePayload,
    responses(
        (status = 200, body = Restaurante),
        (status = 404, description = "Restaurante não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn atualizar_restaurante(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AtualizarRestaurantePayload>,
) -> Result<impl IntoResponse, AppError> {
    app_state.auth_service.garantir_admin(&user)?;
    payload.validate().map_err(AppError::ValidationError)?;

    let restaurante = app_state
        .tenancy_service
        .atualizar_restaurante(
            id,
            payload.nome.as_deref(),
            payload.slug.as_deref(),
            payload.email.as_deref(),
            payload.telefone.as_deref(),
            payload.cnpj.as_deref(),
            payload.endereco.as_deref(),
        )
        .await?;
    Ok(Json(restaurante))
}

// DELETE /api/admin/restaurantes/{id}
// Destrutivo: remove alimentos, movimentações e lotes do restaurante.
#[utoipa::path(
    delete,
    path = "/api/admin/restaurantes/{id}",
    tag = "Admin - Restaurantes",
    params(("id" = Uuid, Path, description = "ID do restaurante")),
    responses(
        (status = 204, description = "Restaurante e dependências removidos"),
        (status = 404, description = "Restaurante não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn deletar_restaurante(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.auth_service.garantir_admin(&user)?;
    app_state.tenancy_service.deletar_restaurante(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// PATCH /api/admin/restaurantes/{id}/toggle-status
#[utoipa::path(
    patch,
    path = "/api/admin/restaurantes/{id}/toggle-status",
    tag = "Admin - Restaurantes",
    params(("id" = Uuid, Path, description = "ID do restaurante")),
    responses(
        (status = 200, body = ToggleStatusResponse),
        (status = 404, description = "Restaurante não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn alternar_status_restaurante(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.auth_service.garantir_admin(&user)?;
    let resposta = app_state
        .tenancy_service
        .alternar_status_restaurante(id)
        .await?;
    Ok(Json(resposta))
}
