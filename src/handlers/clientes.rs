// src/handlers/clientes.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::tenancy::{Cliente, Restaurante, ToggleStatusResponse},
    services::tenancy_service::NovoCliente,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ClientePayload {
    #[validate(length(min = 1, message = "O nome da empresa é obrigatório."))]
    #[schema(example = "Sabor & Cia Ltda")]
    pub nome_empresa: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,

    pub telefone: Option<String>,
    pub cnpj: Option<String>,
    pub endereco: Option<String>,
    pub cidade: Option<String>,
    pub estado: Option<String>,
}

impl ClientePayload {
    fn como_novo(&self) -> NovoCliente<'_> {
        NovoCliente {
            nome_empresa: &self.nome_empresa,
            email: self.email.as_deref(),
            telefone: self.telefone.as_deref(),
            cnpj: self.cnpj.as_deref(),
            endereco: self.endereco.as_deref(),
            cidade: self.cidade.as_deref(),
            estado: self.estado.as_deref(),
        }
    }
}

// GET /api/admin/clientes
#[utoipa::path(
    get,
    path = "/api/admin/clientes",
    tag = "Admin - Clientes",
    responses((status = 200, description = "Todas as empresas, bloqueadas por último", body = Vec<Cliente>)),
    security(("api_jwt" = []))
)]
pub async fn listar_clientes(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    app_state.auth_service.garantir_admin(&user)?;
    let clientes = app_state.tenancy_service.listar_clientes().await?;
    Ok(Json(clientes))
}

// GET /api/admin/clientes/{id}
#[utoipa::path(
    get,
    path = "/api/admin/clientes/{id}",
    tag = "Admin - Clientes",
    params(("id" = Uuid, Path, description = "ID da empresa")),
    responses(
        (status = 200, body = Cliente),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn obter_cliente(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.auth_service.garantir_admin(&user)?;
    let cliente = app_state.tenancy_service.buscar_cliente(id).await?;
    Ok(Json(cliente))
}

// POST /api/admin/clientes
#[utoipa::path(
    post,
    path = "/api/admin/clientes",
    tag = "Admin - Clientes",
    request_body = ClientePayload,
    responses(
        (status = 201, description = "Empresa criada", body = Cliente),
        (status = 400, description = "Dados inválidos ou email já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn criar_cliente(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<ClientePayload>,
) -> Result<impl IntoResponse, AppError> {
    app_state.auth_service.garantir_admin(&user)?;
    payload.validate().map_err(AppError::ValidationError)?;

    let cliente = app_state
        .tenancy_service
        .criar_cliente(payload.como_novo())
        .await?;
    Ok((StatusCode::CREATED, Json(cliente)))
}

// PUT /api/admin/clientes/{id}
#[utoipa::path(
    put,
    path = "/api/admin/clientes/{id}",
    tag = "Admin - Clientes",
    params(("id" = Uuid, Path, description = "ID da empresa")),
    request_body = ClientePayload,
    responses(
        (status = 200, body = Cliente),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn atualizar_cliente(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ClientePayload>,
) -> Result<impl IntoResponse, AppError> {
    app_state.auth_service.garantir_admin(&user)?;
    payload.validate().map_err(AppError::ValidationError)?;

    let cliente = app_state
        .tenancy_service
        .atualizar_cliente(id, payload.como_novo())
        .await?;
    Ok(Json(cliente))
}

// DELETE /api/admin/clientes/{id}
// Destrutivo: a cascata leva restaurantes, usuários e todo o estoque.
#[utoipa::path(
    delete,
    path = "/api/admin/clientes/{id}",
    tag = "Admin - Clientes",
    params(("id" = Uuid, Path, description = "ID da empresa")),
    responses(
        (status = 204, description = "Empresa e dependências removidas"),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn deletar_cliente(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.auth_service.garantir_admin(&user)?;
    app_state.tenancy_service.deletar_cliente(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// PATCH /api/admin/clientes/{id}/toggle-status
#[utoipa::path(
    patch,
    path = "/api/admin/clientes/{id}/toggle-status",
    tag = "Admin - Clientes",
    params(("id" = Uuid, Path, description = "ID da empresa")),
    responses(
        (status = 200, description = "Empresa bloqueada ou desbloqueada", body = ToggleStatusResponse),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn alternar_status_cliente(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.auth_service.garantir_admin(&user)?;
    let resposta = app_state
        .tenancy_service
        .alternar_status_cliente(id)
        .await?;
    Ok(Json(resposta))
}

// GET /api/admin/clientes/{id}/restaurantes
#[utoipa::path(
    get,
    path = "/api/admin/clientes/{id}/restaurantes",
    tag = "Admin - Clientes",
    params(("id" = Uuid, Path, description = "ID da empresa")),
    responses(
        (status = 200, body = Vec<Restaurante>),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn listar_restaurantes_do_cliente(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.auth_service.garantir_admin(&user)?;
    let restaurantes = app_state
        .tenancy_service
        .listar_restaurantes_do_cliente(id)
        .await?;
    Ok(Json(restaurantes))
}
