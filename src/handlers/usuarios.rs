// src/handlers/usuarios.rs

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
    models::auth::{Papel, Usuario},
    services::usuario_service::{
        AtualizacaoUsuario, GrantRestaurante, NovoUsuario, UsuarioComVinculos,
        UsuarioTenantResponse,
    },
};

// =============================================================================
//  ÁREA 1: GESTÃO GLOBAL (admin da plataforma)
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CriarUsuarioPayload {
    // Nulo apenas para admins da plataforma
    pub cliente_id: Option<Uuid>,

    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub nome: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,

    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub senha: String,

    #[serde(default)]
    pub is_admin: bool,

    // Restaurantes com permissões. Pode vir vazio: o usuário fica sem
    // acesso a tenant até alguém conceder.
    pub restaurantes: Option<Vec<GrantRestaurante>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AtualizarUsuarioPayload {
    pub nome: Option<String>,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,

    // Senha em branco ou ausente = não rotaciona
    pub senha: Option<String>,

    pub is_admin: Option<bool>,
    pub ativo: Option<bool>,

    // Quando presente, substitui o conjunto inteiro de vínculos
    pub restaurantes: Option<Vec<GrantRestaurante>>,
}

// GET /api/admin/usuarios
#[utoipa::path(
    get,
    path = "/api/admin/usuarios",
    tag = "Admin - Usuários",
    responses((status = 200, body = Vec<UsuarioComVinculos>)),
    security(("api_jwt" = []))
)]
pub async fn listar_usuarios(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    app_state.auth_service.garantir_admin(&user)?;
    let usuarios = app_state.usuario_service.listar().await?;
    Ok(Json(usuarios))
}

// GET /api/admin/usuarios/{id}
#[utoipa::path(
    get,
    path = "/api/admin/usuarios/{id}",
    tag = "Admin - Usuários",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 200, body = UsuarioComVinculos),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn obter_usuario(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.auth_service.garantir_admin(&user)?;
    let usuario = app_state.usuario_service.buscar(id).await?;
    Ok(Json(usuario))
}

// GET /api/admin/usuarios/{id}/tenants
#[utoipa::path(
    get,
    path = "/api/admin/usuarios/{id}/tenants",
    tag = "Admin - Usuários",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses((status = 200, body = Vec<GrantRestaurante>)),
    security(("api_jwt" = []))
)]
pub async fn listar_tenants_do_usuario(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.auth_service.garantir_admin(&user)?;
    let grants = app_state.usuario_service.listar_grants(id).await?;
    Ok(Json(grants))
}

// POST /api/admin/usuarios
#[utoipa::path(
    post,
    path = "/api/admin/usuarios",
    tag = "Admin - Usuários",
    request_body = CriarUsuarioPayload,
    responses(
        (status = 201, description = "Usuário criado", body = Usuario),
        (status = 400, description = "Dados inválidos ou email já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn criar_usuario(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CriarUsuarioPayload>,
) -> Result<impl IntoResponse, AppError> {
    app_state.auth_service.garantir_admin(&user)?;
    payload.validate().map_err(AppError::ValidationError)?;

    let usuario = app_state
        .usuario_service
        .criar(NovoUsuario {
            cliente_id: payload.cliente_id,
            nome: &payload.nome,
            email: &payload.email,
            senha: &payload.senha,
            is_admin: payload.is_admin,
            restaurantes: payload.restaurantes,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(usuario)))
}

// PUT /api/admin/usuarios/{id}
#[utoipa::path(
    put,
    path = "/api/admin/usuarios/{id}",
    tag = "Admin - Usuários",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    request_body = AtualizarUsuarioPayload,
    responses(
        (status = 200, body = Usuario),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn atualizar_usuario(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AtualizarUsuarioPayload>,
) -> Result<impl IntoResponse, AppError> {
    app_state.auth_service.garantir_admin(&user)?;
    payload.validate().map_err(AppError::ValidationError)?;

    let usuario = app_state
        .usuario_service
        .atualizar(
            id,
            AtualizacaoUsuario {
                nome: payload.nome.as_deref(),
                email: payload.email.as_deref(),
                senha: payload.senha.as_deref(),
                is_admin: payload.is_admin,
                ativo: payload.ativo,
                restaurantes: payload.restaurantes,
            },
        )
        .await?;
    Ok(Json(usuario))
}

// DELETE /api/admin/usuarios/{id}
#[utoipa::path(
    delete,
    path = "/api/admin/usuarios/{id}",
    tag = "Admin - Usuários",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 204, description = "Usuário removido, vínculos revogados"),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn deletar_usuario(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.auth_service.garantir_admin(&user)?;
    app_state.usuario_service.deletar(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  ÁREA 2: GESTÃO PELO ADMIN DO RESTAURANTE
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CriarUsuarioTenantPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub nome: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,

    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub senha: String,

    #[serde(default)]
    pub is_admin_restaurante: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AtualizarUsuarioTenantPayload {
    pub nome: Option<String>,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,

    pub senha: Option<String>,
    pub is_admin_restaurante: Option<bool>,
}

// GET /api/tenant/{tenant_id}/usuarios
#[utoipa::path(
    get,
    path = "/api/tenant/{tenant_id}/usuarios",
    tag = "Tenant - Usuários",
    params(("tenant_id" = Uuid, Path, description = "ID do restaurante")),
    responses((status = 200, body = Vec<UsuarioTenantResponse>)),
    security(("api_jwt" = []))
)]
pub async fn listar_usuarios_tenant(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(tenant_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .auth_service
        .garantir_acesso_restaurante(&user, tenant_id, Papel::Admin)
        .await?;
    let usuarios = app_state
        .usuario_service
        .listar_do_restaurante(tenant_id)
        .await?;
    Ok(Json(usuarios))
}

// POST /api/tenant/{tenant_id}/usuarios
#[utoipa::path(
    post,
    path = "/api/tenant/{tenant_id}/usuarios",
    tag = "Tenant - Usuários",
    params(("tenant_id" = Uuid, Path, description = "ID do restaurante")),
    request_body = CriarUsuarioTenantPayload,
    responses(
        (status = 201, body = UsuarioTenantResponse),
        (status = 400, description = "Email já cadastrado"),
        (status = 403, description = "Apenas administradores podem gerenciar usuários")
    ),
    security(("api_jwt" = []))
)]
pub async fn criar_usuario_tenant(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(tenant_id): Path<Uuid>,
    Json(payload): Json<CriarUsuarioTenantPayload>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .auth_service
        .garantir_acesso_restaurante(&user, tenant_id, Papel::Admin)
        .await?;
    payload.validate().map_err(AppError::ValidationError)?;

    let usuario = app_state
        .usuario_service
        .criar_no_restaurante(
            tenant_id,
            &payload.nome,
            &payload.email,
            &payload.senha,
            payload.is_admin_restaurante,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(usuario)))
}

// PUT /api/tenant/{tenant_id}/usuarios/{usuario_id}
#[utoipa::path(
    put,
    path = "/api/tenant/{tenant_id}/usuarios/{usuario_id}",
    tag = "Tenant - Usuários",
    params(
        ("tenant_id" = Uuid, Path, description = "ID do restaurante"),
        ("usuario_id" = Uuid, Path, description = "ID do usuário")
    ),
    request_body = AtualizarUsuarioTenantPayload,
    responses(
        (status = 200, body = UsuarioTenantResponse),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn atualizar_usuario_tenant(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path((tenant_id, usuario_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<AtualizarUsuarioTenantPayload>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .auth_service
        .garantir_acesso_restaurante(&user, tenant_id, Papel::Admin)
        .await?;
    payload.validate().map_err(AppError::ValidationError)?;

    let usuario = app_state
        .usuario_service
        .atualizar_no_restaurante(
            tenant_id,
            usuario_id,
            payload.nome.as_deref(),
            payload.email.as_deref(),
            payload.senha.as_deref(),
            payload.is_admin_restaurante,
        )
        .await?;
    Ok(Json(usuario))
}

// DELETE /api/tenant/{tenant_id}/usuarios/{usuario_id}
#[utoipa::path(
    delete,
    path = "/api/tenant/{tenant_id}/usuarios/{usuario_id}",
    tag = "Tenant - Usuários",
    params(
        ("tenant_id" = Uuid, Path, description = "ID do restaurante"),
        ("usuario_id" = Uuid, Path, description = "ID do usuário")
    ),
    responses(
        (status = 204, description = "Usuário removido"),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn deletar_usuario_tenant(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path((tenant_id, usuario_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .auth_service
        .garantir_acesso_restaurante(&user, tenant_id, Papel::Admin)
        .await?;
    app_state
        .usuario_service
        .deletar_do_restaurante(tenant_id, usuario_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
