// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Representa um usuário vindo do banco de dados.
// cliente_id nulo = admin da plataforma (painel SaaS).
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct Usuario {
    pub id: Uuid,
    pub cliente_id: Option<Uuid>,
    pub nome: String,
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    pub senha_hash: String,

    pub is_admin: bool,
    pub ativo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Papel de um usuário dentro de um restaurante.
// 'admin' gerencia produtos e estoque; 'leitura' apenas escaneia QR codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "papel_restaurante", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Papel {
    Admin,
    Leitura,
}

// Vínculo usuário ↔ restaurante retornado em /api/auth/me
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct VinculoRestaurante {
    pub tenant_id: Uuid,
    pub nome: String,
    pub ativo: bool,
    pub papel: Papel,
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    #[schema(example = "chef@restaurante.com.br")]
    pub email: String,

    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub senha: String,
}

// Resumo de restaurante embutido na resposta de login
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct RestauranteResumo {
    pub id: Uuid,
    pub nome: String,
    pub slug: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PerfilUsuario {
    pub id: Uuid,
    pub nome: String,
    pub email: String,
    pub is_admin: bool,
    pub cliente_id: Option<Uuid>,
    pub restaurantes: Vec<RestauranteResumo>,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: PerfilUsuario,
}

// Resposta de /api/auth/me: perfil + restaurantes acessíveis com papel
#[derive(Debug, Serialize, ToSchema)]
pub struct MeResponse {
    pub id: Uuid,
    pub nome: String,
    pub email: String,
    pub is_admin: bool,
    pub cliente_id: Option<Uuid>,
    pub restaurantes: Vec<VinculoRestaurante>,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID do usuário)
    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
}
