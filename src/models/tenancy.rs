// src/models/tenancy.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// ---
// 1. Cliente (A "Empresa")
// ---
// A entidade que fatura: dona de um ou mais restaurantes.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Cliente {
    pub id: Uuid,
    pub nome_empresa: String,
    pub email: Option<String>,
    pub telefone: Option<String>,
    pub cnpj: Option<String>,
    pub endereco: Option<String>,
    pub cidade: Option<String>,
    pub estado: Option<String>,
    pub ativo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---
// 2. Restaurante (O "Tenant")
// ---
// O escopo isolado de estoque. Todo alimento, movimentação e lote
// pertence a exatamente um restaurante.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Restaurante {
    pub id: Uuid,
    pub cliente_id: Uuid,
    pub nome: String,
    pub slug: String,
    pub email: Option<String>,
    pub telefone: Option<String>,
    pub cnpj: Option<String>,
    pub endereco: Option<String>,
    pub ativo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Resposta do PATCH .../toggle-status
#[derive(Debug, Serialize, ToSchema)]
pub struct ToggleStatusResponse {
    pub id: Uuid,
    pub nome: String,
    pub ativo: bool,
    pub message: String,
}

// Par (restaurante ativo?, empresa ativa?) usado na decisão de acesso.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct StatusAcesso {
    pub restaurante_ativo: bool,
    pub cliente_ativo: bool,
}
