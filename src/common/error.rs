// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// O corpo de erro no wire é sempre `{"detail": "..."}`: é o formato que
// os painéis (admin/cozinha) já interpretam.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Email ou senha incorretos")]
    CredenciaisInvalidas,

    #[error("Token de autenticação inválido ou ausente")]
    TokenInvalido,

    #[error("Usuário inativo")]
    UsuarioInativo,

    #[error("Acesso negado")]
    AcessoNegado,

    #[error("Empresa bloqueada")]
    EmpresaBloqueada,

    #[error("Restaurante bloqueado")]
    RestauranteBloqueado,

    #[error("{0} não encontrado")]
    NaoEncontrado(&'static str),

    #[error("Email já cadastrado")]
    EmailJaCadastrado,

    #[error("Slug (URL) já cadastrado")]
    SlugJaCadastrado,

    #[error("Estoque insuficiente")]
    EstoqueInsuficiente,

    #[error("{0}")]
    QuantidadeIndisponivel(String),

    #[error("{0}")]
    RegraDeNegocio(String),

    #[error("Fonte não encontrada: {0}")]
    FonteNaoEncontrada(String),

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado.
    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut campos = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    campos.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "detail": "Um ou mais campos são inválidos.",
                    "campos": campos,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            AppError::CredenciaisInvalidas | AppError::TokenInvalido => {
                (StatusCode::UNAUTHORIZED, self.to_string())
            }

            AppError::UsuarioInativo
            | AppError::AcessoNegado
            | AppError::EmpresaBloqueada
            | AppError::RestauranteBloqueado => (StatusCode::FORBIDDEN, self.to_string()),

            AppError::NaoEncontrado(_) => (StatusCode::NOT_FOUND, self.to_string()),

            AppError::EmailJaCadastrado
            | AppError::SlugJaCadastrado
            | AppError::EstoqueInsuficiente
            | AppError::QuantidadeIndisponivel(_)
            | AppError::RegraDeNegocio(_) => (StatusCode::BAD_REQUEST, self.to_string()),

            // Todos os outros erros viram 500. O detalhe fica no log,
            // nunca na resposta.
            e => {
                tracing::error!("Erro interno do servidor: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro inesperado.".to_string(),
                )
            }
        };

        let body = Json(json!({ "detail": detail }));
        (status, body).into_response()
    }
}
