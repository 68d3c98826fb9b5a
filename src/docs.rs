// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Admin: Clientes ---
        handlers::clientes::listar_clientes,
        handlers::clientes::obter_cliente,
        handlers::clientes::criar_cliente,
        handlers::clientes::atualizar_cliente,
        handlers::clientes::deletar_cliente,
        handlers::clientes::alternar_status_cliente,
        handlers::clientes::listar_restaurantes_do_cliente,

        // --- Admin: Restaurantes ---
        handlers::restaurantes::listar_restaurantes,
        handlers::restaurantes::obter_restaurante,
        handlers::restaurantes::criar_restaurante,
        handlers::restaurantes::atualizar_restaurante,
        handlers::restaurantes::deletar_restaurante,
        handlers::restaurantes::alternar_status_restaurante,

        // --- Admin: Usuários ---
        handlers::usuarios::listar_usuarios,
        handlers::usuarios::obter_usuario,
        handlers::usuarios::listar_tenants_do_usuario,
        handlers::usuarios::criar_usuario,
        handlers::usuarios::atualizar_usuario,
        handlers::usuarios::deletar_usuario,

        // --- Tenant: Usuários ---
        handlers::usuarios::listar_usuarios_tenant,
        handlers::usuarios::criar_usuario_tenant,
        handlers::usuarios::atualizar_usuario_tenant,
        handlers::usuarios::deletar_usuario_tenant,

        // --- Tenant: Alimentos ---
        handlers::alimentos::listar_alimentos,
        handlers::alimentos::obter_alimento,
        handlers::alimentos::criar_alimento,
        handlers::alimentos::atualizar_alimento,
        handlers::alimentos::deletar_alimento,

        // --- Tenant: Movimentações ---
        handlers::movimentacoes::criar_movimentacao,
        handlers::movimentacoes::listar_movimentacoes,
        handlers::movimentacoes::gerar_etiqueta,

        // --- Tenant: Lotes ---
        handlers::lotes::listar_lotes_vencendo,
        handlers::lotes::listar_alertas_lotes,

        // --- Tenant: QR Code ---
        handlers::qrcode::validar_qrcode,
        handlers::qrcode::usar_qrcode,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Usuario,
            models::auth::Papel,
            models::auth::VinculoRestaurante,
            models::auth::LoginPayload,
            models::auth::RestauranteResumo,
            models::auth::PerfilUsuario,
            models::auth::LoginResponse,
            models::auth::MeResponse,

            // --- Tenancy ---
            models::tenancy::Cliente,
            models::tenancy::Restaurante,
            models::tenancy::ToggleStatusResponse,

            // --- Inventory ---
            models::inventory::Alimento,
            models::inventory::TipoMovimentacao,
            models::inventory::Movimentacao,
            models::inventory::MovimentacaoDetalhada,
            models::inventory::MovimentacaoCriada,
            models::inventory::EstadoLote,
            models::inventory::Lote,
            models::inventory::Urgencia,
            models::inventory::LoteVencendo,
            models::inventory::AlertaLoteItem,
            models::inventory::AlertasLotes,
            models::inventory::ValidarQrResponse,
            models::inventory::UsarQrResponse,

            // --- Payloads ---
            handlers::clientes::ClientePayload,
            handlers::restaurantes::CriarRestaurantePayload,
            handlers::restaurantes::AtualizarRestaurantePayload,
            handlers::usuarios::CriarUsuarioPayload,
            handlers::usuarios::AtualizarUsuarioPayload,
            handlers::usuarios::CriarUsuarioTenantPayload,
            handlers::usuarios::AtualizarUsuarioTenantPayload,
            handlers::alimentos::CriarAlimentoPayload,
            handlers::alimentos::AtualizarAlimentoPayload,
            handlers::movimentacoes::CriarMovimentacaoPayload,
            handlers::qrcode::ValidarQrPayload,

            // --- Services ---
            services::usuario_service::GrantRestaurante,
            services::usuario_service::UsuarioComVinculos,
            services::usuario_service::UsuarioTenantResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e perfil"),
        (name = "Admin - Clientes", description = "Empresas donas dos restaurantes"),
        (name = "Admin - Restaurantes", description = "Tenants de estoque"),
        (name = "Admin - Usuários", description = "Usuários da plataforma e vínculos"),
        (name = "Tenant - Usuários", description = "Gestão de usuários pelo admin do restaurante"),
        (name = "Tenant - Alimentos", description = "Catálogo e estoque por restaurante"),
        (name = "Tenant - Movimentações", description = "Livro-razão de estoque e etiquetas"),
        (name = "Tenant - Lotes", description = "Alertas de validade"),
        (name = "Tenant - QR Code", description = "Validação e baixa via QR Code")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
