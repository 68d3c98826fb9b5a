// src/main.rs

use std::time::Duration;

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post, put},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Autenticação: login é público, /me exige token
    let auth_routes = Router::new()
        .route("/login", post(handlers::auth::login))
        .route(
            "/me",
            get(handlers::auth::get_me).layer(axum_middleware::from_fn_with_state(
                app_state.clone(),
                auth_guard,
            )),
        );

    // Diretório da plataforma: empresas, restaurantes e usuários.
    // O guard de admin fica dentro dos handlers.
    let admin_routes = Router::new()
        .route(
            "/clientes",
            get(handlers::clientes::listar_clientes).post(handlers::clientes::criar_cliente),
        )
        .route(
            "/clientes/{id}",
            get(handlers::clientes::obter_cliente)
                .put(handlers::clientes::atualizar_cliente)
                .delete(handlers::clientes::deletar_cliente),
        )
        .route(
            "/clientes/{id}/toggle-status",
            patch(handlers::clientes::alternar_status_cliente),
        )
        .route(
            "/clientes/{id}/restaurantes",
            get(handlers::clientes::listar_restaurantes_do_cliente),
        )
        .route(
            "/restaurantes",
            get(handlers::restaurantes::listar_restaurantes)
                .post(handlers::restaurantes::criar_restaurante),
        )
        .route(
            "/restaurantes/{id}",
            get(handlers::restaurantes::obter_restaurante)
                .put(handlers::restaurantes::atualizar_restaurante)
                .delete(handlers::restaurantes::deletar_restaurante),
        )
        .route(
            "/restaurantes/{id}/toggle-status",
            patch(handlers::restaurantes::alternar_status_restaurante),
        )
        .route(
            "/usuarios",
            get(handlers::usuarios::listar_usuarios).post(handlers::usuarios::criar_usuario),
        )
        .route(
            "/usuarios/{id}",
            get(handlers::usuarios::obter_usuario)
                .put(handlers::usuarios::atualizar_usuario)
                .delete(handlers::usuarios::deletar_usuario),
        )
        .route(
            "/usuarios/{id}/tenants",
            get(handlers::usuarios::listar_tenants_do_usuario),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Operações por restaurante. Vínculo, papel e bloqueio são verificados
    // em cada handler contra o tenant do path.
    let tenant_routes = Router::new()
        .route(
            "/{tenant_id}/alimentos",
            get(handlers::alimentos::listar_alimentos).post(handlers::alimentos::criar_alimento),
        )
        .route(
            "/{tenant_id}/alimentos/{alimento_id}",
            get(handlers::alimentos::obter_alimento)
                .put(handlers::alimentos::atualizar_alimento)
                .delete(handlers::alimentos::deletar_alimento),
        )
        .route(
            "/{tenant_id}/movimentacoes",
            get(handlers::movimentacoes::listar_movimentacoes)
                .post(handlers::movimentacoes::criar_movimentacao),
        )
        .route(
            "/{tenant_id}/movimentacoes/{movimentacao_id}/etiqueta",
            get(handlers::movimentacoes::gerar_etiqueta),
        )
        .route(
            "/{tenant_id}/lotes/vencendo",
            get(handlers::lotes::listar_lotes_vencendo),
        )
        .route(
            "/{tenant_id}/lotes/alertas",
            get(handlers::lotes::listar_alertas_lotes),
        )
        .route(
            "/{tenant_id}/qrcode/validar",
            post(handlers::qrcode::validar_qrcode),
        )
        .route(
            "/{tenant_id}/qrcode/usar",
            post(handlers::qrcode::usar_qrcode),
        )
        .route(
            "/{tenant_id}/usuarios",
            get(handlers::usuarios::listar_usuarios_tenant)
                .post(handlers::usuarios::criar_usuario_tenant),
        )
        .route(
            "/{tenant_id}/usuarios/{usuario_id}",
            put(handlers::usuarios::atualizar_usuario_tenant)
                .delete(handlers::usuarios::deletar_usuario_tenant),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/admin", admin_routes)
        .nest("/api/tenant", tenant_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        // Os painéis rodam em origens próprias; sem CORS nada funciona
        .layer(CorsLayer::permissive())
        // O cliente não tem retry: uma requisição pendurada precisa morrer
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    // Inicia o servidor
    let addr = AppState::bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}
