// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    db::{InventoryRepository, TenancyRepository, UserRepository},
    services::{
        auth::AuthService, etiqueta_service::EtiquetaService,
        inventory_service::InventoryService, tenancy_service::TenancyService,
        usuario_service::UsuarioService,
    },
};

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub tenancy_service: TenancyService,
    pub usuario_service: UsuarioService,
    pub inventory_service: InventoryService,
    pub etiqueta_service: EtiquetaService,
}

impl AppState {
    // Carrega as configurações do ambiente e monta o estado da aplicação.
    pub async fn new() -> anyhow::Result<Self> {
        // Em produção as variáveis vêm do ambiente; o .env é opcional.
        dotenvy::dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").map_err(|_| anyhow::anyhow!("DATABASE_URL deve ser definida"))?;
        let jwt_secret =
            env::var("JWT_SECRET").map_err(|_| anyhow::anyhow!("JWT_SECRET deve ser definido"))?;

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        let user_repo = UserRepository::new(db_pool.clone());
        let tenancy_repo = TenancyRepository::new(db_pool.clone());
        let inventory_repo = InventoryRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            user_repo.clone(),
            tenancy_repo.clone(),
            jwt_secret,
            db_pool.clone(),
        );
        let tenancy_service = TenancyService::new(tenancy_repo.clone(), db_pool.clone());
        let usuario_service =
            UsuarioService::new(user_repo.clone(), tenancy_repo.clone(), db_pool.clone());
        let inventory_service = InventoryService::new(inventory_repo.clone(), db_pool.clone());
        let etiqueta_service = EtiquetaService::new(inventory_repo);

        Ok(Self {
            db_pool,
            auth_service,
            tenancy_service,
            usuario_service,
            inventory_service,
            etiqueta_service,
        })
    }

    // Endereço de escuta do servidor (BIND_ADDR opcional).
    pub fn bind_addr() -> String {
        env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string())
    }
}
