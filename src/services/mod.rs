pub mod auth;
pub mod etiqueta_service;
pub mod inventory_service;
pub mod tenancy_service;
pub mod usuario_service;
