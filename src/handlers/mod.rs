pub mod alimentos;
pub mod auth;
pub mod clientes;
pub mod lotes;
pub mod movimentacoes;
pub mod qrcode;
pub mod restaurantes;
pub mod usuarios;
