pub mod inventory_repo;
pub mod tenancy_repo;
pub mod user_repo;

pub use inventory_repo::InventoryRepository;
pub use tenancy_repo::TenancyRepository;
pub use user_repo::UserRepository;
