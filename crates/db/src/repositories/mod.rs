//! Repository layer: one zero-sized struct per table, with associated async
//! functions taking `&PgPool`.

pub mod category_repo;
pub mod dashboard_repo;
pub mod movement_repo;
pub mod product_repo;
pub mod user_repo;
pub mod warehouse_repo;

pub use category_repo::CategoryRepo;
pub use dashboard_repo::DashboardRepo;
pub use movement_repo::{LedgerError, MovementRepo};
pub use product_repo::ProductRepo;
pub use user_repo::UserRepo;
pub use warehouse_repo::WarehouseRepo;
