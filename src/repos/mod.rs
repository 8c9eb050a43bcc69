pub mod catalog_repo;
pub mod error;
pub mod memory;
pub mod user_repo;

pub use catalog_repo::{CatalogStore, PgCatalogRepo};
pub use memory::{MemoryCatalogStore, MemoryUserStore};
pub use user_repo::{PgUserRepo, UserStore};
