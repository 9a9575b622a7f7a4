pub mod entity;
pub mod page;
pub mod pool;
pub mod query;
pub mod repos;
pub mod unit_of_work;

// Re-export commonly used items
pub use entity::Entity;
pub use page::to_paged_list;
pub use pool::{create_pool, run_migrations};
pub use query::EntityQuery;
pub use repos::account::{AccountRepo, AccountRow};
pub use repos::category::{Category, CategoryRepository, CategoryWithProducts};
pub use repos::product::{Product, ProductRepository};
pub use unit_of_work::UnitOfWork;
