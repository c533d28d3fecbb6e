mod connection;
mod pg_repository;
mod repository;

pub use connection::{check_health, create_pool};
pub use pg_repository::PgRepository;
pub use repository::{CartRepository, CatalogRepository, OrderRepository};
