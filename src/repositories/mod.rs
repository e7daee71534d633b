// Re-export repository types
pub use self::catalog_repository::*;
pub use self::session_store::*;

mod catalog_repository;
pub mod seed;
mod session_store;
