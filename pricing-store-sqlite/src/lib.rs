//! SQLite backend for the pricing key-value store.

pub mod factory;
pub mod store;

pub use factory::SqliteStoreFactory;
pub use store::SqliteStore;
