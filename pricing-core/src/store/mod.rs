pub mod backend;
pub mod factory;
pub mod history;
pub mod memory;

pub use backend::{KeyValueStore, StoreError};
pub use factory::{StoreConfig, StoreFactory, StoreRegistry};
pub use history::{HISTORY_KEY, HistoryError, HistoryStore};
pub use memory::{MemoryStore, MemoryStoreFactory};
