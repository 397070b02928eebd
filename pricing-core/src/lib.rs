pub mod calculations;
pub mod engine;
pub mod form;
pub mod models;
pub mod preferences;
pub mod report;
pub mod store;

pub use calculations::CalculationError;
pub use engine::PricingEngine;
pub use form::{FormError, ParsePolicy, PricingForm};
pub use models::*;
pub use preferences::{Theme, ThemePreference};
pub use store::{HistoryError, HistoryStore, KeyValueStore, StoreError};
