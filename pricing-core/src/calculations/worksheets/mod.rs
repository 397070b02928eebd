//! Pricing worksheet implementations.
//!
//! One worksheet per pricing mode. Each takes a typed input and returns a
//! breakdown holding every intermediate value.

pub mod itemized;
pub mod unit_cost;

pub use itemized::{ItemizedBreakdown, ItemizedWorksheet};
pub use unit_cost::{UnitCostBreakdown, UnitCostWorksheet, VAT_RATE};
