//! Pricing calculations.
//!
//! This module provides the worksheet logic for both pricing modes and the
//! shared helpers they use.

pub mod common;
pub mod worksheets;

pub use common::CalculationError;
pub use worksheets::{
    ItemizedBreakdown, ItemizedWorksheet, UnitCostBreakdown, UnitCostWorksheet, VAT_RATE,
};
