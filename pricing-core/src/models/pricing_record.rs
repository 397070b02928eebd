use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ItemizedInput, PricingInput, PricingMode, UnitCostInput};
use crate::calculations::{ItemizedBreakdown, UnitCostBreakdown};

/// A computed itemized calculation: the inputs, every intermediate value and
/// the moment it was created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemizedRecord {
    #[serde(flatten)]
    input: ItemizedInput,
    #[serde(flatten)]
    breakdown: ItemizedBreakdown,
    timestamp: DateTime<Utc>,
}

impl ItemizedRecord {
    pub(crate) fn new(
        input: ItemizedInput,
        breakdown: ItemizedBreakdown,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            input,
            breakdown,
            timestamp,
        }
    }

    pub fn input(&self) -> &ItemizedInput {
        &self.input
    }

    pub fn breakdown(&self) -> &ItemizedBreakdown {
        &self.breakdown
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// A computed per-unit calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitCostRecord {
    #[serde(flatten)]
    input: UnitCostInput,
    #[serde(flatten)]
    breakdown: UnitCostBreakdown,
    timestamp: DateTime<Utc>,
}

impl UnitCostRecord {
    pub(crate) fn new(
        input: UnitCostInput,
        breakdown: UnitCostBreakdown,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            input,
            breakdown,
            timestamp,
        }
    }

    pub fn input(&self) -> &UnitCostInput {
        &self.input
    }

    pub fn breakdown(&self) -> &UnitCostBreakdown {
        &self.breakdown
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// One entry of the pricing history.
///
/// Records are only produced by [`crate::PricingEngine`] and are never
/// mutated afterwards; all fields are read through accessors.
///
/// Serialized as a flat camelCase JSON object with a `"mode"` tag:
///
/// ```json
/// {"mode":"itemized","productName":"Chair","materialCost":"100", ...,
///  "totalPrice":"205.632","timestamp":"2026-10-18T12:00:00Z"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum PricingRecord {
    Itemized(ItemizedRecord),
    UnitCost(UnitCostRecord),
}

impl PricingRecord {
    pub fn mode(&self) -> PricingMode {
        match self {
            Self::Itemized(_) => PricingMode::Itemized,
            Self::UnitCost(_) => PricingMode::UnitCost,
        }
    }

    pub fn product_name(&self) -> &str {
        match self {
            Self::Itemized(record) => &record.input.product_name,
            Self::UnitCost(record) => &record.input.product_name,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::Itemized(record) => record.timestamp,
            Self::UnitCost(record) => record.timestamp,
        }
    }

    /// The headline figure: total price for itemized records, selling price
    /// per unit for unit-cost records.
    pub fn total(&self) -> Decimal {
        match self {
            Self::Itemized(record) => record.breakdown.total_price,
            Self::UnitCost(record) => record.breakdown.selling_price,
        }
    }

    /// Rebuilds the input the record was computed from.
    pub fn input(&self) -> PricingInput {
        match self {
            Self::Itemized(record) => PricingInput::Itemized(record.input.clone()),
            Self::UnitCost(record) => PricingInput::UnitCost(record.input.clone()),
        }
    }

    pub fn as_itemized(&self) -> Option<&ItemizedRecord> {
        match self {
            Self::Itemized(record) => Some(record),
            Self::UnitCost(_) => None,
        }
    }

    pub fn as_unit_cost(&self) -> Option<&UnitCostRecord> {
        match self {
            Self::UnitCost(record) => Some(record),
            Self::Itemized(_) => None,
        }
    }
}
