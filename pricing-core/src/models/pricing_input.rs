use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{PricingMode, TimeUnit};

/// Inputs for the itemized cost-plus-discount-plus-tax formula.
///
/// Percentages are whole-number percents (`20` means 20%).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemizedInput {
    pub product_name: String,
    pub material_cost: Decimal,
    pub labor_cost: Decimal,
    pub overhead_expenses: Decimal,
    pub profit_percentage: Decimal,
    pub discount_percentage: Decimal,
    pub tax_percentage: Decimal,
}

/// Inputs for the per-unit cost-plus formula.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitCostInput {
    pub product_name: String,
    pub fixed_costs: Decimal,
    pub variable_cost_per_unit: Decimal,
    /// Units produced per `time_unit`. May be fractional.
    pub units_produced: Decimal,
    pub markup_percentage: Decimal,
    #[serde(default)]
    pub time_unit: TimeUnit,
    #[serde(default, rename = "includeVAT")]
    pub include_vat: bool,
}

/// Validated input for one calculation, tagged by pricing mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum PricingInput {
    Itemized(ItemizedInput),
    UnitCost(UnitCostInput),
}

impl PricingInput {
    pub fn mode(&self) -> PricingMode {
        match self {
            Self::Itemized(_) => PricingMode::Itemized,
            Self::UnitCost(_) => PricingMode::UnitCost,
        }
    }

    pub fn product_name(&self) -> &str {
        match self {
            Self::Itemized(input) => &input.product_name,
            Self::UnitCost(input) => &input.product_name,
        }
    }
}

impl From<ItemizedInput> for PricingInput {
    fn from(input: ItemizedInput) -> Self {
        Self::Itemized(input)
    }
}

impl From<UnitCostInput> for PricingInput {
    fn from(input: UnitCostInput) -> Self {
        Self::UnitCost(input)
    }
}
