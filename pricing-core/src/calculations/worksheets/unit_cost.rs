//! Per-unit cost-plus worksheet.
//!
//! Spreads fixed costs over the units produced in a period, adds the
//! variable cost of one unit, applies the markup and optionally VAT.
//!
//! # Worksheet Structure
//!
//! | Line | Description |
//! |------|-------------|
//! | 1    | Fixed cost per unit (fixed costs ÷ units, 0 when no units) |
//! | 2    | Cost per unit (line 1 + variable cost per unit) |
//! | 3    | Selling price before VAT (line 2 + line 2 × markup %) |
//! | 4    | Selling price (line 3 × 1.12 when VAT is included) |
//! | 5    | VAT per unit (line 4 − line 3) |
//! | 6    | Profit per unit (line 4 − line 2) |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use pricing_core::{TimeUnit, UnitCostInput};
//! use pricing_core::calculations::UnitCostWorksheet;
//! use pricing_core::calculations::common::round_half_up;
//!
//! let input = UnitCostInput {
//!     product_name: "Candle".to_string(),
//!     fixed_costs: dec!(11000),
//!     variable_cost_per_unit: dec!(35),
//!     units_produced: dec!(700),
//!     markup_percentage: dec!(50),
//!     time_unit: TimeUnit::Month,
//!     include_vat: false,
//! };
//!
//! let result = UnitCostWorksheet::default().calculate(&input).unwrap();
//!
//! assert_eq!(round_half_up(result.selling_price), dec!(76.07));
//! assert_eq!(round_half_up(result.profit_per_unit), dec!(25.36));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::UnitCostInput;
use crate::calculations::common::{CalculationError, add, percent, sub};

/// Flat VAT rate applied when `include_vat` is set (12%).
pub const VAT_RATE: Decimal = Decimal::from_parts(12, 0, 0, false, 2);

/// Every intermediate value of the per-unit worksheet, unrounded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitCostBreakdown {
    pub fixed_cost_per_unit: Decimal,
    pub cost_per_unit: Decimal,
    /// Selling price before VAT.
    pub selling_price_raw: Decimal,
    pub selling_price: Decimal,
    /// VAT included in the selling price; zero when VAT is not applied.
    #[serde(default)]
    pub vat_amount: Decimal,
    pub profit_per_unit: Decimal,
}

/// Calculator for the per-unit worksheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitCostWorksheet {
    vat_rate: Decimal,
}

impl Default for UnitCostWorksheet {
    fn default() -> Self {
        Self::new(VAT_RATE)
    }
}

impl UnitCostWorksheet {
    /// Creates a worksheet that applies `vat_rate` (a fraction, `0.12` for 12%)
    /// when the input asks for VAT.
    pub fn new(vat_rate: Decimal) -> Self {
        Self { vat_rate }
    }

    pub fn vat_rate(&self) -> Decimal {
        self.vat_rate
    }

    /// Runs every line of the worksheet.
    ///
    /// # Errors
    ///
    /// Returns [`CalculationError::Overflow`] naming the first line whose
    /// value does not fit in a [`Decimal`], e.g. large fixed costs spread
    /// over a tiny fraction of a unit.
    pub fn calculate(
        &self,
        input: &UnitCostInput,
    ) -> Result<UnitCostBreakdown, CalculationError> {
        let fixed_cost_per_unit =
            self.fixed_cost_per_unit(input.fixed_costs, input.units_produced)?;
        let cost_per_unit = add(
            "cost per unit",
            fixed_cost_per_unit,
            input.variable_cost_per_unit,
        )?;
        let markup = percent("markup", cost_per_unit, input.markup_percentage)?;
        let selling_price_raw = add("selling price", cost_per_unit, markup)?;
        let selling_price = self.apply_vat(selling_price_raw, input.include_vat)?;
        let vat_amount = sub("VAT", selling_price, selling_price_raw)?;
        let profit_per_unit = sub("profit per unit", selling_price, cost_per_unit)?;

        tracing::debug!(
            product = %input.product_name,
            %cost_per_unit,
            %selling_price,
            include_vat = input.include_vat,
            "unit cost worksheet calculated"
        );

        Ok(UnitCostBreakdown {
            fixed_cost_per_unit,
            cost_per_unit,
            selling_price_raw,
            selling_price,
            vat_amount,
            profit_per_unit,
        })
    }

    /// Fixed costs divided by units produced, or zero when nothing is produced.
    fn fixed_cost_per_unit(
        &self,
        fixed_costs: Decimal,
        units_produced: Decimal,
    ) -> Result<Decimal, CalculationError> {
        if units_produced > Decimal::ZERO {
            fixed_costs
                .checked_div(units_produced)
                .ok_or(CalculationError::Overflow("fixed cost per unit"))
        } else {
            Ok(Decimal::ZERO)
        }
    }

    fn apply_vat(
        &self,
        price: Decimal,
        include_vat: bool,
    ) -> Result<Decimal, CalculationError> {
        if !include_vat {
            return Ok(price);
        }
        Decimal::ONE
            .checked_add(self.vat_rate)
            .and_then(|factor| price.checked_mul(factor))
            .ok_or(CalculationError::Overflow("selling price with VAT"))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::TimeUnit;
    use crate::calculations::common::round_half_up;

    fn test_input() -> UnitCostInput {
        UnitCostInput {
            product_name: "Candle".to_string(),
            fixed_costs: dec!(11000),
            variable_cost_per_unit: dec!(35),
            units_produced: dec!(700),
            markup_percentage: dec!(50),
            time_unit: TimeUnit::Month,
            include_vat: false,
        }
    }

    #[test]
    fn vat_rate_constant_is_twelve_percent() {
        assert_eq!(VAT_RATE, dec!(0.12));
        assert_eq!(UnitCostWorksheet::default().vat_rate(), dec!(0.12));
    }

    // =========================================================================
    // full worksheet
    // =========================================================================

    #[test]
    fn calculate_matches_reference_example() {
        let result = UnitCostWorksheet::default().calculate(&test_input()).unwrap();

        assert_eq!(round_half_up(result.fixed_cost_per_unit), dec!(15.71));
        assert_eq!(round_half_up(result.cost_per_unit), dec!(50.71));
        assert_eq!(round_half_up(result.selling_price), dec!(76.07));
        assert_eq!(round_half_up(result.profit_per_unit), dec!(25.36));
        assert_eq!(result.selling_price, result.selling_price_raw);
        assert_eq!(result.vat_amount, dec!(0));
    }

    #[test]
    fn intermediates_are_not_rounded() {
        let result = UnitCostWorksheet::default().calculate(&test_input()).unwrap();

        assert!(result.fixed_cost_per_unit.scale() > 2);
        assert!(result.fixed_cost_per_unit > dec!(15.714285));
        assert!(result.fixed_cost_per_unit < dec!(15.714286));
    }

    #[test]
    fn exact_division_keeps_simple_values() {
        let input = UnitCostInput {
            fixed_costs: dec!(1000),
            variable_cost_per_unit: dec!(5),
            units_produced: dec!(100),
            markup_percentage: dec!(20),
            ..test_input()
        };

        let result = UnitCostWorksheet::default().calculate(&input).unwrap();

        assert_eq!(result.fixed_cost_per_unit, dec!(10));
        assert_eq!(result.cost_per_unit, dec!(15));
        assert_eq!(result.selling_price, dec!(18));
        assert_eq!(result.profit_per_unit, dec!(3));
    }

    // =========================================================================
    // units produced
    // =========================================================================

    #[test]
    fn zero_units_yields_zero_fixed_cost_per_unit() {
        let input = UnitCostInput {
            units_produced: dec!(0),
            ..test_input()
        };

        let result = UnitCostWorksheet::default().calculate(&input).unwrap();

        assert_eq!(result.fixed_cost_per_unit, dec!(0));
        assert_eq!(result.cost_per_unit, dec!(35));
        assert_eq!(result.selling_price, dec!(52.5));
    }

    #[test]
    fn negative_units_are_treated_like_zero() {
        let input = UnitCostInput {
            units_produced: dec!(-5),
            ..test_input()
        };

        let result = UnitCostWorksheet::default().calculate(&input).unwrap();

        assert_eq!(result.fixed_cost_per_unit, dec!(0));
    }

    #[test]
    fn fractional_units_are_accepted() {
        let input = UnitCostInput {
            fixed_costs: dec!(10),
            units_produced: dec!(2.5),
            variable_cost_per_unit: dec!(0),
            markup_percentage: dec!(0),
            ..test_input()
        };

        let result = UnitCostWorksheet::default().calculate(&input).unwrap();

        assert_eq!(result.fixed_cost_per_unit, dec!(4));
    }

    // =========================================================================
    // VAT
    // =========================================================================

    #[test]
    fn vat_multiplies_raw_price_by_one_point_one_two() {
        let input = UnitCostInput {
            include_vat: true,
            ..test_input()
        };

        let result = UnitCostWorksheet::default().calculate(&input).unwrap();

        assert_eq!(result.selling_price, result.selling_price_raw * dec!(1.12));
        assert_eq!(
            result.vat_amount,
            result.selling_price - result.selling_price_raw
        );
        assert_eq!(
            result.profit_per_unit,
            result.selling_price - result.cost_per_unit
        );
    }

    #[test]
    fn vat_on_round_price() {
        let input = UnitCostInput {
            fixed_costs: dec!(0),
            variable_cost_per_unit: dec!(100),
            units_produced: dec!(1),
            markup_percentage: dec!(0),
            include_vat: true,
            ..test_input()
        };

        let result = UnitCostWorksheet::default().calculate(&input).unwrap();

        assert_eq!(result.selling_price, dec!(112));
        assert_eq!(result.vat_amount, dec!(12));
        assert_eq!(result.profit_per_unit, dec!(12));
    }

    #[test]
    fn custom_vat_rate_is_honoured() {
        let input = UnitCostInput {
            fixed_costs: dec!(0),
            variable_cost_per_unit: dec!(100),
            units_produced: dec!(1),
            markup_percentage: dec!(0),
            include_vat: true,
            ..test_input()
        };

        let result = UnitCostWorksheet::new(dec!(0.2)).calculate(&input).unwrap();

        assert_eq!(result.selling_price, dec!(120));
    }

    // =========================================================================
    // overflow
    // =========================================================================

    #[test]
    fn tiny_unit_count_overflows_fixed_cost_per_unit() {
        let input = UnitCostInput {
            fixed_costs: dec!(1000000),
            units_produced: dec!(0.0000000000000000000000001),
            ..test_input()
        };

        let result = UnitCostWorksheet::default().calculate(&input);

        assert_eq!(result, Err(CalculationError::Overflow("fixed cost per unit")));
    }

    #[test]
    fn vat_on_maximum_price_overflows() {
        let input = UnitCostInput {
            fixed_costs: dec!(0),
            variable_cost_per_unit: Decimal::MAX,
            markup_percentage: dec!(0),
            include_vat: true,
            ..test_input()
        };

        let result = UnitCostWorksheet::default().calculate(&input);

        assert_eq!(result, Err(CalculationError::Overflow("selling price with VAT")));
    }
}
