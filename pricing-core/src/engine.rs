//! Turns a validated [`PricingInput`] into an immutable [`PricingRecord`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::calculations::{CalculationError, ItemizedWorksheet, UnitCostWorksheet, VAT_RATE};
use crate::models::{ItemizedRecord, PricingInput, PricingRecord, UnitCostRecord};

/// Stateless pricing engine dispatching on the input's pricing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingEngine {
    unit_cost: UnitCostWorksheet,
}

impl Default for PricingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl PricingEngine {
    /// Engine using the fixed 12% VAT rate.
    pub fn new() -> Self {
        Self {
            unit_cost: UnitCostWorksheet::new(VAT_RATE),
        }
    }

    pub fn vat_rate(&self) -> Decimal {
        self.unit_cost.vat_rate()
    }

    /// Computes a record stamped with the current time.
    ///
    /// # Errors
    ///
    /// See [`compute_at`](Self::compute_at).
    pub fn compute(
        &self,
        input: &PricingInput,
    ) -> Result<PricingRecord, CalculationError> {
        self.compute_at(input, Utc::now())
    }

    /// Computes a record stamped with `timestamp`.
    ///
    /// # Errors
    ///
    /// Returns [`CalculationError::Overflow`] when an intermediate value
    /// does not fit in a [`Decimal`].
    pub fn compute_at(
        &self,
        input: &PricingInput,
        timestamp: DateTime<Utc>,
    ) -> Result<PricingRecord, CalculationError> {
        let record = match input {
            PricingInput::Itemized(itemized) => {
                let breakdown = ItemizedWorksheet::calculate(itemized)?;
                PricingRecord::Itemized(ItemizedRecord::new(itemized.clone(), breakdown, timestamp))
            }
            PricingInput::UnitCost(unit) => {
                let breakdown = self.unit_cost.calculate(unit)?;
                PricingRecord::UnitCost(UnitCostRecord::new(unit.clone(), breakdown, timestamp))
            }
        };
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::{ItemizedInput, PricingMode, TimeUnit, UnitCostInput};

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap()
    }

    #[test]
    fn itemized_input_produces_itemized_record() {
        let input = PricingInput::Itemized(ItemizedInput {
            product_name: "Table".to_string(),
            material_cost: dec!(100),
            labor_cost: dec!(50),
            overhead_expenses: dec!(20),
            profit_percentage: dec!(20),
            discount_percentage: dec!(10),
            tax_percentage: dec!(12),
        });

        let record = PricingEngine::new().compute_at(&input, at()).unwrap();

        assert_eq!(record.mode(), PricingMode::Itemized);
        assert_eq!(record.product_name(), "Table");
        assert_eq!(record.timestamp(), at());
        assert_eq!(record.total(), dec!(205.632));

        let itemized = record.as_itemized().unwrap();
        assert_eq!(itemized.breakdown().after_discount, dec!(183.6));
        assert_eq!(itemized.input().tax_percentage, dec!(12));
    }

    #[test]
    fn unit_cost_input_produces_unit_cost_record() {
        let input = PricingInput::UnitCost(UnitCostInput {
            product_name: "Soap".to_string(),
            fixed_costs: dec!(0),
            variable_cost_per_unit: dec!(10),
            units_produced: dec!(0),
            markup_percentage: dec!(100),
            time_unit: TimeUnit::Day,
            include_vat: true,
        });

        let record = PricingEngine::new().compute_at(&input, at()).unwrap();

        assert_eq!(record.mode(), PricingMode::UnitCost);
        assert_eq!(record.total(), dec!(22.4));
        assert_eq!(record.as_unit_cost().unwrap().breakdown().vat_amount, dec!(2.4));
    }

    #[test]
    fn compute_is_deterministic_for_same_timestamp() {
        let input = PricingInput::Itemized(ItemizedInput::default());
        let engine = PricingEngine::default();

        assert_eq!(engine.compute_at(&input, at()), engine.compute_at(&input, at()));
    }

    #[test]
    fn compute_stamps_current_time() {
        let before = Utc::now();
        let record = PricingEngine::new()
            .compute(&PricingInput::Itemized(ItemizedInput::default()))
            .unwrap();
        let after = Utc::now();

        assert!(record.timestamp() >= before && record.timestamp() <= after);
    }

    #[test]
    fn overflowing_input_is_an_error_not_a_record() {
        let input = PricingInput::Itemized(ItemizedInput {
            product_name: "Yacht".to_string(),
            material_cost: dec!(50000000000000000000000000000),
            labor_cost: dec!(50000000000000000000000000000),
            ..ItemizedInput::default()
        });

        let result = PricingEngine::new().compute_at(&input, at());

        assert_eq!(result, Err(CalculationError::Overflow("base cost")));
    }

    #[test]
    fn unit_division_overflow_is_an_error() {
        let input = PricingInput::UnitCost(UnitCostInput {
            fixed_costs: dec!(1000000),
            units_produced: dec!(0.0000000000000000000000001),
            ..UnitCostInput::default()
        });

        let err = PricingEngine::new().compute(&input).unwrap_err();

        assert_eq!(err.to_string(), "fixed cost per unit is too large to calculate");
    }

    #[test]
    fn engine_uses_fixed_vat_rate() {
        assert_eq!(PricingEngine::new().vat_rate(), dec!(0.12));
    }
}
