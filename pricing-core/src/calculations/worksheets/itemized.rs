//! Itemized cost-plus worksheet.
//!
//! Builds a selling price from three cost components, then applies profit,
//! discount and tax in that order. Each step works on the result of the
//! previous one.
//!
//! # Worksheet Structure
//!
//! | Line | Description |
//! |------|-------------|
//! | 1    | Base cost (material + labor + overhead) |
//! | 2    | Profit (line 1 × profit %) |
//! | 3    | Price with profit (line 1 + line 2) |
//! | 4    | Discount (line 3 × discount %) |
//! | 5    | Price after discount (line 3 − line 4) |
//! | 6    | Tax (line 5 × tax %) |
//! | 7    | Total price (line 5 + line 6) |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use pricing_core::ItemizedInput;
//! use pricing_core::calculations::ItemizedWorksheet;
//!
//! let input = ItemizedInput {
//!     product_name: "Chair".to_string(),
//!     material_cost: dec!(100),
//!     labor_cost: dec!(50),
//!     overhead_expenses: dec!(20),
//!     profit_percentage: dec!(20),
//!     discount_percentage: dec!(10),
//!     tax_percentage: dec!(12),
//! };
//!
//! let result = ItemizedWorksheet::calculate(&input).unwrap();
//!
//! assert_eq!(result.base_cost, dec!(170));
//! assert_eq!(result.total_price, dec!(205.632));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ItemizedInput;
use crate::calculations::common::{CalculationError, add, percent, sub};

/// Every intermediate value of the itemized worksheet, unrounded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemizedBreakdown {
    /// Material + labor + overhead.
    pub base_cost: Decimal,

    /// Profit on the base cost.
    pub profit_amount: Decimal,

    /// Base cost plus profit.
    pub with_profit: Decimal,

    /// Discount taken off the price with profit.
    pub discount_amount: Decimal,

    /// Price with profit less the discount.
    pub after_discount: Decimal,

    /// Tax on the discounted price.
    pub tax_amount: Decimal,

    /// Final price charged.
    pub total_price: Decimal,
}

/// Calculator for the itemized worksheet.
#[derive(Debug, Clone, Copy, Default)]
pub struct ItemizedWorksheet;

impl ItemizedWorksheet {
    /// Runs every line of the worksheet.
    ///
    /// # Errors
    ///
    /// Returns [`CalculationError::Overflow`] naming the first line whose
    /// value does not fit in a [`Decimal`].
    pub fn calculate(input: &ItemizedInput) -> Result<ItemizedBreakdown, CalculationError> {
        let base_cost = Self::base_cost(
            input.material_cost,
            input.labor_cost,
            input.overhead_expenses,
        )?;
        let profit_amount = percent("profit", base_cost, input.profit_percentage)?;
        let with_profit = add("price with profit", base_cost, profit_amount)?;
        let discount_amount = percent("discount", with_profit, input.discount_percentage)?;
        let after_discount = sub("price after discount", with_profit, discount_amount)?;
        let tax_amount = percent("tax", after_discount, input.tax_percentage)?;
        let total_price = add("total price", after_discount, tax_amount)?;

        tracing::debug!(
            product = %input.product_name,
            %base_cost,
            %total_price,
            "itemized worksheet calculated"
        );

        Ok(ItemizedBreakdown {
            base_cost,
            profit_amount,
            with_profit,
            discount_amount,
            after_discount,
            tax_amount,
            total_price,
        })
    }

    fn base_cost(
        material: Decimal,
        labor: Decimal,
        overhead: Decimal,
    ) -> Result<Decimal, CalculationError> {
        let sum = add("base cost", material, labor)?;
        add("base cost", sum, overhead)
    }
}
