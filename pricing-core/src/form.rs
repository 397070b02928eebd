//! Raw form input and its conversion into a [`PricingInput`].
//!
//! Form fields arrive as strings. How bad values are handled depends on the
//! [`ParsePolicy`]: lenient parsing turns anything unreadable into zero,
//! strict parsing reports every offending field.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{ItemizedInput, PricingInput, PricingMode, TimeUnit, UnitCostInput};

/// Error returned when a string cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
#[error("invalid decimal '{input}': {source}")]
pub struct ParseDecimalError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

/// Normalizes input for decimal parsing: trims whitespace and removes commas (thousands separator).
fn normalize_decimal_input(s: &str) -> String {
    s.trim().replace(',', "")
}

/// Parses a string into a [`Decimal`].
///
/// Handles comma as thousands separator (e.g. `"1,234.56"`).
/// Empty or whitespace-only input is treated as 0.
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseDecimalError> {
    let normalized = normalize_decimal_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized
        .parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(&normalized))
        .map_err(|source| ParseDecimalError {
            input: s.to_string(),
            source,
        })
}

/// Parses a string into a [`Decimal`], falling back to zero.
///
/// Logs a warning when non-empty input had to be discarded.
pub fn parse_decimal_or_zero(s: &str) -> Decimal {
    parse_decimal(s).unwrap_or_else(|e| {
        tracing::warn!(input = %s, "coercing unparseable number to 0: {}", e);
        Decimal::ZERO
    })
}

/// How a form treats values it cannot use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParsePolicy {
    /// Unparseable numbers become 0 and an empty product name is accepted.
    #[default]
    Lenient,
    /// Unparseable or negative numbers and an empty product name are errors.
    Strict,
}

/// A single rejected form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub reason: String,
}

impl fmt::Display for FieldError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// All field errors found while parsing a form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} invalid field(s): {}", .0.len(), join_errors(.0))]
pub struct FormError(pub Vec<FieldError>);

impl FormError {
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn has_field(
        &self,
        field: &str,
    ) -> bool {
        self.0.iter().any(|e| e.field == field)
    }
}

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Collects field values and errors while a form is parsed.
struct FieldParser {
    policy: ParsePolicy,
    errors: Vec<FieldError>,
}

impl FieldParser {
    fn new(policy: ParsePolicy) -> Self {
        Self {
            policy,
            errors: Vec::new(),
        }
    }

    fn name(
        &mut self,
        field: &'static str,
        value: &str,
    ) -> String {
        let trimmed = value.trim();
        if trimmed.is_empty() && self.policy == ParsePolicy::Strict {
            self.errors.push(FieldError {
                field,
                reason: "is required".to_string(),
            });
        }
        trimmed.to_string()
    }

    fn amount(
        &mut self,
        field: &'static str,
        value: &str,
    ) -> Decimal {
        match self.policy {
            ParsePolicy::Lenient => parse_decimal_or_zero(value),
            ParsePolicy::Strict => match parse_decimal(value) {
                Ok(v) if v.is_sign_negative() && !v.is_zero() => {
                    self.errors.push(FieldError {
                        field,
                        reason: "must not be negative".to_string(),
                    });
                    Decimal::ZERO
                }
                Ok(v) => v,
                Err(_) => {
                    self.errors.push(FieldError {
                        field,
                        reason: "must be a valid number".to_string(),
                    });
                    Decimal::ZERO
                }
            },
        }
    }

    fn finish<T>(
        self,
        value: T,
    ) -> Result<T, FormError> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(FormError(self.errors))
        }
    }
}

/// String fields of the itemized calculator form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemizedForm {
    pub product_name: String,
    pub material_cost: String,
    pub labor_cost: String,
    pub overhead_expenses: String,
    pub profit_percentage: String,
    pub discount_percentage: String,
    pub tax_percentage: String,
}

impl ItemizedForm {
    pub fn parse(
        &self,
        policy: ParsePolicy,
    ) -> Result<ItemizedInput, FormError> {
        let mut p = FieldParser::new(policy);

        let input = ItemizedInput {
            product_name: p.name("product name", &self.product_name),
            material_cost: p.amount("material cost", &self.material_cost),
            labor_cost: p.amount("labor cost", &self.labor_cost),
            overhead_expenses: p.amount("overhead expenses", &self.overhead_expenses),
            profit_percentage: p.amount("profit percentage", &self.profit_percentage),
            discount_percentage: p.amount("discount percentage", &self.discount_percentage),
            tax_percentage: p.amount("tax percentage", &self.tax_percentage),
        };

        p.finish(input)
    }
}

/// String fields of the per-unit calculator form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitCostForm {
    pub product_name: String,
    pub fixed_costs: String,
    pub variable_cost_per_unit: String,
    pub units_produced: String,
    pub markup_percentage: String,
    pub time_unit: TimeUnit,
    pub include_vat: bool,
}

impl UnitCostForm {
    pub fn parse(
        &self,
        policy: ParsePolicy,
    ) -> Result<UnitCostInput, FormError> {
        let mut p = FieldParser::new(policy);

        let input = UnitCostInput {
            product_name: p.name("product name", &self.product_name),
            fixed_costs: p.amount("fixed costs", &self.fixed_costs),
            variable_cost_per_unit: p.amount(
                "variable cost per unit",
                &self.variable_cost_per_unit,
            ),
            units_produced: p.amount("units produced", &self.units_produced),
            markup_percentage: p.amount("markup percentage", &self.markup_percentage),
            time_unit: self.time_unit,
            include_vat: self.include_vat,
        };

        p.finish(input)
    }
}

/// The calculator form in either pricing mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PricingForm {
    Itemized(ItemizedForm),
    UnitCost(UnitCostForm),
}

impl Default for PricingForm {
    fn default() -> Self {
        Self::empty(PricingMode::default())
    }
}

impl PricingForm {
    /// A blank form for `mode`.
    pub fn empty(mode: PricingMode) -> Self {
        match mode {
            PricingMode::Itemized => Self::Itemized(ItemizedForm::default()),
            PricingMode::UnitCost => Self::UnitCost(UnitCostForm::default()),
        }
    }

    pub fn mode(&self) -> PricingMode {
        match self {
            Self::Itemized(_) => PricingMode::Itemized,
            Self::UnitCost(_) => PricingMode::UnitCost,
        }
    }

    pub fn parse(
        &self,
        policy: ParsePolicy,
    ) -> Result<PricingInput, FormError> {
        match self {
            Self::Itemized(form) => form.parse(policy).map(PricingInput::Itemized),
            Self::UnitCost(form) => form.parse(policy).map(PricingInput::UnitCost),
        }
    }
}
