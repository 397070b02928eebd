//! Printable breakdown of a single [`PricingRecord`].
//!
//! [`Report`] is the layout-independent content: labeled amounts plus a
//! highlighted total. A [`ReportRenderer`] turns it into a document.

mod csv_export;
mod text;

use std::io::{self, Write};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::calculations::VAT_RATE;
use crate::models::{ItemizedRecord, PricingMode, PricingRecord, UnitCostRecord};

pub use csv_export::CsvRenderer;
pub use text::TextRenderer;

pub const REPORT_TITLE: &str = "Smart Pricing System";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write report: {0}")]
    Io(#[from] io::Error),

    #[error("failed to write CSV report: {0}")]
    Csv(#[from] csv::Error),
}

/// One labeled amount of the breakdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    pub label: String,
    pub amount: Decimal,
    /// Subtotals are emphasized.
    pub emphasis: bool,
}

impl ReportLine {
    fn plain(
        label: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            label: label.into(),
            amount,
            emphasis: false,
        }
    }

    fn subtotal(
        label: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            label: label.into(),
            amount,
            emphasis: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub title: String,
    pub product_name: String,
    pub created_at: DateTime<Utc>,
    pub mode: PricingMode,
    /// Free-form facts that are not currency amounts.
    pub notes: Vec<String>,
    pub lines: Vec<ReportLine>,
    pub total: ReportLine,
}

impl From<&PricingRecord> for Report {
    fn from(record: &PricingRecord) -> Self {
        let (notes, lines, total) = match record {
            PricingRecord::Itemized(itemized) => itemized_lines(itemized),
            PricingRecord::UnitCost(unit) => unit_cost_lines(unit),
        };

        Self {
            title: REPORT_TITLE.to_string(),
            product_name: record.product_name().to_string(),
            created_at: record.timestamp(),
            mode: record.mode(),
            notes,
            lines,
            total,
        }
    }
}

fn percent_label(
    label: &str,
    percentage: Decimal,
) -> String {
    format!("{label} ({}%)", percentage.normalize())
}

fn itemized_lines(record: &ItemizedRecord) -> (Vec<String>, Vec<ReportLine>, ReportLine) {
    let input = record.input();
    let b = record.breakdown();

    let lines = vec![
        ReportLine::plain("Material Cost", input.material_cost),
        ReportLine::plain("Labor Cost", input.labor_cost),
        ReportLine::plain("Overhead Expenses", input.overhead_expenses),
        ReportLine::subtotal("Base Cost", b.base_cost),
        ReportLine::plain(percent_label("Profit", input.profit_percentage), b.profit_amount),
        ReportLine::subtotal("Price with Profit", b.with_profit),
        ReportLine::plain(
            percent_label("Discount", input.discount_percentage),
            -b.discount_amount,
        ),
        ReportLine::subtotal("Price after Discount", b.after_discount),
        ReportLine::plain(percent_label("Tax", input.tax_percentage), b.tax_amount),
    ];

    (
        Vec::new(),
        lines,
        ReportLine::subtotal("TOTAL PRICE", b.total_price),
    )
}

fn unit_cost_lines(record: &UnitCostRecord) -> (Vec<String>, Vec<ReportLine>, ReportLine) {
    let input = record.input();
    let b = record.breakdown();

    let notes = vec![
        format!(
            "Units produced: {} per {}",
            input.units_produced.normalize(),
            input.time_unit
        ),
        if input.include_vat {
            format!("VAT: included ({}%)", (VAT_RATE * Decimal::ONE_HUNDRED).normalize())
        } else {
            "VAT: not included".to_string()
        },
    ];

    let mut lines = vec![
        ReportLine::plain("Fixed Costs", input.fixed_costs),
        ReportLine::plain("Variable Cost per Unit", input.variable_cost_per_unit),
        ReportLine::plain("Fixed Cost per Unit", b.fixed_cost_per_unit),
        ReportLine::subtotal("Cost per Unit", b.cost_per_unit),
        ReportLine::plain(
            percent_label("Markup", input.markup_percentage),
            b.selling_price_raw - b.cost_per_unit,
        ),
    ];
    if input.include_vat {
        lines.push(ReportLine::subtotal("Price before VAT", b.selling_price_raw));
        lines.push(ReportLine::plain(
            percent_label("VAT", VAT_RATE * Decimal::ONE_HUNDRED),
            b.vat_amount,
        ));
    }
    lines.push(ReportLine::plain("Profit per Unit", b.profit_per_unit));

    (
        notes,
        lines,
        ReportLine::subtotal("SELLING PRICE", b.selling_price),
    )
}

/// Turns a [`Report`] into a document written to `out`.
pub trait ReportRenderer {
    /// File extension of the produced document, without the dot.
    fn extension(&self) -> &'static str;

    fn render(
        &self,
        report: &Report,
        out: &mut dyn Write,
    ) -> Result<(), ReportError>;
}

/// File name for an exported report: every character that is not an ASCII
/// letter or digit becomes `_`, followed by `_pricing.<extension>`.
///
/// ```
/// use pricing_core::report::report_file_name;
///
/// assert_eq!(report_file_name("Oak Chair #2", "txt"), "Oak_Chair__2_pricing.txt");
/// ```
pub fn report_file_name(
    product_name: &str,
    extension: &str,
) -> String {
    let stem: String = product_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{stem}_pricing.{extension}")
}
