use std::io::Write;

use super::{Report, ReportError, ReportLine, ReportRenderer};
use crate::calculations::common::format_currency;

const LABEL_WIDTH: usize = 30;
const AMOUNT_WIDTH: usize = 16;

/// Renders a report as aligned plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRenderer {
    currency_symbol: String,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new("$")
    }
}

impl TextRenderer {
    pub fn new(currency_symbol: impl Into<String>) -> Self {
        Self {
            currency_symbol: currency_symbol.into(),
        }
    }

    fn write_line(
        &self,
        out: &mut dyn Write,
        line: &ReportLine,
    ) -> Result<(), ReportError> {
        let label = format!("{}:", line.label);
        let amount = format_currency(&self.currency_symbol, line.amount);
        writeln!(
            out,
            "  {label:<lw$}{amount:>aw$}",
            lw = LABEL_WIDTH,
            aw = AMOUNT_WIDTH
        )?;
        Ok(())
    }
}

impl ReportRenderer for TextRenderer {
    fn extension(&self) -> &'static str {
        "txt"
    }

    fn render(
        &self,
        report: &Report,
        out: &mut dyn Write,
    ) -> Result<(), ReportError> {
        let width = LABEL_WIDTH + AMOUNT_WIDTH + 2;

        writeln!(out, "{}", report.title)?;
        writeln!(out, "{}", "=".repeat(report.title.chars().count()))?;
        writeln!(out, "Product: {}", report.product_name)?;
        writeln!(out, "Date:    {}", report.created_at.format("%Y-%m-%d %H:%M:%S UTC"))?;
        writeln!(out, "Mode:    {}", report.mode)?;
        for note in &report.notes {
            writeln!(out, "{note}")?;
        }
        writeln!(out, "{}", "-".repeat(width))?;
        writeln!(out, "Cost Breakdown:")?;

        for line in &report.lines {
            self.write_line(out, line)?;
            if line.emphasis {
                writeln!(out)?;
            }
        }

        writeln!(out, "{}", "=".repeat(width))?;
        self.write_line(out, &report.total)?;
        Ok(())
    }
}
