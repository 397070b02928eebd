use std::io::Write;

use super::{Report, ReportError, ReportRenderer};
use crate::calculations::common::round_half_up;

/// Renders a report as `label,amount` CSV rows, total last.
///
/// Amounts are rounded to cents and written without a currency symbol so
/// spreadsheets read them as numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CsvRenderer;

impl ReportRenderer for CsvRenderer {
    fn extension(&self) -> &'static str {
        "csv"
    }

    fn render(
        &self,
        report: &Report,
        out: &mut dyn Write,
    ) -> Result<(), ReportError> {
        let mut writer = csv::Writer::from_writer(out);
        writer.write_record(["label", "amount"])?;

        for line in report.lines.iter().chain(std::iter::once(&report.total)) {
            let amount = format!("{:.2}", round_half_up(line.amount));
            writer.write_record([line.label.as_str(), amount.as_str()])?;
        }

        writer.flush()?;
        Ok(())
    }
}
