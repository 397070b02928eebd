mod pricing_input;
mod pricing_mode;
mod pricing_record;

pub use pricing_input::{ItemizedInput, PricingInput, UnitCostInput};
pub use pricing_mode::{PricingMode, TimeUnit};
pub use pricing_record::{ItemizedRecord, PricingRecord, UnitCostRecord};

/// Ordered pricing history, newest first.
pub type HistoryList = Vec<PricingRecord>;
