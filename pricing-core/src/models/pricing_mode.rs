use std::fmt;

use serde::{Deserialize, Serialize};

/// Which formula a calculation runs through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PricingMode {
    /// Material, labor and overhead plus profit, less discount, plus tax.
    #[default]
    Itemized,
    /// Fixed costs spread over production plus a per-unit variable cost and markup.
    UnitCost,
}

impl PricingMode {
    pub fn all() -> &'static [PricingMode] {
        &[PricingMode::Itemized, PricingMode::UnitCost]
    }

    /// Tag used in serialized records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Itemized => "itemized",
            Self::UnitCost => "unitCost",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Itemized => "Itemized cost-plus",
            Self::UnitCost => "Per-unit cost-plus",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "itemized" => Some(Self::Itemized),
            "unit" | "unitcost" | "unit-cost" => Some(Self::UnitCost),
            _ => None,
        }
    }
}

impl fmt::Display for PricingMode {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Production period the unit count refers to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Day,
    Week,
    #[default]
    Month,
}

impl TimeUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" | "daily" => Some(Self::Day),
            "week" | "weekly" => Some(Self::Week),
            "month" | "monthly" => Some(Self::Month),
            _ => None,
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
