use serde::Serialize;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize)]
pub enum AssetClass {
    Stocks,
    Bonds,
    Cash,
    #[serde(rename = "Real Estate")]
    RealEstate,
    Gold,
    Alternatives,
}

impl AssetClass {
    pub const COUNT: usize = 6;

    /// Canonical order. Rounding reconciliation and chart legends both walk
    /// classes in exactly this sequence.
    pub const ALL: [AssetClass; Self::COUNT] = [
        AssetClass::Stocks,
        AssetClass::Bonds,
        AssetClass::Cash,
        AssetClass::RealEstate,
        AssetClass::Gold,
        AssetClass::Alternatives,
    ];

    pub const fn index(self) -> usize {
        match self {
            AssetClass::Stocks => 0,
            AssetClass::Bonds => 1,
            AssetClass::Cash => 2,
            AssetClass::RealEstate => 3,
            AssetClass::Gold => 4,
            AssetClass::Alternatives => 5,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            AssetClass::Stocks => "Stocks",
            AssetClass::Bonds => "Bonds",
            AssetClass::Cash => "Cash",
            AssetClass::RealEstate => "Real Estate",
            AssetClass::Gold => "Gold",
            AssetClass::Alternatives => "Alternatives",
        }
    }

    /// Starting weight in percent before any profile adjustment.
    pub const fn baseline_weight(self) -> f64 {
        match self {
            AssetClass::Stocks => 60.0,
            AssetClass::Bonds => 25.0,
            AssetClass::Cash => 5.0,
            AssetClass::RealEstate => 5.0,
            AssetClass::Gold => 3.0,
            AssetClass::Alternatives => 2.0,
        }
    }

    /// Minimum weight kept before normalization.
    pub const fn floor_weight(self) -> f64 {
        match self {
            AssetClass::Stocks => 20.0,
            AssetClass::Bonds => 10.0,
            AssetClass::Cash => 3.0,
            AssetClass::RealEstate => 3.0,
            AssetClass::Gold => 2.0,
            AssetClass::Alternatives => 2.0,
        }
    }

    pub const fn display_color(self) -> &'static str {
        match self {
            AssetClass::Stocks => "#2563EB",
            AssetClass::Bonds => "#16A34A",
            AssetClass::Cash => "#64748B",
            AssetClass::RealEstate => "#EA580C",
            AssetClass::Gold => "#CA8A04",
            AssetClass::Alternatives => "#9333EA",
        }
    }
}

/// Caller-supplied investor inputs. Nothing here is range-checked: the
/// allocation engine accepts any integer and lets clamping absorb extremes.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct InvestorProfile {
    pub age: i32,
    pub risk_tolerance: i32,
    pub time_horizon: i32,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationEntry {
    pub asset_class: AssetClass,
    pub percentage: i32,
    pub display_color: &'static str,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AllocationResult {
    pub entries: [AllocationEntry; AssetClass::COUNT],
}

impl AllocationResult {
    pub fn total(&self) -> i32 {
        self.entries.iter().map(|entry| entry.percentage).sum()
    }

    pub fn percentage_of(&self, asset_class: AssetClass) -> i32 {
        self.entries[asset_class.index()].percentage
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SipInputs {
    pub monthly_investment: f64,
    /// Expected annual return as a fraction, e.g. 0.12.
    pub annual_return_rate: f64,
    pub years: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SipYearResult {
    pub year: u32,
    pub invested_amount: f64,
    pub total_value: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SipResult {
    pub invested_amount: f64,
    pub estimated_returns: f64,
    pub total_value: f64,
    pub yearly: Vec<SipYearResult>,
}
