use serde::Serialize;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub enum RiskProfile {
    Conservative,
    #[serde(rename = "Moderately Conservative")]
    ModeratelyConservative,
    Moderate,
    #[serde(rename = "Moderately Aggressive")]
    ModeratelyAggressive,
    Aggressive,
}

impl RiskProfile {
    /// Maps the 1-5 tolerance scale onto a profile. Anything off the scale
    /// reads as `Moderate`.
    pub const fn from_tolerance(risk_tolerance: i32) -> Self {
        match risk_tolerance {
            1 => RiskProfile::Conservative,
            2 => RiskProfile::ModeratelyConservative,
            4 => RiskProfile::ModeratelyAggressive,
            5 => RiskProfile::Aggressive,
            _ => RiskProfile::Moderate,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            RiskProfile::Conservative => "Conservative",
            RiskProfile::ModeratelyConservative => "Moderately Conservative",
            RiskProfile::Moderate => "Moderate",
            RiskProfile::ModeratelyAggressive => "Moderately Aggressive",
            RiskProfile::Aggressive => "Aggressive",
        }
    }
}

pub fn risk_profile_label(risk_tolerance: i32) -> &'static str {
    RiskProfile::from_tolerance(risk_tolerance).label()
}
