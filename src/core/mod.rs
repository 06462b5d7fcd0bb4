mod allocation;
mod risk;
mod sip;
mod types;

pub use allocation::compute_allocation;
pub use risk::{RiskProfile, risk_profile_label};
pub use sip::{
    MAX_MONTHLY_INVESTMENT, MAX_SIP_YEARS, run_sip_projection, validate_sip_inputs,
};
pub use types::{
    AllocationEntry, AllocationResult, AssetClass, InvestorProfile, SipInputs, SipResult,
    SipYearResult,
};
