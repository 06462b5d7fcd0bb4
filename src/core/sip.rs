use super::types::{SipInputs, SipResult, SipYearResult};
use crate::error::InputError;

pub const MAX_SIP_YEARS: u32 = 60;

/// Largest accepted monthly contribution. At the top rate and horizon the
/// projection stays many orders of magnitude below `f64::MAX`.
pub const MAX_MONTHLY_INVESTMENT: f64 = 1e12;

pub fn validate_sip_inputs(inputs: SipInputs) -> Result<SipInputs, InputError> {
    if !inputs.monthly_investment.is_finite() {
        return Err(InputError::NotFinite {
            field: "monthlyInvestment",
        });
    }
    if inputs.monthly_investment < 0.0 {
        return Err(InputError::Invalid {
            field: "monthlyInvestment",
            reason: "must be >= 0",
        });
    }
    if inputs.monthly_investment > MAX_MONTHLY_INVESTMENT {
        return Err(InputError::Invalid {
            field: "monthlyInvestment",
            reason: "must be <= 1e12",
        });
    }
    if !inputs.annual_return_rate.is_finite() {
        return Err(InputError::NotFinite {
            field: "expectedReturn",
        });
    }
    if inputs.annual_return_rate <= -1.0 || inputs.annual_return_rate > 1.0 {
        return Err(InputError::Invalid {
            field: "expectedReturn",
            reason: "must be > -100 and <= 100 percent",
        });
    }
    if !(1..=MAX_SIP_YEARS).contains(&inputs.years) {
        return Err(InputError::Invalid {
            field: "years",
            reason: "must be between 1 and 60",
        });
    }
    Ok(inputs)
}

/// Projects a monthly contribution paid at the start of every month and
/// compounded monthly at `annual_return_rate / 12`.
pub fn run_sip_projection(inputs: &SipInputs) -> SipResult {
    let yearly: Vec<SipYearResult> = (1..=inputs.years)
        .map(|year| {
            let months = year * 12;
            SipYearResult {
                year,
                invested_amount: inputs.monthly_investment * f64::from(months),
                total_value: future_value(
                    inputs.monthly_investment,
                    inputs.annual_return_rate,
                    months,
                ),
            }
        })
        .collect();

    let months = inputs.years * 12;
    let invested_amount = inputs.monthly_investment * f64::from(months);
    let total_value = future_value(inputs.monthly_investment, inputs.annual_return_rate, months);

    tracing::debug!(
        monthly_investment = inputs.monthly_investment,
        annual_return_rate = inputs.annual_return_rate,
        years = inputs.years,
        total_value,
        "computed sip projection"
    );

    SipResult {
        invested_amount,
        estimated_returns: total_value - invested_amount,
        total_value,
        yearly,
    }
}

fn future_value(monthly_investment: f64, annual_return_rate: f64, months: u32) -> f64 {
    let monthly_rate = annual_return_rate / 12.0;
    if monthly_rate == 0.0 {
        return monthly_investment * f64::from(months);
    }
    let growth = (1.0 + monthly_rate).powf(f64::from(months));
    monthly_investment * (growth - 1.0) / monthly_rate * (1.0 + monthly_rate)
}
