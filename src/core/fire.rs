use super::cancel::{CancellationToken, Cancelled};
use super::types::{FireInputs, FireResult, PortfolioPoint, YearsToFi};

/// Hard cap on simulated years so runs terminate when growth can never
/// reach the FI number.
pub const MAX_FIRE_YEARS: u32 = 100;

pub fn run_fire(inputs: &FireInputs) -> FireResult {
    match run_fire_cancellable(inputs, &CancellationToken::new()) {
        Ok(result) => result,
        Err(Cancelled) => unreachable!("a fresh token is never cancelled"),
    }
}

pub fn run_fire_cancellable(
    inputs: &FireInputs,
    token: &CancellationToken,
) -> Result<FireResult, Cancelled> {
    let fi = fi_number(inputs.annual_spend, inputs.withdrawal_rate_pct);
    let real_return = real_return(inputs.annual_return_pct, inputs.inflation_pct);
    let annual_investment = inputs.monthly_investment * 12.0;

    let mut portfolio = inputs.current_portfolio;
    let mut years = 0;
    let mut projection_series = Vec::with_capacity(MAX_FIRE_YEARS as usize + 1);
    projection_series.push(PortfolioPoint {
        year: 0,
        portfolio_value: portfolio,
    });

    let reached = |portfolio: f64| fi.is_finite() && portfolio >= fi;
    while !reached(portfolio) && years < MAX_FIRE_YEARS {
        token.check()?;
        portfolio = portfolio * (1.0 + real_return) + annual_investment;
        years += 1;
        projection_series.push(PortfolioPoint {
            year: years,
            portfolio_value: portfolio,
        });
    }

    let years_to_fi = if reached(portfolio) {
        YearsToFi::Reached(years)
    } else {
        YearsToFi::Unreachable
    };
    tracing::debug!(
        fi_number = fi,
        real_return,
        years_to_fi = ?years_to_fi,
        "fire run complete"
    );

    Ok(FireResult {
        fi_number: fi,
        years_to_fi,
        withdrawal_at_fi: withdrawal_at_fi(fi, inputs.withdrawal_rate_pct),
        real_return_pct: real_return * 100.0,
        projection_series,
    })
}

pub fn fi_number(annual_spend: f64, withdrawal_rate_pct: f64) -> f64 {
    if withdrawal_rate_pct <= 0.0 {
        return f64::INFINITY;
    }
    annual_spend / (withdrawal_rate_pct / 100.0)
}

pub fn real_return(annual_return_pct: f64, inflation_pct: f64) -> f64 {
    (1.0 + annual_return_pct / 100.0) / (1.0 + inflation_pct / 100.0) - 1.0
}

fn withdrawal_at_fi(fi: f64, withdrawal_rate_pct: f64) -> f64 {
    if !fi.is_finite() {
        return f64::INFINITY;
    }
    fi * withdrawal_rate_pct / 100.0
}
