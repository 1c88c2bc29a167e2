use super::cancel::{CancellationToken, Cancelled};
use super::types::{ProjectionInput, ProjectionPoint, ProjectionResult};

#[derive(Debug, Clone, Copy)]
struct ScenarioTotals {
    expected: f64,
    best: f64,
    worst: f64,
}

impl ScenarioTotals {
    fn emit(self, year: u32) -> ProjectionPoint {
        ProjectionPoint {
            year,
            projected_value: round_currency(self.expected),
            best_case: round_currency(self.best),
            worst_case: round_currency(self.worst),
        }
    }
}

pub fn run_projection(input: &ProjectionInput) -> ProjectionResult {
    match run_projection_cancellable(input, &CancellationToken::new()) {
        Ok(result) => result,
        Err(Cancelled) => unreachable!("a fresh token is never cancelled"),
    }
}

pub fn run_projection_cancellable(
    input: &ProjectionInput,
    token: &CancellationToken,
) -> Result<ProjectionResult, Cancelled> {
    let rates = input.risk_profile.rates();
    let annual_contribution = input.monthly_contribution * 12.0;

    let mut totals = ScenarioTotals {
        expected: input.initial_value,
        best: input.initial_value,
        worst: input.initial_value,
    };
    let mut points = Vec::with_capacity(input.time_horizon_years as usize);

    for year in 1..=input.time_horizon_years {
        token.check()?;
        totals.expected = grow(totals.expected, annual_contribution, rates.expected);
        totals.best = grow(totals.best, annual_contribution, rates.best);
        totals.worst = grow(totals.worst, annual_contribution, rates.worst);
        points.push(totals.emit(year));
    }

    let last = totals.emit(input.time_horizon_years);
    tracing::debug!(
        risk_profile = ?input.risk_profile,
        years = input.time_horizon_years,
        final_projected = last.projected_value,
        "projection complete"
    );

    Ok(ProjectionResult {
        risk_profile: input.risk_profile,
        points,
        final_projected_value: last.projected_value,
        final_best_case: last.best_case,
        final_worst_case: last.worst_case,
    })
}

fn grow(value: f64, contribution: f64, rate: f64) -> f64 {
    (value + contribution) * (1.0 + rate)
}

pub fn round_currency(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
