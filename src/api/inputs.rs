use clap::{Args, ValueEnum};
use serde::Deserialize;

use crate::core::{
    FireInputs, GoalSolveConfig, MAX_FIRE_YEARS, ProjectionInput, RiskProfile, real_return,
};
use crate::error::ValidationError;

pub const MAX_PROJECTION_YEARS: u32 = 100;
pub const MAX_AMOUNT: f64 = 1e12;
pub const MAX_RATE_PCT: f64 = 1_000.0;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliRiskProfile {
    Conservative,
    Moderate,
    Aggressive,
}

impl From<CliRiskProfile> for RiskProfile {
    fn from(value: CliRiskProfile) -> Self {
        match value {
            CliRiskProfile::Conservative => RiskProfile::Conservative,
            CliRiskProfile::Moderate => RiskProfile::Moderate,
            CliRiskProfile::Aggressive => RiskProfile::Aggressive,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiRiskProfile {
    #[serde(alias = "low", alias = "Conservative")]
    Conservative,
    #[serde(alias = "medium", alias = "balanced", alias = "Moderate")]
    Moderate,
    #[serde(alias = "high", alias = "Aggressive")]
    Aggressive,
}

impl From<ApiRiskProfile> for CliRiskProfile {
    fn from(value: ApiRiskProfile) -> Self {
        match value {
            ApiRiskProfile::Conservative => CliRiskProfile::Conservative,
            ApiRiskProfile::Moderate => CliRiskProfile::Moderate,
            ApiRiskProfile::Aggressive => CliRiskProfile::Aggressive,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ProjectionArgs {
    #[arg(long, default_value_t = 10_000.0, help = "Starting portfolio value")]
    pub initial_value: f64,
    #[arg(long, default_value_t = 500.0)]
    pub monthly_contribution: f64,
    #[arg(long, default_value_t = 30, help = "Number of years to project")]
    pub time_horizon_years: u32,
    #[arg(long, value_enum, default_value_t = CliRiskProfile::Moderate)]
    pub risk_profile: CliRiskProfile,
}

#[derive(Args, Debug, Clone)]
pub struct FireArgs {
    #[arg(long, default_value_t = 50_000.0)]
    pub current_portfolio: f64,
    #[arg(long, default_value_t = 1_500.0)]
    pub monthly_investment: f64,
    #[arg(
        long,
        default_value_t = 7.0,
        allow_negative_numbers = true,
        help = "Expected nominal annual return in percent, e.g. 7"
    )]
    pub annual_return_pct: f64,
    #[arg(
        long,
        default_value_t = 2.5,
        allow_negative_numbers = true,
        help = "Expected annual inflation in percent"
    )]
    pub inflation_pct: f64,
    #[arg(
        long,
        default_value_t = 4.0,
        allow_negative_numbers = true,
        help = "Safe withdrawal rate in percent; <= 0 leaves the FI number undefined"
    )]
    pub withdrawal_rate_pct: f64,
    #[arg(long, default_value_t = 40_000.0, help = "Annual spending in retirement")]
    pub annual_spend: f64,
}

#[derive(Args, Debug, Clone)]
pub struct SolveArgs {
    #[command(flatten)]
    pub fire: FireArgs,
    #[arg(long, default_value_t = 15, help = "Years within which FI must be reached")]
    pub target_years: u32,
    #[arg(long, default_value_t = 0.0)]
    pub search_min: f64,
    #[arg(long, default_value_t = 50_000.0)]
    pub search_max: f64,
    #[arg(long, default_value_t = 1.0)]
    pub tolerance: f64,
    #[arg(long, default_value_t = 60)]
    pub max_iterations: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectionPayload {
    initial_value: Option<f64>,
    monthly_contribution: Option<f64>,
    #[serde(alias = "years")]
    time_horizon_years: Option<u32>,
    risk_profile: Option<ApiRiskProfile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FirePayload {
    current_portfolio: Option<f64>,
    monthly_investment: Option<f64>,
    annual_return_pct: Option<f64>,
    inflation_pct: Option<f64>,
    withdrawal_rate_pct: Option<f64>,
    annual_spend: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SolvePayload {
    #[serde(flatten)]
    fire: FirePayload,
    target_years: Option<u32>,
    search_min: Option<f64>,
    search_max: Option<f64>,
    tolerance: Option<f64>,
    max_iterations: Option<u32>,
}

pub fn default_projection_args() -> ProjectionArgs {
    ProjectionArgs {
        initial_value: 10_000.0,
        monthly_contribution: 500.0,
        time_horizon_years: 30,
        risk_profile: CliRiskProfile::Moderate,
    }
}

pub fn default_fire_args() -> FireArgs {
    FireArgs {
        current_portfolio: 50_000.0,
        monthly_investment: 1_500.0,
        annual_return_pct: 7.0,
        inflation_pct: 2.5,
        withdrawal_rate_pct: 4.0,
        annual_spend: 40_000.0,
    }
}

pub fn default_solve_args() -> SolveArgs {
    SolveArgs {
        fire: default_fire_args(),
        target_years: 15,
        search_min: 0.0,
        search_max: 50_000.0,
        tolerance: 1.0,
        max_iterations: 60,
    }
}

pub fn build_projection_input(args: ProjectionArgs) -> Result<ProjectionInput, ValidationError> {
    require_amount("--initial-value", args.initial_value)?;
    require_amount("--monthly-contribution", args.monthly_contribution)?;
    if !(1..=MAX_PROJECTION_YEARS).contains(&args.time_horizon_years) {
        return Err(ValidationError::new(
            "--time-horizon-years",
            format!("must be between 1 and {MAX_PROJECTION_YEARS}"),
        ));
    }

    Ok(ProjectionInput {
        initial_value: args.initial_value,
        monthly_contribution: args.monthly_contribution,
        time_horizon_years: args.time_horizon_years,
        risk_profile: args.risk_profile.into(),
    })
}

pub fn build_fire_inputs(args: FireArgs) -> Result<FireInputs, ValidationError> {
    require_amount("--current-portfolio", args.current_portfolio)?;
    require_amount("--monthly-investment", args.monthly_investment)?;
    require_amount("--annual-spend", args.annual_spend)?;
    require_rate_pct("--annual-return-pct", args.annual_return_pct)?;
    require_rate_pct("--inflation-pct", args.inflation_pct)?;
    require_finite_horizon(&args)?;
    // A non-positive rate is allowed through; the calculator signals it.
    if !args.withdrawal_rate_pct.is_finite() {
        return Err(ValidationError::new("--withdrawal-rate-pct", "must be finite"));
    }

    Ok(FireInputs {
        current_portfolio: args.current_portfolio,
        monthly_investment: args.monthly_investment,
        annual_return_pct: args.annual_return_pct,
        inflation_pct: args.inflation_pct,
        withdrawal_rate_pct: args.withdrawal_rate_pct,
        annual_spend: args.annual_spend,
    })
}

pub fn build_solve_request(
    args: SolveArgs,
) -> Result<(FireInputs, GoalSolveConfig), ValidationError> {
    if !(1..=MAX_FIRE_YEARS).contains(&args.target_years) {
        return Err(ValidationError::new(
            "--target-years",
            format!("must be between 1 and {MAX_FIRE_YEARS}"),
        ));
    }
    let inputs = build_fire_inputs(args.fire)?;
    let config = GoalSolveConfig {
        target_years: args.target_years,
        search_min: args.search_min,
        search_max: args.search_max,
        tolerance: args.tolerance,
        max_iterations: args.max_iterations,
    };
    Ok((inputs, config))
}

pub fn projection_input_from_payload(
    payload: ProjectionPayload,
) -> Result<ProjectionInput, ValidationError> {
    let mut args = default_projection_args();
    if let Some(v) = payload.initial_value {
        args.initial_value = v;
    }
    if let Some(v) = payload.monthly_contribution {
        args.monthly_contribution = v;
    }
    if let Some(v) = payload.time_horizon_years {
        args.time_horizon_years = v;
    }
    if let Some(v) = payload.risk_profile {
        args.risk_profile = v.into();
    }
    build_projection_input(args)
}

fn merge_fire_payload(args: &mut FireArgs, payload: FirePayload) {
    if let Some(v) = payload.current_portfolio {
        args.current_portfolio = v;
    }
    if let Some(v) = payload.monthly_investment {
        args.monthly_investment = v;
    }
    if let Some(v) = payload.annual_return_pct {
        args.annual_return_pct = v;
    }
    if let Some(v) = payload.inflation_pct {
        args.inflation_pct = v;
    }
    if let Some(v) = payload.withdrawal_rate_pct {
        args.withdrawal_rate_pct = v;
    }
    if let Some(v) = payload.annual_spend {
        args.annual_spend = v;
    }
}

pub fn fire_inputs_from_payload(payload: FirePayload) -> Result<FireInputs, ValidationError> {
    let mut args = default_fire_args();
    merge_fire_payload(&mut args, payload);
    build_fire_inputs(args)
}

pub fn solve_request_from_payload(
    payload: SolvePayload,
) -> Result<(FireInputs, GoalSolveConfig), ValidationError> {
    let mut args = default_solve_args();
    merge_fire_payload(&mut args.fire, payload.fire);
    if let Some(v) = payload.target_years {
        args.target_years = v;
    }
    if let Some(v) = payload.search_min {
        args.search_min = v;
    }
    if let Some(v) = payload.search_max {
        args.search_max = v;
    }
    if let Some(v) = payload.tolerance {
        args.tolerance = v;
    }
    if let Some(v) = payload.max_iterations {
        args.max_iterations = v;
    }
    build_solve_request(args)
}

fn require_amount(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || !(0.0..=MAX_AMOUNT).contains(&value) {
        return Err(ValidationError::new(
            field,
            format!("must be a finite number between 0 and {MAX_AMOUNT:e}"),
        ));
    }
    Ok(())
}

fn require_rate_pct(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value <= -100.0 || value > MAX_RATE_PCT {
        return Err(ValidationError::new(
            field,
            format!("must be > -100 and <= {MAX_RATE_PCT}"),
        ));
    }
    Ok(())
}

// Upper bound on any portfolio value the FIRE loop can reach within the cap.
fn require_finite_horizon(args: &FireArgs) -> Result<(), ValidationError> {
    let growth = (1.0 + real_return(args.annual_return_pct, args.inflation_pct))
        .powi(MAX_FIRE_YEARS as i32)
        .max(1.0);
    let contributed = args.monthly_investment * 12.0 * f64::from(MAX_FIRE_YEARS);
    if !(growth * (args.current_portfolio + contributed)).is_finite() {
        return Err(ValidationError::new(
            "--annual-return-pct",
            "real return grows the portfolio beyond representable values",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        )
    }

    #[test]
    fn build_projection_input_rejects_zero_horizon() {
        let mut args = default_projection_args();
        args.time_horizon_years = 0;
        let err = build_projection_input(args).expect_err("must reject horizon < 1");
        assert_eq!(err.field, "--time-horizon-years");
    }

    #[test]
    fn build_projection_input_rejects_negative_contribution() {
        let mut args = default_projection_args();
        args.monthly_contribution = -1.0;
        let err = build_projection_input(args).expect_err("must reject negative");
        assert_eq!(err.field, "--monthly-contribution");

        let mut args = default_projection_args();
        args.initial_value = f64::NAN;
        let err = build_projection_input(args).expect_err("must reject NaN");
        assert_eq!(err.field, "--initial-value");
    }

    #[test]
    fn build_fire_inputs_allows_non_positive_withdrawal_rate() {
        let mut args = default_fire_args();
        args.withdrawal_rate_pct = 0.0;
        let inputs = build_fire_inputs(args).expect("signalled downstream, not rejected");
        assert_approx(inputs.withdrawal_rate_pct, 0.0);
    }

    #[test]
    fn build_fire_inputs_rejects_degenerate_rates() {
        let mut args = default_fire_args();
        args.inflation_pct = -100.0;
        let err = build_fire_inputs(args).expect_err("must reject");
        assert_eq!(err.field, "--inflation-pct");

        let mut args = default_fire_args();
        args.annual_spend = -5.0;
        let err = build_fire_inputs(args).expect_err("must reject");
        assert_eq!(err.field, "--annual-spend");
    }

    #[test]
    fn build_fire_inputs_rejects_returns_that_overflow() {
        let mut args = default_fire_args();
        args.annual_return_pct = 1e306;
        let err = build_fire_inputs(args).expect_err("must reject");
        assert_eq!(err.field, "--annual-return-pct");

        let mut args = default_fire_args();
        args.annual_return_pct = MAX_RATE_PCT;
        args.inflation_pct = -99.9;
        args.current_portfolio = MAX_AMOUNT;
        let err = build_fire_inputs(args).expect_err("deflation compounds past f64");
        assert_eq!(err.field, "--annual-return-pct");

        let mut args = default_fire_args();
        args.annual_return_pct = MAX_RATE_PCT;
        args.current_portfolio = MAX_AMOUNT;
        args.monthly_investment = MAX_AMOUNT;
        build_fire_inputs(args).expect("large but finite growth is accepted");
    }

    #[test]
    fn amounts_above_cap_are_rejected() {
        let mut args = default_projection_args();
        args.initial_value = MAX_AMOUNT * 10.0;
        let err = build_projection_input(args).expect_err("must reject");
        assert_eq!(err.field, "--initial-value");
    }

    #[test]
    fn projection_payload_parses_web_keys_over_defaults() {
        let json = r#"{
          "initialValue": 1000,
          "monthlyContribution": 100,
          "timeHorizonYears": 1,
          "riskProfile": "aggressive"
        }"#;
        let payload: ProjectionPayload = serde_json::from_str(json).expect("json should parse");
        let input = projection_input_from_payload(payload).expect("valid input");
        assert_approx(input.initial_value, 1_000.0);
        assert_approx(input.monthly_contribution, 100.0);
        assert_eq!(input.time_horizon_years, 1);
        assert_eq!(input.risk_profile, RiskProfile::Aggressive);

        let payload: ProjectionPayload =
            serde_json::from_str(r#"{ "riskProfile": "low" }"#).expect("alias should parse");
        let input = projection_input_from_payload(payload).expect("valid input");
        assert_eq!(input.risk_profile, RiskProfile::Conservative);
        assert_eq!(input.time_horizon_years, 30);
    }

    #[test]
    fn fire_payload_keeps_defaults_for_missing_fields() {
        let payload: FirePayload =
            serde_json::from_str(r#"{ "annualSpend": 60000, "withdrawalRatePct": 3.5 }"#)
                .expect("json should parse");
        let inputs = fire_inputs_from_payload(payload).expect("valid inputs");
        assert_approx(inputs.annual_spend, 60_000.0);
        assert_approx(inputs.withdrawal_rate_pct, 3.5);
        assert_approx(inputs.current_portfolio, 50_000.0);
        assert_approx(inputs.inflation_pct, 2.5);
    }

    #[test]
    fn solve_payload_reads_flattened_fire_fields() {
        let json = r#"{
          "annualSpend": 12000,
          "currentPortfolio": 0,
          "targetYears": 20,
          "searchMax": 9000
        }"#;
        let payload: SolvePayload = serde_json::from_str(json).expect("json should parse");
        let (inputs, config) = solve_request_from_payload(payload).expect("valid request");
        assert_approx(inputs.annual_spend, 12_000.0);
        assert_approx(inputs.current_portfolio, 0.0);
        assert_eq!(config.target_years, 20);
        assert_approx(config.search_max, 9_000.0);
        assert_eq!(config.max_iterations, 60);
    }

    #[test]
    fn solve_request_rejects_target_beyond_cap() {
        let mut args = default_solve_args();
        args.target_years = MAX_FIRE_YEARS + 1;
        let err = build_solve_request(args).expect_err("must reject");
        assert_eq!(err.field, "--target-years");
    }
}
