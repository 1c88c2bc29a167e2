use serde::Serialize;

use super::fire::{MAX_FIRE_YEARS, fi_number, run_fire};
use super::types::{FireInputs, YearsToFi};

#[derive(Debug, Clone, Copy)]
pub struct GoalSolveConfig {
    pub target_years: u32,
    pub search_min: f64,
    pub search_max: f64,
    pub tolerance: f64,
    pub max_iterations: u32,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalSolveIteration {
    pub iteration: u32,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub candidate_value: f64,
    pub years_to_fi: YearsToFi,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalSolveResult {
    pub target_years: u32,
    pub search_min: f64,
    pub search_max: f64,
    pub tolerance: f64,
    pub max_iterations: u32,
    pub solved_monthly_investment: Option<f64>,
    pub achieved_years_to_fi: Option<YearsToFi>,
    pub iterations: Vec<GoalSolveIteration>,
    pub converged: bool,
    pub feasible: bool,
    pub message: String,
}

// Years-to-FI is monotone in the monthly investment, so bisection is enough.
pub fn solve_required_investment(
    inputs: &FireInputs,
    config: GoalSolveConfig,
) -> Result<GoalSolveResult, String> {
    validate_config(inputs, config)?;

    let mut iterations = Vec::with_capacity(config.max_iterations as usize);
    let mut solved_value = None;
    let mut converged = false;
    let feasible;
    let message;

    if meets_target(inputs, config, config.search_min).0 {
        solved_value = Some(config.search_min);
        converged = true;
        feasible = true;
        message = "Already reaches FI in time at the lower investment bound.".to_string();
    } else if !meets_target(inputs, config, config.search_max).0 {
        feasible = false;
        message = "No feasible monthly investment found within the search bounds.".to_string();
    } else {
        let mut lo = config.search_min;
        let mut hi = config.search_max;
        let mut it = 0;
        while it < config.max_iterations {
            it += 1;
            let mid = (lo + hi) * 0.5;
            let (ok, years_to_fi) = meets_target(inputs, config, mid);
            iterations.push(GoalSolveIteration {
                iteration: it,
                lower_bound: lo,
                upper_bound: hi,
                candidate_value: mid,
                years_to_fi,
            });

            if ok {
                hi = mid;
            } else {
                lo = mid;
            }

            if (hi - lo).abs() <= config.tolerance {
                converged = true;
                solved_value = Some(hi);
                break;
            }
        }
        if solved_value.is_none() {
            solved_value = Some(hi);
        }
        feasible = true;
        message = if converged {
            "Solved required monthly investment.".to_string()
        } else {
            "Reached max iterations before tolerance was met; returning best estimate.".to_string()
        };
    }

    let achieved_years_to_fi = solved_value.map(|value| meets_target(inputs, config, value).1);
    tracing::debug!(
        target_years = config.target_years,
        solved = ?solved_value,
        feasible,
        converged,
        "goal solve complete"
    );

    Ok(GoalSolveResult {
        target_years: config.target_years,
        search_min: config.search_min,
        search_max: config.search_max,
        tolerance: config.tolerance,
        max_iterations: config.max_iterations,
        solved_monthly_investment: solved_value,
        achieved_years_to_fi,
        iterations,
        converged,
        feasible,
        message,
    })
}

fn meets_target(
    base_inputs: &FireInputs,
    config: GoalSolveConfig,
    candidate: f64,
) -> (bool, YearsToFi) {
    let inputs = FireInputs {
        monthly_investment: candidate.max(0.0),
        ..base_inputs.clone()
    };
    let years_to_fi = run_fire(&inputs).years_to_fi;
    let ok = matches!(years_to_fi, YearsToFi::Reached(years) if years <= config.target_years);
    (ok, years_to_fi)
}

fn validate_config(inputs: &FireInputs, config: GoalSolveConfig) -> Result<(), String> {
    if config.target_years == 0 || config.target_years > MAX_FIRE_YEARS {
        return Err(format!("target_years must be between 1 and {MAX_FIRE_YEARS}"));
    }
    if !fi_number(inputs.annual_spend, inputs.withdrawal_rate_pct).is_finite() {
        return Err("withdrawal_rate_pct must be > 0 to solve for a FI target".to_string());
    }
    if !config.search_min.is_finite() || !config.search_max.is_finite() {
        return Err("search bounds must be finite".to_string());
    }
    if config.search_min < 0.0 {
        return Err("search_min must be >= 0".to_string());
    }
    if config.search_max <= config.search_min {
        return Err("search_max must be greater than search_min".to_string());
    }
    if !config.tolerance.is_finite() || config.tolerance <= 0.0 {
        return Err("tolerance must be > 0".to_string());
    }
    if config.max_iterations == 0 {
        return Err("max_iterations must be > 0".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    fn flat_inputs() -> FireInputs {
        FireInputs {
            current_portfolio: 0.0,
            monthly_investment: 0.0,
            annual_return_pct: 0.0,
            inflation_pct: 0.0,
            withdrawal_rate_pct: 4.0,
            annual_spend: 12_000.0,
        }
    }

    fn config() -> GoalSolveConfig {
        GoalSolveConfig {
            target_years: 10,
            search_min: 0.0,
            search_max: 10_000.0,
            tolerance: 0.5,
            max_iterations: 40,
        }
    }

    #[test]
    fn required_investment_solver_finds_zero_growth_solution() {
        // FI number 300_000 over 10 years with no growth needs 2_500/month.
        let result = solve_required_investment(&flat_inputs(), config()).expect("must solve");
        assert!(result.feasible);
        assert!(result.converged);
        assert_close(
            result.solved_monthly_investment.expect("value expected"),
            2_500.0,
            config().tolerance + 0.5,
        );
        let achieved = result.achieved_years_to_fi.expect("years expected");
        assert!(matches!(achieved, YearsToFi::Reached(years) if years <= 10));
    }

    #[test]
    fn required_investment_solver_reports_already_met() {
        let mut inputs = flat_inputs();
        inputs.current_portfolio = 400_000.0;
        let result = solve_required_investment(&inputs, config()).expect("must solve");
        assert!(result.feasible);
        assert_eq!(result.solved_monthly_investment, Some(0.0));
        assert!(result.iterations.is_empty());
    }

    #[test]
    fn required_investment_solver_reports_infeasible_when_bounds_too_low() {
        let mut cfg = config();
        cfg.search_max = 100.0;
        let result = solve_required_investment(&flat_inputs(), cfg).expect("must return result");
        assert!(!result.feasible);
        assert!(result.solved_monthly_investment.is_none());
        assert!(result.achieved_years_to_fi.is_none());
    }

    #[test]
    fn required_investment_solver_rejects_undefined_target() {
        let mut inputs = flat_inputs();
        inputs.withdrawal_rate_pct = 0.0;
        let err = solve_required_investment(&inputs, config()).expect_err("must reject");
        assert!(err.contains("withdrawal_rate_pct"));
    }

    #[test]
    fn required_investment_solver_rejects_bad_config() {
        let mut cfg = config();
        cfg.target_years = 0;
        assert!(solve_required_investment(&flat_inputs(), cfg).is_err());

        let mut cfg = config();
        cfg.search_max = cfg.search_min;
        let err = solve_required_investment(&flat_inputs(), cfg).expect_err("must reject");
        assert!(err.contains("search_max"));

        let mut cfg = config();
        cfg.tolerance = 0.0;
        let err = solve_required_investment(&flat_inputs(), cfg).expect_err("must reject");
        assert!(err.contains("tolerance"));
    }
}
