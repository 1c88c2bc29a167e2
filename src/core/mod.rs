mod cancel;
mod fire;
mod projection;
mod solver;
mod types;

pub use cancel::{CancellationToken, Cancelled};
pub use fire::{MAX_FIRE_YEARS, fi_number, real_return, run_fire, run_fire_cancellable};
pub use projection::{round_currency, run_projection, run_projection_cancellable};
pub use solver::{GoalSolveConfig, GoalSolveIteration, GoalSolveResult, solve_required_investment};
pub use types::{
    FireInputs, FireResult, PortfolioPoint, ProjectionInput, ProjectionPoint, ProjectionResult,
    RiskProfile, ScenarioRates, YearsToFi,
};
