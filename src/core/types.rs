use serde::{Deserialize, Serialize, Serializer};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskProfile {
    Conservative,
    Moderate,
    Aggressive,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScenarioRates {
    pub expected: f64,
    pub best: f64,
    pub worst: f64,
}

impl RiskProfile {
    pub fn rates(self) -> ScenarioRates {
        match self {
            RiskProfile::Conservative => ScenarioRates {
                expected: 0.04,
                best: 0.06,
                worst: 0.02,
            },
            RiskProfile::Moderate => ScenarioRates {
                expected: 0.07,
                best: 0.10,
                worst: 0.03,
            },
            RiskProfile::Aggressive => ScenarioRates {
                expected: 0.10,
                best: 0.15,
                worst: 0.01,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionInput {
    pub initial_value: f64,
    pub monthly_contribution: f64,
    pub time_horizon_years: u32,
    pub risk_profile: RiskProfile,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionPoint {
    pub year: u32,
    pub projected_value: f64,
    pub best_case: f64,
    pub worst_case: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    pub risk_profile: RiskProfile,
    pub points: Vec<ProjectionPoint>,
    pub final_projected_value: f64,
    pub final_best_case: f64,
    pub final_worst_case: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FireInputs {
    pub current_portfolio: f64,
    pub monthly_investment: f64,
    pub annual_return_pct: f64,
    pub inflation_pct: f64,
    pub withdrawal_rate_pct: f64,
    pub annual_spend: f64,
}

/// Years until the portfolio first meets the FI number.
///
/// Serializes as a bare integer, or the string `"unreachable"` when the FI
/// number is undefined or the iteration cap was hit first.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum YearsToFi {
    Reached(u32),
    Unreachable,
}

impl YearsToFi {
    pub fn years(self) -> Option<u32> {
        match self {
            YearsToFi::Reached(years) => Some(years),
            YearsToFi::Unreachable => None,
        }
    }
}

impl Serialize for YearsToFi {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            YearsToFi::Reached(years) => serializer.serialize_u32(*years),
            YearsToFi::Unreachable => serializer.serialize_str("unreachable"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioPoint {
    pub year: u32,
    pub portfolio_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FireResult {
    pub fi_number: f64,
    pub years_to_fi: YearsToFi,
    pub withdrawal_at_fi: f64,
    pub real_return_pct: f64,
    pub projection_series: Vec<PortfolioPoint>,
}

impl FireResult {
    pub fn fi_number_defined(&self) -> bool {
        self.fi_number.is_finite()
    }
}
