use serde::Serialize;

use super::types::{Frequency, PlanNode};

const WEEKS_PER_YEAR: f64 = 52.0;

// Weekly nodes stay out of both headline rollups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSummary {
    pub net_worth_contribution: f64,
    pub estimated_annual_income: f64,
    pub weekly_annualized: f64,
}

pub fn aggregate(nodes: &[PlanNode]) -> PlanSummary {
    nodes
        .iter()
        .fold(PlanSummary::default(), |mut summary, node| {
            match node.frequency {
                Frequency::OneTime => summary.net_worth_contribution += node.amount,
                Frequency::Yearly => summary.estimated_annual_income += node.amount,
                Frequency::Weekly => summary.weekly_annualized += node.amount * WEEKS_PER_YEAR,
            }
            summary
        })
}
