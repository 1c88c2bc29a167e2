use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::graph::PlanGraph;
use super::types::{EdgeId, Frequency, NodeId, NodeKind, PlanEdge, PlanNode, Position};
use crate::error::GraphError;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TemplateId {
    Default,
    EarlyRetirement,
    Startup,
}

impl TemplateId {
    pub const ALL: [TemplateId; 3] = [
        TemplateId::Default,
        TemplateId::EarlyRetirement,
        TemplateId::Startup,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TemplateId::Default => "default",
            TemplateId::EarlyRetirement => "earlyRetirement",
            TemplateId::Startup => "startup",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            TemplateId::Default => "Standard Career Path",
            TemplateId::EarlyRetirement => "Early Retirement (FIRE)",
            TemplateId::Startup => "Startup Founder",
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateId {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(TemplateId::Default),
            "earlyRetirement" | "early-retirement" | "early_retirement" => {
                Ok(TemplateId::EarlyRetirement)
            }
            "startup" => Ok(TemplateId::Startup),
            other => Err(GraphError::UnknownTemplate(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateInfo {
    pub id: TemplateId,
    pub name: &'static str,
}

pub fn catalogue() -> Vec<TemplateInfo> {
    TemplateId::ALL
        .iter()
        .map(|&id| TemplateInfo {
            id,
            name: id.display_name(),
        })
        .collect()
}

struct NodeSpec {
    id: &'static str,
    kind: NodeKind,
    x: f64,
    y: f64,
    title: &'static str,
    amount: f64,
    frequency: Frequency,
    year: Option<i32>,
}

#[rustfmt::skip]
const DEFAULT_NODES: &[NodeSpec] = &[
    NodeSpec { id: "1", kind: NodeKind::Career, x: 0.0, y: 0.0, title: "Graduate Job", amount: 35_000.0, frequency: Frequency::Yearly, year: Some(2025) },
    NodeSpec { id: "2", kind: NodeKind::Education, x: 250.0, y: -120.0, title: "Professional Certification", amount: -3_000.0, frequency: Frequency::OneTime, year: Some(2026) },
    NodeSpec { id: "3", kind: NodeKind::Financial, x: 250.0, y: 120.0, title: "Emergency Fund", amount: 10_000.0, frequency: Frequency::OneTime, year: Some(2027) },
    NodeSpec { id: "4", kind: NodeKind::Career, x: 500.0, y: -120.0, title: "Senior Role", amount: 55_000.0, frequency: Frequency::Yearly, year: Some(2029) },
    NodeSpec { id: "5", kind: NodeKind::LifeEvent, x: 500.0, y: 120.0, title: "Buy a Home", amount: -40_000.0, frequency: Frequency::OneTime, year: Some(2032) },
    NodeSpec { id: "6", kind: NodeKind::Goal, x: 750.0, y: 0.0, title: "Retire at 65", amount: 0.0, frequency: Frequency::OneTime, year: Some(2060) },
];

#[rustfmt::skip]
const DEFAULT_EDGES: &[(&str, &str)] = &[("1", "2"), ("1", "3"), ("2", "4"), ("3", "5"), ("4", "6")];

#[rustfmt::skip]
const EARLY_RETIREMENT_NODES: &[NodeSpec] = &[
    NodeSpec { id: "1", kind: NodeKind::Career, x: 0.0, y: 0.0, title: "High-Savings Career", amount: 80_000.0, frequency: Frequency::Yearly, year: Some(2025) },
    NodeSpec { id: "2", kind: NodeKind::Financial, x: 250.0, y: -120.0, title: "Max Out Index Funds", amount: 30_000.0, frequency: Frequency::Yearly, year: Some(2025) },
    NodeSpec { id: "3", kind: NodeKind::Health, x: 250.0, y: 120.0, title: "Frugal Lifestyle", amount: -50.0, frequency: Frequency::Weekly, year: None },
    NodeSpec { id: "4", kind: NodeKind::Financial, x: 500.0, y: 0.0, title: "Reach FI Number", amount: 1_000_000.0, frequency: Frequency::OneTime, year: Some(2040) },
    NodeSpec { id: "5", kind: NodeKind::Goal, x: 750.0, y: 0.0, title: "Retire Early", amount: 0.0, frequency: Frequency::OneTime, year: Some(2040) },
    NodeSpec { id: "6", kind: NodeKind::LifeEvent, x: 1_000.0, y: 0.0, title: "Slow Travel", amount: -15_000.0, frequency: Frequency::Yearly, year: Some(2041) },
];

#[rustfmt::skip]
const EARLY_RETIREMENT_EDGES: &[(&str, &str)] = &[("1", "2"), ("2", "4"), ("3", "4"), ("4", "5"), ("5", "6")];

#[rustfmt::skip]
const STARTUP_NODES: &[NodeSpec] = &[
    NodeSpec { id: "1", kind: NodeKind::Career, x: 0.0, y: 0.0, title: "Corporate Job", amount: 70_000.0, frequency: Frequency::Yearly, year: Some(2025) },
    NodeSpec { id: "2", kind: NodeKind::Financial, x: 250.0, y: 0.0, title: "Runway Savings", amount: 30_000.0, frequency: Frequency::OneTime, year: Some(2026) },
    NodeSpec { id: "3", kind: NodeKind::Career, x: 500.0, y: 0.0, title: "Found Startup", amount: -20_000.0, frequency: Frequency::Yearly, year: Some(2027) },
    NodeSpec { id: "4", kind: NodeKind::System, x: 750.0, y: -120.0, title: "Seed Funding", amount: 500_000.0, frequency: Frequency::OneTime, year: Some(2028) },
    NodeSpec { id: "5", kind: NodeKind::Goal, x: 1_000.0, y: -120.0, title: "Exit", amount: 2_000_000.0, frequency: Frequency::OneTime, year: Some(2033) },
    NodeSpec { id: "6", kind: NodeKind::Other, x: 750.0, y: 120.0, title: "Fallback: Return to Industry", amount: 0.0, frequency: Frequency::OneTime, year: None },
];

#[rustfmt::skip]
const STARTUP_EDGES: &[(&str, &str)] = &[("1", "2"), ("2", "3"), ("3", "4"), ("4", "5"), ("3", "6")];

pub fn template_graph(template: TemplateId) -> PlanGraph {
    let (nodes, edges) = match template {
        TemplateId::Default => (DEFAULT_NODES, DEFAULT_EDGES),
        TemplateId::EarlyRetirement => (EARLY_RETIREMENT_NODES, EARLY_RETIREMENT_EDGES),
        TemplateId::Startup => (STARTUP_NODES, STARTUP_EDGES),
    };

    let nodes = nodes
        .iter()
        .map(|spec| PlanNode {
            id: NodeId::from(spec.id),
            kind: spec.kind,
            position: Position::new(spec.x, spec.y),
            title: spec.title.to_string(),
            amount: spec.amount,
            frequency: spec.frequency,
            year: spec.year,
            notes: String::new(),
            linked_contact: None,
        })
        .collect();
    let edges = edges
        .iter()
        .map(|&(source, target)| PlanEdge {
            id: EdgeId(format!("e{source}-{target}")),
            source: NodeId::from(source),
            target: NodeId::from(target),
            label: None,
            notes: None,
        })
        .collect();

    PlanGraph::from_trusted_parts(nodes, edges)
}
