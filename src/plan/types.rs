use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

#[derive(Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub String);

impl NodeId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl EdgeId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for EdgeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    Career,
    Education,
    Financial,
    #[serde(alias = "lifeEvent", alias = "life_event")]
    LifeEvent,
    Goal,
    Health,
    System,
    Other,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub struct KindStyle {
    pub label: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
}

impl NodeKind {
    pub const ALL: [NodeKind; 8] = [
        NodeKind::Career,
        NodeKind::Education,
        NodeKind::Financial,
        NodeKind::LifeEvent,
        NodeKind::Goal,
        NodeKind::Health,
        NodeKind::System,
        NodeKind::Other,
    ];

    pub fn style(self) -> KindStyle {
        match self {
            NodeKind::Career => KindStyle {
                label: "Career",
                icon: "briefcase",
                color: "#3b82f6",
            },
            NodeKind::Education => KindStyle {
                label: "Education",
                icon: "graduation-cap",
                color: "#8b5cf6",
            },
            NodeKind::Financial => KindStyle {
                label: "Financial",
                icon: "piggy-bank",
                color: "#10b981",
            },
            NodeKind::LifeEvent => KindStyle {
                label: "Life Event",
                icon: "heart",
                color: "#f43f5e",
            },
            NodeKind::Goal => KindStyle {
                label: "Goal",
                icon: "target",
                color: "#f59e0b",
            },
            NodeKind::Health => KindStyle {
                label: "Health",
                icon: "activity",
                color: "#14b8a6",
            },
            NodeKind::System => KindStyle {
                label: "System",
                icon: "cpu",
                color: "#64748b",
            },
            NodeKind::Other => KindStyle {
                label: "Other",
                icon: "circle",
                color: "#94a3b8",
            },
        }
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Frequency {
    #[default]
    #[serde(alias = "oneTime", alias = "one_time", alias = "once")]
    OneTime,
    Yearly,
    Weekly,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRef {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanNode {
    pub id: NodeId,
    pub kind: NodeKind,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub linked_contact: Option<ContactRef>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanEdge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeDraft {
    pub title: String,
    pub amount: f64,
    pub frequency: Frequency,
    pub year: Option<i32>,
    pub notes: String,
    pub linked_contact: Option<ContactRef>,
}

// The nested options on `year` and `linked_contact` allow clearing them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodePatch {
    pub kind: Option<NodeKind>,
    pub title: Option<String>,
    pub amount: Option<f64>,
    pub frequency: Option<Frequency>,
    pub year: Option<Option<i32>>,
    pub notes: Option<String>,
    pub linked_contact: Option<Option<ContactRef>>,
}

impl NodePatch {
    pub(crate) fn apply_to(self, node: &mut PlanNode) {
        if let Some(v) = self.kind {
            node.kind = v;
        }
        if let Some(v) = self.title {
            node.title = v;
        }
        if let Some(v) = self.amount {
            node.amount = v;
        }
        if let Some(v) = self.frequency {
            node.frequency = v;
        }
        if let Some(v) = self.year {
            node.year = v;
        }
        if let Some(v) = self.notes {
            node.notes = v;
        }
        if let Some(v) = self.linked_contact {
            node.linked_contact = v;
        }
    }
}
