use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use super::templates::{TemplateId, template_graph};
use super::types::{EdgeId, NodeDraft, NodeId, NodeKind, NodePatch, PlanEdge, PlanNode, Position};
use crate::error::GraphError;

/// An immutable snapshot of the life-plan graph.
///
/// Every mutation returns a new snapshot and leaves `self` untouched, so
/// previous snapshots stay valid for history and undo. Every edge endpoint is
/// guaranteed to exist in the node set.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GraphParts")]
pub struct PlanGraph {
    nodes: Vec<PlanNode>,
    edges: Vec<PlanEdge>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphParts {
    #[serde(default)]
    pub nodes: Vec<PlanNode>,
    #[serde(default)]
    pub edges: Vec<PlanEdge>,
}

impl TryFrom<GraphParts> for PlanGraph {
    type Error = GraphError;

    fn try_from(parts: GraphParts) -> Result<Self, Self::Error> {
        PlanGraph::from_parts(parts.nodes, parts.edges)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineGroup {
    pub year: Option<i32>,
    pub label: String,
    pub node_ids: Vec<NodeId>,
}

impl PlanGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(nodes: Vec<PlanNode>, edges: Vec<PlanEdge>) -> Result<Self, GraphError> {
        let mut node_ids = HashSet::with_capacity(nodes.len());
        for node in &nodes {
            if !node_ids.insert(&node.id) {
                return Err(GraphError::DuplicateNode(node.id.clone()));
            }
        }

        let mut edge_ids = HashSet::with_capacity(edges.len());
        for edge in &edges {
            if !edge_ids.insert(&edge.id) {
                return Err(GraphError::DuplicateEdge(edge.id.clone()));
            }
            for endpoint in [&edge.source, &edge.target] {
                if !node_ids.contains(endpoint) {
                    return Err(GraphError::ReferentialIntegrity(endpoint.clone()));
                }
            }
        }

        Ok(Self { nodes, edges })
    }

    pub(crate) fn from_trusted_parts(nodes: Vec<PlanNode>, edges: Vec<PlanEdge>) -> Self {
        Self { nodes, edges }
    }

    pub fn nodes(&self) -> &[PlanNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[PlanEdge] {
        &self.edges
    }

    pub fn node(&self, id: &NodeId) -> Option<&PlanNode> {
        self.nodes.iter().find(|node| &node.id == id)
    }

    pub fn edge(&self, id: &EdgeId) -> Option<&PlanEdge> {
        self.edges.iter().find(|edge| &edge.id == id)
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn add_node(&self, kind: NodeKind, position: Position, draft: NodeDraft) -> (Self, NodeId) {
        let id = NodeId::generate();
        let node = PlanNode {
            id: id.clone(),
            kind,
            position,
            title: draft.title,
            amount: draft.amount,
            frequency: draft.frequency,
            year: draft.year,
            notes: draft.notes,
            linked_contact: draft.linked_contact,
        };
        let mut next = self.clone();
        next.nodes.push(node);
        (next, id)
    }

    pub fn update_node_data(&self, id: &NodeId, patch: NodePatch) -> Result<Self, GraphError> {
        self.with_node(id, |node| patch.apply_to(node))
    }

    pub fn move_node(&self, id: &NodeId, position: Position) -> Result<Self, GraphError> {
        self.with_node(id, |node| node.position = position)
    }

    pub fn remove_node(&self, id: &NodeId) -> Result<Self, GraphError> {
        if !self.contains_node(id) {
            return Err(GraphError::NodeNotFound(id.clone()));
        }
        let nodes = self
            .nodes
            .iter()
            .filter(|node| &node.id != id)
            .cloned()
            .collect();
        let edges = self
            .edges
            .iter()
            .filter(|edge| &edge.source != id && &edge.target != id)
            .cloned()
            .collect();
        Ok(Self { nodes, edges })
    }

    pub fn connect(
        &self,
        source: &NodeId,
        target: &NodeId,
        label: Option<String>,
    ) -> Result<(Self, EdgeId), GraphError> {
        for endpoint in [source, target] {
            if !self.contains_node(endpoint) {
                return Err(GraphError::ReferentialIntegrity(endpoint.clone()));
            }
        }
        let id = EdgeId::generate();
        let mut next = self.clone();
        next.edges.push(PlanEdge {
            id: id.clone(),
            source: source.clone(),
            target: target.clone(),
            label,
            notes: None,
        });
        Ok((next, id))
    }

    pub fn remove_edge(&self, id: &EdgeId) -> Result<Self, GraphError> {
        if self.edge(id).is_none() {
            return Err(GraphError::EdgeNotFound(id.clone()));
        }
        let mut next = self.clone();
        next.edges.retain(|edge| &edge.id != id);
        Ok(next)
    }

    pub fn load_template(&self, template: TemplateId) -> Self {
        template_graph(template)
    }

    pub fn timeline(&self) -> Vec<TimelineGroup> {
        let mut dated: BTreeMap<i32, Vec<NodeId>> = BTreeMap::new();
        let mut undated = Vec::new();
        for node in &self.nodes {
            match node.year {
                Some(year) => dated.entry(year).or_default().push(node.id.clone()),
                None => undated.push(node.id.clone()),
            }
        }

        let mut groups: Vec<TimelineGroup> = dated
            .into_iter()
            .map(|(year, node_ids)| TimelineGroup {
                year: Some(year),
                label: year.to_string(),
                node_ids,
            })
            .collect();
        if !undated.is_empty() {
            groups.push(TimelineGroup {
                year: None,
                label: "Undated".to_string(),
                node_ids: undated,
            });
        }
        groups
    }

    fn with_node(&self, id: &NodeId, f: impl FnOnce(&mut PlanNode)) -> Result<Self, GraphError> {
        let mut next = self.clone();
        let node = next
            .nodes
            .iter_mut()
            .find(|node| &node.id == id)
            .ok_or_else(|| GraphError::NodeNotFound(id.clone()))?;
        f(node);
        Ok(next)
    }
}
