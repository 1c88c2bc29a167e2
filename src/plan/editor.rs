use std::collections::VecDeque;

use serde::Serialize;

use super::aggregate::{PlanSummary, aggregate};
use super::graph::PlanGraph;
use super::templates::TemplateId;
use super::types::{EdgeId, NodeDraft, NodeId, NodeKind, NodePatch, Position};
use crate::error::GraphError;

pub const MAX_HISTORY: usize = 100;

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(tag = "state", content = "source", rename_all = "camelCase")]
pub enum ConnectionState {
    #[default]
    Idle,
    ConnectingFrom(NodeId),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct EdgePolicy {
    pub allow_self_loops: bool,
}

impl Default for EdgePolicy {
    fn default() -> Self {
        Self {
            allow_self_loops: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum EditCommand {
    AddNode {
        kind: NodeKind,
        position: Position,
        draft: NodeDraft,
    },
    UpdateNode {
        id: NodeId,
        patch: NodePatch,
    },
    MoveNode {
        id: NodeId,
        position: Position,
    },
    RemoveNode(NodeId),
    Connect {
        source: NodeId,
        target: NodeId,
        label: Option<String>,
    },
    RemoveEdge(EdgeId),
    LoadTemplate(TemplateId),
    StartConnecting(NodeId),
    SelectTarget(NodeId),
    CancelConnecting,
    Undo,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EditOutcome {
    Applied,
    NodeAdded(NodeId),
    EdgeAdded(EdgeId),
    ConnectionStarted(NodeId),
    ConnectionCancelled,
}

#[derive(Clone, Debug, Default)]
pub struct PlanEditor {
    graph: PlanGraph,
    connection: ConnectionState,
    policy: EdgePolicy,
    summary: PlanSummary,
    history: VecDeque<PlanGraph>,
}

impl PlanEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_graph(graph: PlanGraph) -> Self {
        let summary = aggregate(graph.nodes());
        Self {
            graph,
            summary,
            ..Self::default()
        }
    }

    pub fn with_policy(mut self, policy: EdgePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn graph(&self) -> &PlanGraph {
        &self.graph
    }

    pub fn connection(&self) -> &ConnectionState {
        &self.connection
    }

    pub fn summary(&self) -> PlanSummary {
        self.summary
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn apply(&mut self, command: EditCommand) -> Result<EditOutcome, GraphError> {
        if let ConnectionState::ConnectingFrom(source) = &self.connection {
            match command {
                EditCommand::SelectTarget(target) => {
                    let source = source.clone();
                    let edge = self.connect(&source, &target, None)?;
                    self.connection = ConnectionState::Idle;
                    return Ok(EditOutcome::EdgeAdded(edge));
                }
                EditCommand::CancelConnecting => {
                    tracing::debug!(%source, "connection cancelled");
                    self.connection = ConnectionState::Idle;
                    return Ok(EditOutcome::ConnectionCancelled);
                }
                _ => {
                    tracing::warn!(%source, "rejected edit while connecting");
                    return Err(GraphError::ConnectionInProgress(source.clone()));
                }
            }
        }

        match command {
            EditCommand::AddNode {
                kind,
                position,
                draft,
            } => {
                let (next, id) = self.graph.add_node(kind, position, draft);
                self.commit(next);
                Ok(EditOutcome::NodeAdded(id))
            }
            EditCommand::UpdateNode { id, patch } => {
                let next = self.graph.update_node_data(&id, patch)?;
                self.commit(next);
                Ok(EditOutcome::Applied)
            }
            EditCommand::MoveNode { id, position } => {
                let next = self.graph.move_node(&id, position)?;
                self.commit(next);
                Ok(EditOutcome::Applied)
            }
            EditCommand::RemoveNode(id) => {
                let next = self.graph.remove_node(&id)?;
                self.commit(next);
                Ok(EditOutcome::Applied)
            }
            EditCommand::Connect {
                source,
                target,
                label,
            } => self
                .connect(&source, &target, label)
                .map(EditOutcome::EdgeAdded),
            EditCommand::RemoveEdge(id) => {
                let next = self.graph.remove_edge(&id)?;
                self.commit(next);
                Ok(EditOutcome::Applied)
            }
            EditCommand::LoadTemplate(template) => {
                tracing::info!(%template, "loading template");
                let next = self.graph.load_template(template);
                self.commit(next);
                Ok(EditOutcome::Applied)
            }
            EditCommand::StartConnecting(id) => {
                if !self.graph.contains_node(&id) {
                    return Err(GraphError::NodeNotFound(id));
                }
                self.connection = ConnectionState::ConnectingFrom(id.clone());
                Ok(EditOutcome::ConnectionStarted(id))
            }
            EditCommand::SelectTarget(_) | EditCommand::CancelConnecting => {
                Err(GraphError::NotConnecting)
            }
            EditCommand::Undo => {
                let previous = self.history.pop_back().ok_or(GraphError::NothingToUndo)?;
                self.summary = aggregate(previous.nodes());
                self.graph = previous;
                Ok(EditOutcome::Applied)
            }
        }
    }

    pub fn undo(&mut self) -> Result<EditOutcome, GraphError> {
        self.apply(EditCommand::Undo)
    }

    fn connect(
        &mut self,
        source: &NodeId,
        target: &NodeId,
        label: Option<String>,
    ) -> Result<EdgeId, GraphError> {
        if source == target && !self.policy.allow_self_loops {
            return Err(GraphError::SelfLoop(source.clone()));
        }
        let (next, edge) = self.graph.connect(source, target, label)?;
        self.commit(next);
        Ok(edge)
    }

    fn commit(&mut self, next: PlanGraph) {
        let previous = std::mem::replace(&mut self.graph, next);
        if self.history.len() == MAX_HISTORY {
            self.history.pop_front();
        }
        self.history.push_back(previous);
        self.summary = aggregate(self.graph.nodes());
        tracing::debug!(
            nodes = self.graph.nodes().len(),
            edges = self.graph.edges().len(),
            "plan graph updated"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{Frequency, template_graph};

    fn add(editor: &mut PlanEditor, amount: f64, frequency: Frequency) -> NodeId {
        match editor
            .apply(EditCommand::AddNode {
                kind: NodeKind::Financial,
                position: Position::default(),
                draft: NodeDraft {
                    amount,
                    frequency,
                    ..NodeDraft::default()
                },
            })
            .expect("add node")
        {
            EditOutcome::NodeAdded(id) => id,
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn summary_tracks_every_mutation() {
        let mut editor = PlanEditor::new();
        let savings = add(&mut editor, 5_000.0, Frequency::OneTime);
        add(&mut editor, 40_000.0, Frequency::Yearly);
        assert_eq!(editor.summary().net_worth_contribution, 5_000.0);
        assert_eq!(editor.summary().estimated_annual_income, 40_000.0);

        editor
            .apply(EditCommand::RemoveNode(savings))
            .expect("remove");
        assert_eq!(editor.summary().net_worth_contribution, 0.0);
    }

    #[test]
    fn connection_flow_emits_edge_and_returns_to_idle() {
        let mut editor = PlanEditor::new();
        let a = add(&mut editor, 0.0, Frequency::OneTime);
        let b = add(&mut editor, 0.0, Frequency::OneTime);

        let outcome = editor
            .apply(EditCommand::StartConnecting(a.clone()))
            .expect("start");
        assert_eq!(outcome, EditOutcome::ConnectionStarted(a.clone()));
        assert_eq!(editor.connection(), &ConnectionState::ConnectingFrom(a.clone()));

        let outcome = editor
            .apply(EditCommand::SelectTarget(b.clone()))
            .expect("complete");
        assert!(matches!(outcome, EditOutcome::EdgeAdded(_)));
        assert_eq!(editor.connection(), &ConnectionState::Idle);

        let edge = &editor.graph().edges()[0];
        assert_eq!(edge.source, a);
        assert_eq!(edge.target, b);
    }

    #[test]
    fn other_operations_are_rejected_while_connecting() {
        let mut editor = PlanEditor::new();
        let a = add(&mut editor, 0.0, Frequency::OneTime);
        editor
            .apply(EditCommand::StartConnecting(a.clone()))
            .expect("start");
        let before = editor.graph().clone();

        let err = editor
            .apply(EditCommand::RemoveNode(a.clone()))
            .expect_err("must reject");
        assert_eq!(err, GraphError::ConnectionInProgress(a.clone()));
        let err = editor
            .apply(EditCommand::LoadTemplate(TemplateId::Default))
            .expect_err("must reject");
        assert_eq!(err, GraphError::ConnectionInProgress(a.clone()));
        assert_eq!(editor.graph(), &before);

        let outcome = editor
            .apply(EditCommand::CancelConnecting)
            .expect("cancel");
        assert_eq!(outcome, EditOutcome::ConnectionCancelled);
        assert_eq!(editor.connection(), &ConnectionState::Idle);
        assert_eq!(editor.graph(), &before);
    }

    #[test]
    fn failed_target_keeps_connecting_state() {
        let mut editor = PlanEditor::new();
        let a = add(&mut editor, 0.0, Frequency::OneTime);
        editor
            .apply(EditCommand::StartConnecting(a.clone()))
            .expect("start");

        let missing = NodeId::from("missing");
        let err = editor
            .apply(EditCommand::SelectTarget(missing.clone()))
            .expect_err("must fail");
        assert_eq!(err, GraphError::ReferentialIntegrity(missing));
        assert_eq!(editor.connection(), &ConnectionState::ConnectingFrom(a));
        assert!(editor.graph().edges().is_empty());
    }

    #[test]
    fn start_connecting_requires_existing_node() {
        let mut editor = PlanEditor::new();
        let err = editor
            .apply(EditCommand::StartConnecting(NodeId::from("ghost")))
            .expect_err("must fail");
        assert!(err.is_not_found());
        assert_eq!(editor.connection(), &ConnectionState::Idle);
    }

    #[test]
    fn completing_while_idle_is_rejected() {
        let mut editor = PlanEditor::new();
        let a = add(&mut editor, 0.0, Frequency::OneTime);
        assert_eq!(
            editor.apply(EditCommand::SelectTarget(a)),
            Err(GraphError::NotConnecting)
        );
        assert_eq!(
            editor.apply(EditCommand::CancelConnecting),
            Err(GraphError::NotConnecting)
        );
    }

    #[test]
    fn self_loops_follow_edge_policy() {
        let mut permissive = PlanEditor::new();
        let a = add(&mut permissive, 0.0, Frequency::OneTime);
        permissive
            .apply(EditCommand::Connect {
                source: a.clone(),
                target: a.clone(),
                label: None,
            })
            .expect("self-loop allowed by default");

        let mut strict = PlanEditor::new().with_policy(EdgePolicy {
            allow_self_loops: false,
        });
        let b = add(&mut strict, 0.0, Frequency::OneTime);
        strict
            .apply(EditCommand::StartConnecting(b.clone()))
            .expect("start");
        let err = strict
            .apply(EditCommand::SelectTarget(b.clone()))
            .expect_err("self-loop rejected");
        assert_eq!(err, GraphError::SelfLoop(b));
    }

    #[test]
    fn undo_restores_previous_snapshot_and_summary() {
        let mut editor = PlanEditor::with_graph(template_graph(TemplateId::Default));
        let template_summary = editor.summary();
        assert!(!editor.can_undo());

        editor
            .apply(EditCommand::LoadTemplate(TemplateId::Startup))
            .expect("load");
        assert_eq!(editor.graph(), &template_graph(TemplateId::Startup));

        editor.undo().expect("undo");
        assert_eq!(editor.graph(), &template_graph(TemplateId::Default));
        assert_eq!(editor.summary(), template_summary);
        assert_eq!(editor.undo(), Err(GraphError::NothingToUndo));
    }

    #[test]
    fn history_is_capped_and_drops_oldest_snapshots() {
        let mut editor = PlanEditor::with_graph(template_graph(TemplateId::Default));
        let id = NodeId::from("1");
        for step in 0..(MAX_HISTORY + 50) {
            editor
                .apply(EditCommand::MoveNode {
                    id: id.clone(),
                    position: Position::new(step as f64, 0.0),
                })
                .expect("move");
        }
        assert_eq!(editor.history.len(), MAX_HISTORY);

        for _ in 0..MAX_HISTORY {
            editor.undo().expect("undo within cap");
        }
        assert_eq!(editor.undo(), Err(GraphError::NothingToUndo));
        let node = editor.graph().node(&id).expect("node exists");
        assert_eq!(node.position, Position::new(49.0, 0.0));
    }

    #[test]
    fn failed_commands_do_not_grow_history() {
        let mut editor = PlanEditor::new();
        let err = editor
            .apply(EditCommand::RemoveEdge(EdgeId::from("nope")))
            .expect_err("must fail");
        assert!(err.is_not_found());
        assert!(!editor.can_undo());
    }
}
