mod aggregate;
mod editor;
mod graph;
mod store;
mod templates;
mod types;

pub use aggregate::{PlanSummary, aggregate};
pub use editor::{
    ConnectionState, EdgePolicy, EditCommand, EditOutcome, MAX_HISTORY, PlanEditor,
};
pub use graph::{GraphParts, PlanGraph, TimelineGroup};
pub use store::{MemoryPlanStore, PlanStore};
pub use templates::{TemplateId, TemplateInfo, catalogue, template_graph};
pub use types::{
    ContactRef, EdgeId, Frequency, KindStyle, NodeDraft, NodeId, NodeKind, NodePatch, PlanEdge,
    PlanNode, Position,
};
