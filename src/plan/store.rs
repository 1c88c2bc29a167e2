use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::graph::PlanGraph;

#[async_trait]
pub trait PlanStore: Send + Sync {
    async fn load(&self, user_id: &str) -> Option<PlanGraph>;

    async fn save(&self, user_id: &str, graph: PlanGraph);
}

#[derive(Debug, Default)]
pub struct MemoryPlanStore {
    plans: RwLock<HashMap<String, PlanGraph>>,
}

impl MemoryPlanStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PlanStore for MemoryPlanStore {
    async fn load(&self, user_id: &str) -> Option<PlanGraph> {
        self.plans.read().await.get(user_id).cloned()
    }

    async fn save(&self, user_id: &str, graph: PlanGraph) {
        tracing::debug!(user_id, nodes = graph.nodes().len(), "saving plan");
        self.plans.write().await.insert(user_id.to_string(), graph);
    }
}
