use crate::domains::car_agent::{AgentController, AgentId};
use std::collections::BTreeMap;

/// One controller per car identifier. Iteration follows identifier order so ticks and log
/// output are deterministic.
#[derive(Debug, Default)]
pub struct AgentRegistry {
    agents: BTreeMap<AgentId, AgentController>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the controller for `id`, creating it on first use.
    pub fn ensure(&mut self, id: AgentId) -> &mut AgentController {
        self.agents.entry(id).or_insert_with(|| AgentController::new(id))
    }

    pub fn get(&self, id: AgentId) -> Option<&AgentController> {
        self.agents.get(&id)
    }

    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut AgentController> {
        self.agents.get_mut(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AgentController> {
        self.agents.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut AgentController> {
        self.agents.values_mut()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}
