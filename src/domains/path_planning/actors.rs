use super::ports::DynRoutePlanner;
use super::types::{PlanOutcome, PlanTicket};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Runs planning tickets against the planner on their own tasks and reports each outcome back
/// over a channel, so a slow request for one agent never holds up the others.
pub struct PlanDispatchActor {
    planner: DynRoutePlanner,
    outcome_sender: mpsc::Sender<PlanOutcome>,
}

impl PlanDispatchActor {
    pub fn new(planner: DynRoutePlanner, outcome_sender: mpsc::Sender<PlanOutcome>) -> Self {
        Self {
            planner,
            outcome_sender,
        }
    }

    pub fn dispatch(&self, ticket: PlanTicket) -> JoinHandle<()> {
        let planner = self.planner.clone();
        let sender = self.outcome_sender.clone();
        tokio::spawn(async move {
            tracing::debug!(
                agent = %ticket.agent,
                generation = ticket.generation,
                request_id = %ticket.request_id,
                "dispatching plan request"
            );
            let result = planner.plan(&ticket.request).await;
            if let Err(e) = sender.send(ticket.resolve(result)).await {
                tracing::warn!("Failed to deliver plan outcome: {}", e);
            }
        })
    }
}
