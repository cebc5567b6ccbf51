// Assignment event actor - forwards submission outcomes to whoever listens
use super::events::AssignmentEvent;
use tokio::sync::mpsc;

#[derive(Clone)]
pub struct AssignmentEventActor {
    event_sender: mpsc::Sender<AssignmentEvent>,
}

impl AssignmentEventActor {
    pub fn new(event_sender: mpsc::Sender<AssignmentEvent>) -> Self {
        Self { event_sender }
    }

    pub async fn publish(&self, event: AssignmentEvent) -> Result<(), String> {
        self.event_sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}
