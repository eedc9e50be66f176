use crate::application::ports::{EventError, EventPublisher, LogoutEvent};
use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::info;

/// In-process logout event channel; consumers read from the returned receiver
pub struct MemoryEventPublisher {
    sender: mpsc::UnboundedSender<LogoutEvent>,
}

impl MemoryEventPublisher {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<LogoutEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl EventPublisher for MemoryEventPublisher {
    async fn publish(&self, event: LogoutEvent) -> Result<(), EventError> {
        info!(
            tenant = %event.tenant,
            event_type = ?event.event_type,
            "Publishing logout event"
        );

        self.sender
            .send(event)
            .map_err(|e| EventError::PublishFailed {
                message: format!("Failed to send event: {e}"),
            })
    }
}
